//! Task menu and instruction templates

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{Chunk, Language};

const GENERAL: &[&str] = &[
    "Translate the document to another language",
    "Review and correct grammatical errors in the document",
    "Generate a concise summary of the document",
    "Extract specific information such as dates, names, and places from the document",
    "Determine the sentiment (positive, negative, neutral) expressed in the document",
    "Create new text based on the document’s content",
    "Expand on ideas or topics mentioned in the document",
    "Identify the main theme or subject of the document",
    "Rewrite sections of text to improve clarity or readability",
    "Identify and classify entities such as people, organizations, locations, and dates in the document",
    "Suggest improvements for style and readability of the document",
    "Identify and list important keywords or phrases from the document",
    "Analyze and identify recurring themes or topics within the document",
];

const EDUCATIONAL: &[&str] = &[
    "Generate text for PowerPoint slides based on the document",
    "Generate study notes based on the document",
    "Summarize educational content for easier understanding",
    "Create quiz questions based on the educational document",
    "Develop lesson plans or teaching materials from the document",
    "Provide examples and analogies to explain difficult concepts",
    "Identify and suggest additional resources for further reading",
    "Generate discussion questions to encourage critical thinking",
    "Analyze the document for educational standards alignment",
    "Suggest some possible visual aids that could be created based on the document",
    "Assess the readability level of the educational content",
];

const LEGAL: &[&str] = &[
    "Summarize legal documents and extract key points",
    "Translate legal documents to another language",
    "Identify key legal terms and definitions within the document",
    "Check for compliance with legal standards and regulations",
    "Draft legal contracts or agreements based on provided information",
    "Analyze and identify potential legal risks or issues",
    "Provide legal citations and references for document content",
    "Review and correct legal document formatting and structure",
    "Generate a timeline of events based on the legal document",
    "Assess the strength of arguments in legal documents",
];

const PROFESSIONAL: &[&str] = &[
    "Review and improve a resume",
    "Summarize a CV",
    "Extract key skills and qualifications from a resume",
    "Generate a professional summary based on a resume",
    "Tailor a resume for a specific job",
    "Identify strengths and weaknesses in a resume",
    "Convert a resume to a different format",
    "Review a resume for ATS (Applicant Tracking System) optimization",
    "Create a cover letter based on a resume",
    "Highlight achievements and accomplishments in a resume",
    "Suggest action verbs and keywords for a resume",
    "Provide feedback on the layout and design of a resume",
    "Compare a resume against a job description",
    "Recommend improvements for a LinkedIn profile based on a resume",
];

const TRANSLATION_TASKS: &[&str] = &[
    "Translate the document to another language",
    "Translate legal documents to another language",
];

/// Languages offered as translation targets
pub const TARGET_LANGUAGES: &[&str] = &[
    "English",
    "Arabic",
    "Mandarin Chinese",
    "Spanish",
    "French",
    "Portuguese",
    "Russian",
    "Japanese",
    "German",
    "Korean",
    "Vietnamese",
    "Turkish",
    "Tamil",
    "Urdu",
    "Italian",
    "Dutch",
];

/// A named group of tasks
#[derive(Debug, Clone, Serialize)]
pub struct TaskCategory {
    pub name: &'static str,
    pub tasks: &'static [&'static str],
}

/// The curated task menu
#[derive(Debug, Clone, Serialize)]
pub struct TaskCatalog {
    pub categories: Vec<TaskCategory>,
    pub target_languages: &'static [&'static str],
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self {
            categories: vec![
                TaskCategory { name: "General", tasks: GENERAL },
                TaskCategory { name: "Educational", tasks: EDUCATIONAL },
                TaskCategory { name: "Legal", tasks: LEGAL },
                TaskCategory { name: "Professional CV/Resume", tasks: PROFESSIONAL },
            ],
            target_languages: TARGET_LANGUAGES,
        }
    }
}

impl TaskCatalog {
    /// Look up a task by its exact text
    pub fn find(&self, task: &str) -> Option<&'static str> {
        self.categories
            .iter()
            .flat_map(|c| c.tasks.iter())
            .find(|t| **t == task)
            .copied()
    }

    pub fn is_translation(task: &str) -> bool {
        TRANSLATION_TASKS.contains(&task)
    }

    /// Resolve a user selection into a validated [`TaskSelection`]
    pub fn select(&self, task: &str, target_language: Option<&str>) -> Result<TaskSelection> {
        let task = self
            .find(task.trim())
            .ok_or_else(|| Error::invalid_request(format!("Unknown task: '{}'", task)))?;

        if !Self::is_translation(task) {
            return Ok(TaskSelection::Task(task));
        }

        let target = target_language
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::invalid_request("A target language is required for translation"))?;

        let target = self
            .target_languages
            .iter()
            .find(|l| l.eq_ignore_ascii_case(target))
            .copied()
            .ok_or_else(|| Error::invalid_request(format!("Unsupported target language: '{}'", target)))?;

        Ok(TaskSelection::Translate { target })
    }
}

/// A validated task choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSelection {
    /// Any non-translation task from the menu
    Task(&'static str),
    /// Translate into the given target language
    Translate { target: &'static str },
}

/// Builds one instruction per chunk
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the instruction for a single chunk
    pub fn build_instruction(selection: &TaskSelection, source: &Language, chunk: &str) -> String {
        match selection {
            TaskSelection::Translate { target } => format!(
                "Please translate the following document from {} to {}:\n\n{}",
                source.name, target, chunk
            ),
            TaskSelection::Task(task) => format!(
                "Please {} the following document:\n\n{}",
                task.to_lowercase(),
                chunk
            ),
        }
    }

    /// Build instructions for every chunk, in chunk order
    pub fn build_instructions(
        selection: &TaskSelection,
        source: &Language,
        chunks: &[Chunk],
    ) -> Vec<String> {
        chunks
            .iter()
            .map(|chunk| Self::build_instruction(selection, source, &chunk.content))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> Language {
        Language {
            code: "eng".to_string(),
            name: "English".to_string(),
        }
    }

    fn chunk(index: usize, content: &str) -> Chunk {
        Chunk {
            index,
            content: content.to_string(),
            char_start: 0,
            char_end: content.chars().count(),
        }
    }

    #[test]
    fn test_catalog_shape() {
        let catalog = TaskCatalog::default();
        let counts: Vec<usize> = catalog.categories.iter().map(|c| c.tasks.len()).collect();
        assert_eq!(counts, vec![13, 11, 10, 14]);
        assert_eq!(catalog.target_languages.len(), 16);
    }

    #[test]
    fn test_generic_instruction() {
        let selection = TaskCatalog::default()
            .select("Generate a concise summary of the document", None)
            .unwrap();
        let instruction = PromptBuilder::build_instruction(&selection, &english(), "Body text");

        assert_eq!(
            instruction,
            "Please generate a concise summary of the document the following document:\n\nBody text"
        );
    }

    #[test]
    fn test_translation_instruction() {
        let selection = TaskCatalog::default()
            .select("Translate legal documents to another language", Some("french"))
            .unwrap();
        assert_eq!(selection, TaskSelection::Translate { target: "French" });

        let instruction = PromptBuilder::build_instruction(&selection, &english(), "Hello");
        assert_eq!(
            instruction,
            "Please translate the following document from English to French:\n\nHello"
        );
    }

    #[test]
    fn test_translation_requires_target() {
        let catalog = TaskCatalog::default();
        let task = "Translate the document to another language";

        assert!(matches!(catalog.select(task, None), Err(Error::InvalidRequest(_))));
        assert!(catalog.select(task, Some("  ")).is_err());
        assert!(catalog.select(task, Some("Klingon")).is_err());
    }

    #[test]
    fn test_target_ignored_for_other_tasks() {
        let selection = TaskCatalog::default()
            .select("Summarize a CV", Some("German"))
            .unwrap();
        assert_eq!(selection, TaskSelection::Task("Summarize a CV"));
    }

    #[test]
    fn test_unknown_task() {
        assert!(TaskCatalog::default().select("Write a poem", None).is_err());
    }

    #[test]
    fn test_one_instruction_per_chunk() {
        let selection = TaskSelection::Task("Summarize a CV");
        let chunks = vec![chunk(0, "a"), chunk(1, "b"), chunk(2, "c")];
        let instructions = PromptBuilder::build_instructions(&selection, &english(), &chunks);

        assert_eq!(instructions.len(), chunks.len());
        assert!(instructions[0].ends_with("\n\na"));
        assert!(instructions[2].ends_with("\n\nc"));
    }
}
