//! Submission request types

use serde::{Deserialize, Serialize};

/// Body of `POST /api/sessions/:id/submit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Task text, exactly as listed by `GET /api/tasks`
    pub task: String,
    /// Required when the task is a translation
    #[serde(default)]
    pub target_language: Option<String>,
}

impl SubmitRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            target_language: None,
        }
    }

    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_language_is_optional() {
        let request: SubmitRequest =
            serde_json::from_str(r#"{"task": "Summarize a CV"}"#).unwrap();
        assert_eq!(request.task, "Summarize a CV");
        assert!(request.target_language.is_none());
    }
}
