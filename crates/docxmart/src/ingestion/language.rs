//! Document language identification

use crate::types::Language;

/// Only this many characters are classified; a prefix is plenty for a best guess
const SAMPLE_CHARS: usize = 10_000;

/// Best-guess language identifier backed by `whatlang`
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Guess the language of `text`. Returns [`Language::unknown`] when the
    /// classifier gives no answer (e.g. empty or symbol-only text).
    pub fn detect(&self, text: &str) -> Language {
        let sample = match text.char_indices().nth(SAMPLE_CHARS) {
            Some((end, _)) => &text[..end],
            None => text,
        };

        match whatlang::detect(sample) {
            Some(info) => {
                let lang = info.lang();
                tracing::debug!(
                    "Detected language {} (confidence {:.2}, reliable: {})",
                    lang.code(),
                    info.confidence(),
                    info.is_reliable()
                );
                Language {
                    code: lang.code().to_string(),
                    name: lang.eng_name().to_string(),
                }
            }
            None => Language::unknown(),
        }
    }
}
