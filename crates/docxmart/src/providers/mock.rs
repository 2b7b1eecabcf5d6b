//! Scripted text generator for tests and offline runs

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{Error, Result};

use super::llm::TextGenerator;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Fail with this message
    Fail(String),
    /// Never answer within any reasonable timeout
    Hang,
    /// Panic inside the call
    Panic,
}

/// Returns scripted replies in order; once the script runs out, echoes a
/// short acknowledgement of the instruction
#[derive(Default)]
pub struct MockGenerator {
    script: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Instructions received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, instruction: &str) -> Result<String> {
        self.calls.lock().push(instruction.to_string());
        let reply = self.script.lock().pop_front();

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(Error::llm(message)),
            Some(MockReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(Error::llm("mock hang elapsed"))
            }
            Some(MockReply::Panic) => panic!("scripted generator panic"),
            None => Ok(format!(
                "Processed {} characters.",
                instruction.chars().count()
            )),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }
}
