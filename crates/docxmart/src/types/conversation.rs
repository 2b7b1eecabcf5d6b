//! Conversation history entries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a conversation turn; history only records generated responses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Assistant,
}

/// One completed turn in a session's conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_turn_serialization() {
        let message = ChatMessage::assistant("Summary text ");
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "Summary text ");
    }
}
