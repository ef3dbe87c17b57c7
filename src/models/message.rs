use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Suggestion,
    Confirmation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: MessageType,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self::new(text, Sender::User, MessageType::Text)
    }

    pub fn ai(text: &str, kind: MessageType) -> Self {
        Self::new(text, Sender::Ai, kind)
    }

    fn new(text: &str, sender: Sender, kind: MessageType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            sender,
            timestamp: Utc::now(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_widget_field_names() {
        let message = Message::ai("hello", MessageType::Suggestion);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["sender"], "ai");
        assert_eq!(json["type"], "suggestion");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn every_message_gets_a_fresh_id() {
        let first = Message::user("a");
        let second = Message::user("a");
        assert_ne!(first.id, second.id);
    }
}
