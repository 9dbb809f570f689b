//! Transcript message model.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::chat::core::component::UiComponent;
use crate::chat::core::ids::MessageId;

/// Author of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Typed by the user or synthesized from a widget action.
    User,
    /// Produced by the dispatcher.
    Assistant,
}

impl Role {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One transcript entry. Never mutated after it is appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Client- or shell-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Author.
    pub role: Role,
    /// Prose content.
    pub content: String,
    /// Widgets attached to the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<UiComponent>>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// Build a user message stamped now.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::stamped(Role::User, content.into(), None)
    }

    /// Build an assistant message stamped now.
    #[must_use]
    pub fn assistant(content: impl Into<String>, components: Option<Vec<UiComponent>>) -> Self {
        Self::stamped(Role::Assistant, content.into(), components)
    }

    fn stamped(role: Role, content: String, components: Option<Vec<UiComponent>>) -> Self {
        Self {
            id: MessageId::new().to_string(),
            role,
            content,
            components,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_client_message_parses() {
        let parsed: Result<Message, _> =
            serde_json::from_value(json!({"role": "user", "content": "show me a chart"}));
        let message = parsed.unwrap_or_else(|_| Message::user(""));
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "show me a chart");
        assert!(message.components.is_none());
        assert_eq!(message.timestamp, 0);
    }

    #[test]
    fn test_constructors_stamp_id_and_time() {
        let message = Message::assistant("hi", None);
        assert_eq!(message.role, Role::Assistant);
        assert!(!message.id.is_empty());
        assert!(message.timestamp > 0);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let parsed: Result<Message, _> =
            serde_json::from_value(json!({"role": "system", "content": "x"}));
        assert!(parsed.is_err());
    }
}
