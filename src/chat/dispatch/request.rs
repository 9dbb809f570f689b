//! Dispatch request and reply shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::core::{Context, Message, UiComponent};

/// Content of the reply substituted for any processing failure.
pub const FALLBACK_CONTENT: &str = "An error occurred processing your request.";

/// A widget interaction routed back to the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    /// Action identifier, e.g. `select_date`.
    pub name: String,
    /// Data submitted with the interaction.
    pub payload: Option<Value>,
}

impl Action {
    /// Action without payload.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// One dispatch call as it arrives over HTTP.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<Message>,
    /// Context returned by the previous turn.
    #[serde(default)]
    pub context: Context,
    /// Action identifier when the turn comes from a widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Data submitted with the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_data: Option<Value>,
}

impl DispatchRequest {
    /// The widget action, if any. An empty action string means text mode.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.action
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| Action {
                name: name.to_string(),
                payload: self.action_data.clone(),
            })
    }
}

/// Successful dispatcher output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Prose shown in the transcript.
    pub content: String,
    /// Widgets rendered under the prose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<UiComponent>>,
    /// Context that replaces the caller's copy.
    pub context: Context,
}

impl Reply {
    /// Prose-only reply.
    #[must_use]
    pub fn text(content: impl Into<String>, context: Context) -> Self {
        Self {
            content: content.into(),
            components: None,
            context,
        }
    }

    /// Reply with widgets.
    #[must_use]
    pub fn with_components(
        content: impl Into<String>,
        components: Vec<UiComponent>,
        context: Context,
    ) -> Self {
        Self {
            content: content.into(),
            components: Some(components),
            context,
        }
    }
}

/// Body returned in place of a reply when dispatch fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FallbackReply {
    /// Always [`FALLBACK_CONTENT`].
    pub content: String,
    /// Always empty.
    pub components: Vec<UiComponent>,
}

impl Default for FallbackReply {
    fn default() -> Self {
        Self {
            content: FALLBACK_CONTENT.to_string(),
            components: Vec::new(),
        }
    }
}
