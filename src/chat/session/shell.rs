//! One conversation held in memory: transcript plus context.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::chat::core::{Context, Message, SessionError, SessionId, SessionResult};
use crate::chat::dispatch::payload::is_truthy;
use crate::chat::dispatch::{Action, Dispatcher, FALLBACK_CONTENT};

/// Assistant message that opens every session.
pub const GREETING: &str = "Hello! I'm ChatUIX, an interactive chatbot that can generate dynamic UI elements. Try asking me to:\n\n• Create a form\n• Show a data table\n• Generate a chart\n• Display cards or lists\n• Or anything else!";

/// Input for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    /// Typed text.
    Text(String),
    /// Widget interaction.
    Action(Action),
}

impl Turn {
    /// Transcript line recorded for this turn.
    #[must_use]
    pub fn transcript_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Action(Action { name, payload }) => match payload.as_ref().filter(|p| is_truthy(p)) {
                Some(data) => format!("Action: {name} with data: {data}"),
                None => format!("Action: {name}"),
            },
        }
    }
}

/// Turn as posted over HTTP: either `text`, or `action` with optional `data`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TurnRequest {
    /// Typed text.
    #[serde(default)]
    pub text: Option<String>,
    /// Action identifier.
    #[serde(default)]
    pub action: Option<String>,
    /// Data submitted with the action.
    #[serde(default)]
    pub data: Option<Value>,
}

impl TurnRequest {
    /// Validate into a [`Turn`]. A non-empty action wins over text.
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyTurn`] when there is no action and the text is blank.
    pub fn into_turn(self) -> SessionResult<Turn> {
        if let Some(name) = self.action.filter(|a| !a.is_empty()) {
            return Ok(Turn::Action(Action {
                name,
                payload: self.data,
            }));
        }
        match self.text {
            Some(text) if !text.trim().is_empty() => Ok(Turn::Text(text)),
            _ => Err(SessionError::EmptyTurn),
        }
    }
}

/// Serializable view of a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub id: SessionId,
    /// Transcript, oldest first.
    pub messages: Vec<Message>,
    /// Current context.
    pub context: Context,
}

/// Result of one turn: the appended assistant message and the context now in effect.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnOutcome {
    /// Assistant message appended by the turn.
    pub message: Message,
    /// Context after the turn.
    pub context: Context,
}

/// Transcript and context of one conversation.
#[derive(Clone, Debug)]
pub struct ChatSession {
    id: SessionId,
    transcript: Vec<Message>,
    context: Context,
}

impl ChatSession {
    /// New session whose transcript starts with `greeting`.
    #[must_use]
    pub fn new(greeting: &str) -> Self {
        Self {
            id: SessionId::new(),
            transcript: vec![Message::assistant(greeting, None)],
            context: Context::new(),
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.transcript
    }

    /// Context in effect for the next turn.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Run one turn through `dispatcher`.
    ///
    /// The returned context replaces the held one. A failed dispatch appends the
    /// fallback message and leaves the context untouched.
    pub fn submit(&mut self, dispatcher: &Dispatcher, turn: Turn) -> TurnOutcome {
        self.transcript.push(Message::user(turn.transcript_text()));

        let action = match turn {
            Turn::Action(action) => Some(action),
            Turn::Text(_) => None,
        };

        let reply = match dispatcher.dispatch(&self.transcript, &self.context, action.as_ref()) {
            Ok(reply) => {
                self.context = reply.context;
                Message::assistant(reply.content, reply.components)
            }
            Err(err) => {
                warn!("Session {} turn failed: {err}", self.id);
                Message::assistant(FALLBACK_CONTENT, Some(Vec::new()))
            }
        };
        debug!(
            "Session {} now has {} messages",
            self.id,
            self.transcript.len() + 1
        );
        self.transcript.push(reply.clone());

        TurnOutcome {
            message: reply,
            context: self.context.clone(),
        }
    }

    /// Serializable copy of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            messages: self.transcript.clone(),
            context: self.context.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::core::Role;
    use serde_json::json;

    fn action(name: &str, payload: Value) -> Turn {
        Turn::Action(Action::new(name).with_payload(payload))
    }

    #[test]
    fn test_new_session_has_greeting() {
        let session = ChatSession::new(GREETING);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::Assistant);
        assert!(session.context().is_empty());
    }

    #[test]
    fn test_text_turn_appends_user_and_assistant() {
        let dispatcher = Dispatcher::new();
        let mut session = ChatSession::new(GREETING);
        let outcome = session.submit(&dispatcher, Turn::Text("Create a signup form".to_string()));

        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].content, "Create a signup form");
        assert_eq!(outcome.context.get("formType"), Some(&json!("signup")));
        assert_eq!(session.context(), &outcome.context);
    }

    #[test]
    fn test_context_is_replaced_each_turn() {
        let dispatcher = Dispatcher::new();
        let mut session = ChatSession::new(GREETING);
        session.submit(&dispatcher, Turn::Text("calculator".to_string()));
        session.submit(&dispatcher, action("set_num1", json!({"value": "3"})));
        session.submit(&dispatcher, action("set_num2", json!({"value": "4"})));
        let outcome = session.submit(&dispatcher, Turn::Action(Action::new("calculate_add")));

        assert_eq!(outcome.message.content, "Result: 3 + 4 = 7");
        assert_eq!(
            session.context().get("calculator"),
            Some(&json!({"num1": 3, "num2": 4}))
        );
    }

    #[test]
    fn test_failed_turn_keeps_context_and_appends_fallback() {
        let dispatcher = Dispatcher::new();
        let mut session = ChatSession::new(GREETING);
        session.submit(&dispatcher, Turn::Text("book an appointment".to_string()));
        let before = session.context().clone();

        let outcome = session.submit(&dispatcher, Turn::Action(Action::new("select_date")));

        assert_eq!(outcome.message.content, FALLBACK_CONTENT);
        assert_eq!(outcome.message.components, Some(Vec::new()));
        assert_eq!(session.context(), &before);
    }

    #[test]
    fn test_action_transcript_text() {
        assert_eq!(
            action("select_date", json!({"value": "2024-10-28"})).transcript_text(),
            r#"Action: select_date with data: {"value":"2024-10-28"}"#
        );
        assert_eq!(
            Turn::Action(Action::new("show_table")).transcript_text(),
            "Action: show_table"
        );
    }

    #[test]
    fn test_turn_request_validation() {
        let blank = TurnRequest {
            text: Some("   ".to_string()),
            ..TurnRequest::default()
        };
        assert_eq!(blank.into_turn(), Err(SessionError::EmptyTurn));

        let both = TurnRequest {
            text: Some("hello".to_string()),
            action: Some("show_chart".to_string()),
            data: None,
        };
        assert_eq!(both.into_turn(), Ok(Turn::Action(Action::new("show_chart"))));

        let empty_action = TurnRequest {
            text: Some("hello".to_string()),
            action: Some(String::new()),
            data: None,
        };
        assert_eq!(empty_action.into_turn(), Ok(Turn::Text("hello".to_string())));
    }
}
