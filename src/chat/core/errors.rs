//! Error types for the chat subsystem.

use thiserror::Error;

/// Failure while computing a reply.
///
/// Every variant is a "processing failure" to the user: the boundary replaces the reply
/// with the fixed fallback and keeps the previous context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The conversation history was empty, so there is no last message to read.
    #[error("conversation history is empty")]
    EmptyHistory,
    /// The action payload was missing or did not have the expected shape.
    #[error("bad payload for action `{action}`: {reason}")]
    BadPayload {
        /// Action whose payload was rejected.
        action: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The star count cannot be repeated (negative or over the limit).
    #[error("cannot render a run of {0} stars")]
    InvalidStarCount(i64),
}

impl DispatchError {
    /// Build a [`DispatchError::BadPayload`].
    #[must_use]
    pub fn bad_payload(action: &str, reason: impl Into<String>) -> Self {
        Self::BadPayload {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience result alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Session shell errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No session with this identifier.
    #[error("session not found: {0}")]
    NotFound(String),
    /// The store already holds the maximum number of sessions.
    #[error("session limit reached ({0})")]
    LimitReached(usize),
    /// The turn had neither text nor an action.
    #[error("turn has no text and no action")]
    EmptyTurn,
}

/// Convenience result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_payload_message() {
        let err = DispatchError::bad_payload("set_num1", "expected an object");
        assert_eq!(
            err.to_string(),
            "bad payload for action `set_num1`: expected an object"
        );
    }

    #[test]
    fn test_star_count_message() {
        let err = DispatchError::InvalidStarCount(-2);
        assert_eq!(err.to_string(), "cannot render a run of -2 stars");
    }
}
