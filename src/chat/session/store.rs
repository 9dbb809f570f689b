//! In-memory registry of chat sessions.

use dashmap::DashMap;
use tracing::info;

use crate::chat::core::{SessionError, SessionId, SessionResult};
use crate::chat::dispatch::Dispatcher;
use crate::chat::session::shell::{ChatSession, SessionSnapshot, Turn, TurnOutcome};

/// Sessions keyed by id. A turn holds its session's entry lock for the whole
/// dispatch, so turns of one session never interleave.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<SessionId, ChatSession>,
    max_sessions: usize,
    greeting: String,
}

impl SessionStore {
    /// Empty store.
    #[must_use]
    pub fn new(max_sessions: usize, greeting: impl Into<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions,
            greeting: greeting.into(),
        }
    }

    /// Start a new session.
    ///
    /// # Errors
    /// Returns [`SessionError::LimitReached`] when the store is full.
    pub fn create(&self) -> SessionResult<SessionSnapshot> {
        if self.sessions.len() >= self.max_sessions {
            return Err(SessionError::LimitReached(self.max_sessions));
        }
        let session = ChatSession::new(&self.greeting);
        let snapshot = session.snapshot();
        self.sessions.insert(session.id(), session);
        info!("Created session {}", snapshot.id);
        Ok(snapshot)
    }

    /// Current state of a session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] for unknown ids.
    pub fn get(&self, id: SessionId) -> SessionResult<SessionSnapshot> {
        self.sessions
            .get(&id)
            .map(|session| session.snapshot())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Run one turn in a session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] for unknown ids.
    pub fn submit(
        &self,
        id: SessionId,
        dispatcher: &Dispatcher,
        turn: Turn,
    ) -> SessionResult<TurnOutcome> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        Ok(session.submit(dispatcher, turn))
    }

    /// Drop a session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] for unknown ids.
    pub fn remove(&self, id: SessionId) -> SessionResult<()> {
        self.sessions
            .remove(&id)
            .map(|_| info!("Removed session {id}"))
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
