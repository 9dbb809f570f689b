//! Session shell: drives the dispatcher turn by turn for one conversation.

pub mod shell;
pub mod store;

pub use shell::{ChatSession, GREETING, SessionSnapshot, Turn, TurnOutcome, TurnRequest};
pub use store::SessionStore;
