//! Chat subsystem for ChatUIX.
//!
//! This module is organized into:
//! - `core`: messages, UI components, context, identifiers and errors
//! - `dispatch`: the stateless dispatcher mapping turns to replies
//! - `session`: in-memory session shells that thread context across turns

pub mod core;
pub mod dispatch;
pub mod session;

pub use self::core::{
    ButtonVariant, CardAction, ChartPoint, ChartType, Context, DispatchError, DispatchResult,
    FormField, Message, MessageId, Role, SelectOption, SessionError, SessionId, SessionResult,
    UiComponent,
};
pub use dispatch::{Action, DispatchRequest, Dispatcher, FALLBACK_CONTENT, FallbackReply, Reply};
pub use session::{ChatSession, GREETING, SessionSnapshot, SessionStore, Turn, TurnOutcome, TurnRequest};
