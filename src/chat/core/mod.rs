//! Core chat types: messages, components, context, identifiers and errors.

pub mod component;
pub mod context;
pub mod errors;
pub mod ids;
pub mod message;
pub mod numbers;

pub use component::{
    ButtonVariant, CardAction, ChartPoint, ChartType, FormField, SelectOption, UiComponent,
};
pub use context::Context;
pub use errors::{DispatchError, DispatchResult, SessionError, SessionResult};
pub use ids::{MessageId, SessionId};
pub use message::{Message, Role};
