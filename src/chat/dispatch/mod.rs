//! Reply dispatch: free text and widget actions to canned replies.
//!
//! - `engine`: the [`Dispatcher`] and its routing order
//! - `actions`: handlers for widget actions, matched exactly or by prefix
//! - `keywords`: ordered keyword rules for free text
//! - `payload`: typed decoding of action payloads
//! - `request`: wire shapes for requests, replies and the failure fallback

pub mod actions;
pub mod engine;
pub mod keywords;
pub mod payload;
pub mod request;

pub use engine::Dispatcher;
pub use keywords::{KEYWORD_RULES, KeywordRule};
pub use payload::{CountPayload, DecodePayload, FieldsPayload, NumberPayload, TextPayload};
pub use request::{Action, DispatchRequest, FALLBACK_CONTENT, FallbackReply, Reply};
