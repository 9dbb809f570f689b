//! Conversation-scoped key/value context.
//!
//! A [`Context`] is a plain value: the dispatcher receives one and returns a new one,
//! and the holder replaces its copy wholesale. Keys keep insertion order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed mapping of arbitrary JSON values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up `key.field` when `key` holds an object.
    #[must_use]
    pub fn nested(&self, key: &str, field: &str) -> Option<&Value> {
        self.get(key).and_then(Value::as_object)?.get(field)
    }

    /// Copy of this context with `key` set to `value` (`{...ctx, key: value}`).
    #[must_use]
    pub fn with(&self, key: &str, value: Value) -> Self {
        let mut next = self.clone();
        next.0.insert(key.to_string(), value);
        next
    }

    /// Copy of this context where the object under `key` is rebuilt from its previous
    /// fields plus `updates` (`{...ctx, key: {...ctx[key], ...updates}}`).
    ///
    /// A previous value that is not an object contributes no fields.
    #[must_use]
    pub fn spread_nested<I>(&self, key: &str, updates: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let mut inner = self
            .get(key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        for (field, value) in updates {
            inner.insert(field.to_string(), value);
        }
        self.with(key, Value::Object(inner))
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no keys are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
