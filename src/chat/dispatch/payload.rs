//! Typed decoding of action payloads.
//!
//! Widgets submit loosely shaped JSON. Each action family decodes it into one of the
//! small types below; shape problems surface as [`DispatchError::BadPayload`].

use serde_json::{Map, Value};

use crate::chat::core::numbers::{client_json, format_number, parse_float, parse_int};
use crate::chat::core::{DispatchError, DispatchResult};

/// Decode a payload for a given action.
pub trait DecodePayload<'a>: Sized {
    /// Decode `raw`, naming `action` in any error.
    ///
    /// # Errors
    /// Returns [`DispatchError::BadPayload`] when the payload has the wrong shape.
    fn decode(action: &str, raw: Option<&'a Value>) -> DispatchResult<Self>;
}

/// Render a JSON value the way reply templates interpolate it.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => client_json(value),
    }
}

/// Whether the client would treat `value` as present.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn object<'a>(action: &str, raw: Option<&'a Value>) -> DispatchResult<&'a Map<String, Value>> {
    match raw {
        None | Some(Value::Null) => Err(DispatchError::bad_payload(action, "payload is missing")),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(DispatchError::bad_payload(
            action,
            "payload must be an object",
        )),
    }
}

fn field<'a>(action: &str, map: &'a Map<String, Value>, name: &str) -> DispatchResult<&'a Value> {
    map.get(name)
        .ok_or_else(|| DispatchError::bad_payload(action, format!("missing field `{name}`")))
}

/// `{value}` payload rendered as text (dates, times, comments).
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload<'a> {
    /// The submitted value as received.
    pub raw: &'a Value,
    /// The value as it is shown in replies.
    pub text: String,
}

impl<'a> DecodePayload<'a> for TextPayload<'a> {
    fn decode(action: &str, raw: Option<&'a Value>) -> DispatchResult<Self> {
        let value = field(action, object(action, raw)?, "value")?;
        Ok(Self {
            raw: value,
            text: display_value(value),
        })
    }
}

/// `{value}` payload read as a floating-point number.
///
/// Unparseable input is kept as NaN rather than rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberPayload {
    /// The value as it is shown in replies.
    pub text: String,
    /// Parsed number, NaN if nothing parsed.
    pub number: f64,
}

impl<'a> DecodePayload<'a> for NumberPayload {
    fn decode(action: &str, raw: Option<&'a Value>) -> DispatchResult<Self> {
        let TextPayload { raw: value, text } = TextPayload::decode(action, raw)?;
        let number = value.as_f64().unwrap_or_else(|| parse_float(&text));
        Ok(Self { text, number })
    }
}

/// `{value}` payload read as an integer count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountPayload {
    /// Parsed count; `None` when nothing parsed.
    pub count: Option<i64>,
}

impl<'a> DecodePayload<'a> for CountPayload {
    fn decode(action: &str, raw: Option<&'a Value>) -> DispatchResult<Self> {
        let TextPayload { text, .. } = TextPayload::decode(action, raw)?;
        Ok(Self {
            count: parse_int(&text),
        })
    }
}

/// Submitted form: field name to value.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldsPayload<'a> {
    /// Every submitted field.
    pub fields: &'a Map<String, Value>,
}

impl<'a> FieldsPayload<'a> {
    /// A required field rendered as text.
    ///
    /// # Errors
    /// Returns [`DispatchError::BadPayload`] when the field was not submitted.
    pub fn text(&self, action: &str, name: &str) -> DispatchResult<String> {
        field(action, self.fields, name).map(display_value)
    }
}

impl<'a> DecodePayload<'a> for FieldsPayload<'a> {
    fn decode(action: &str, raw: Option<&'a Value>) -> DispatchResult<Self> {
        Ok(Self {
            fields: object(action, raw)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value_forms() {
        assert_eq!(display_value(&json!("10:00")), "10:00");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(null)), "null");
        assert_eq!(display_value(&json!({"foo": 1})), r#"{"foo":1}"#);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
    }

    #[test]
    fn test_number_payload_keeps_nan() {
        let raw = json!({"value": "abc"});
        let decoded = NumberPayload::decode("set_num1", Some(&raw));
        assert!(decoded.is_ok_and(|p| p.number.is_nan() && p.text == "abc"));
    }

    #[test]
    fn test_number_payload_accepts_json_numbers() {
        let raw = json!({"value": 4});
        let decoded = NumberPayload::decode("set_num2", Some(&raw));
        assert!(decoded.is_ok_and(|p| (p.number - 4.0).abs() < f64::EPSILON && p.text == "4"));
    }

    #[test]
    fn test_missing_payload_is_bad_payload() {
        let decoded = TextPayload::decode("select_date", None);
        assert!(matches!(decoded, Err(DispatchError::BadPayload { .. })));
    }

    #[test]
    fn test_non_object_payload_is_bad_payload() {
        let raw = json!("2024-10-28");
        let decoded = TextPayload::decode("select_date", Some(&raw));
        assert!(matches!(decoded, Err(DispatchError::BadPayload { .. })));
    }

    #[test]
    fn test_missing_value_field_is_bad_payload() {
        let raw = json!({"other": 1});
        let decoded = CountPayload::decode("submit_rating", Some(&raw));
        assert!(matches!(decoded, Err(DispatchError::BadPayload { .. })));
    }

    #[test]
    fn test_count_payload() {
        let raw = json!({"value": "4"});
        assert_eq!(
            CountPayload::decode("submit_rating", Some(&raw)),
            Ok(CountPayload { count: Some(4) })
        );
    }

    #[test]
    fn test_fields_payload_text() {
        let raw = json!({"name": "Ada", "email": "ada@example.com"});
        let decoded = FieldsPayload::decode("submit_signup", Some(&raw));
        let name = decoded
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|p| p.text("submit_signup", "name"));
        assert_eq!(name, Ok("Ada".to_string()));
        let missing = decoded.and_then(|p| p.text("submit_signup", "password"));
        assert!(missing.is_err());
    }
}
