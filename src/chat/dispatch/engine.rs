//! The dispatcher: routes a turn to an action handler or a keyword rule.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::chat::core::{Context, DispatchError, DispatchResult, Message};
use crate::chat::dispatch::actions::{self, ActionCall, ActionHandler};
use crate::chat::dispatch::keywords;
use crate::chat::core::numbers::client_json;
use crate::chat::dispatch::payload::is_truthy;
use crate::chat::dispatch::request::{Action, DispatchRequest, FallbackReply, Reply};

/// Stateless reply engine.
///
/// Built once and shared; every call works only on the values passed in.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    exact: HashMap<&'static str, ActionHandler>,
    prefixed: Vec<(&'static str, ActionHandler)>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher with the built-in action catalog and keyword rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exact: actions::exact_handlers().into_iter().collect(),
            prefixed: actions::prefix_handlers(),
        }
    }

    /// Compute the reply to the latest turn.
    ///
    /// With an action the catalog decides; otherwise the last message's text does.
    ///
    /// # Errors
    /// Returns an error when the history is empty, the payload is malformed, or a star
    /// count cannot be rendered.
    pub fn dispatch(
        &self,
        history: &[Message],
        context: &Context,
        action: Option<&Action>,
    ) -> DispatchResult<Reply> {
        let last = history.last().ok_or(DispatchError::EmptyHistory)?;

        match action {
            Some(action) => self.handle_action(action, context),
            None => Ok(Self::handle_text(&last.content, context)),
        }
    }

    /// Dispatch a wire request.
    ///
    /// # Errors
    /// See [`Dispatcher::dispatch`].
    pub fn handle(&self, request: &DispatchRequest) -> DispatchResult<Reply> {
        let action = request.action();
        self.dispatch(&request.messages, &request.context, action.as_ref())
    }

    /// Dispatch a wire request, replacing any failure with the fallback body.
    ///
    /// # Errors
    /// Returns [`FallbackReply`] when dispatch fails; the cause is logged.
    pub fn respond(&self, request: &DispatchRequest) -> Result<Reply, FallbackReply> {
        self.handle(request).map_err(|err| {
            warn!("Chat dispatch failed: {err}");
            FallbackReply::default()
        })
    }

    fn handle_action(&self, action: &Action, context: &Context) -> DispatchResult<Reply> {
        let call = ActionCall {
            name: &action.name,
            payload: action.payload.as_ref(),
            context,
        };

        if let Some(handler) = self.exact.get(action.name.as_str()) {
            debug!("Action `{}` matched exactly", action.name);
            return handler(&call);
        }

        if let Some((prefix, handler)) = self
            .prefixed
            .iter()
            .find(|(prefix, _)| action.name.starts_with(prefix))
        {
            debug!("Action `{}` matched prefix `{prefix}`", action.name);
            return handler(&call);
        }

        debug!("Action `{}` not in catalog, echoing", action.name);
        Ok(echo(&action.name, action.payload.as_ref(), context))
    }

    fn handle_text(content: &str, context: &Context) -> Reply {
        let text = content.to_lowercase();
        match keywords::find_rule(&text) {
            Some(rule) => {
                debug!("Text matched keyword rule `{}`", rule.name);
                (rule.respond)(&text, context)
            }
            None => {
                debug!("Text matched no keyword rule");
                keywords::quick_actions(context)
            }
        }
    }
}

/// Generic acknowledgement for actions outside the catalog.
fn echo(name: &str, payload: Option<&Value>, context: &Context) -> Reply {
    let data = payload
        .filter(|value| is_truthy(value))
        .map(|value| format!("Data: {}", client_json(value)))
        .unwrap_or_default();
    Reply::text(format!("Action \"{name}\" received! {data}"), context.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::core::{UiComponent, numbers::format_number};
    use serde_json::json;

    fn history(text: &str) -> Vec<Message> {
        vec![Message::user(text)]
    }

    fn run(
        dispatcher: &Dispatcher,
        context: &Context,
        name: &str,
        payload: Option<Value>,
    ) -> DispatchResult<Reply> {
        let action = Action {
            name: name.to_string(),
            payload,
        };
        dispatcher.dispatch(&history("ignored"), context, Some(&action))
    }

    fn action_names(reply: &Reply) -> Vec<String> {
        reply
            .components
            .iter()
            .flatten()
            .flat_map(UiComponent::action_names)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_default_reply_offers_three_quick_actions() {
        let dispatcher = Dispatcher::new();
        let ctx = Context::new().with("formType", json!("signup"));
        let reply = dispatcher.dispatch(&history("Hello!"), &ctx, None);
        let reply = reply.unwrap_or_else(|_| Reply::text("", Context::new()));
        assert_eq!(
            reply.content,
            "I can help you with various interactive UI elements! Here are some quick actions:"
        );
        assert_eq!(action_names(&reply), vec!["show_table", "show_chart", "show_form"]);
        assert_eq!(reply.context, ctx);
    }

    #[test]
    fn test_table_beats_chart() {
        let dispatcher = Dispatcher::new();
        let reply = dispatcher.dispatch(&history("Put the CHART in a Table"), &Context::new(), None);
        let kinds: Vec<&str> = reply
            .as_ref()
            .map(|r| r.components.iter().flatten().map(UiComponent::kind).collect())
            .unwrap_or_default();
        assert_eq!(kinds, vec!["table"]);
    }

    #[test]
    fn test_only_last_message_is_read() {
        let dispatcher = Dispatcher::new();
        let messages = vec![Message::user("show me a chart"), Message::user("hi")];
        let reply = dispatcher.dispatch(&messages, &Context::new(), None);
        assert_eq!(reply.map(|r| action_names(&r).len()), Ok(3));
    }

    #[test]
    fn test_empty_history_fails_in_both_modes() {
        let dispatcher = Dispatcher::new();
        let action = Action::new("show_table");
        assert_eq!(
            dispatcher.dispatch(&[], &Context::new(), None),
            Err(DispatchError::EmptyHistory)
        );
        assert_eq!(
            dispatcher.dispatch(&[], &Context::new(), Some(&action)),
            Err(DispatchError::EmptyHistory)
        );
    }

    #[test]
    fn test_calculator_round_trip() {
        let dispatcher = Dispatcher::new();
        let ctx = Context::new();
        let first = run(&dispatcher, &ctx, "set_num1", Some(json!({"value": "3"})));
        let ctx = first.map(|r| r.context).unwrap_or_default();
        let second = run(&dispatcher, &ctx, "set_num2", Some(json!({"value": "4"})));
        let ctx = second.map(|r| r.context).unwrap_or_default();
        let result = run(&dispatcher, &ctx, "calculate_add", None);
        let result = result.unwrap_or_else(|_| Reply::text("", Context::new()));

        assert!(result.content.contains('3'));
        assert!(result.content.contains('7'));
        assert_eq!(result.content, "Result: 3 + 4 = 7");
        assert!(matches!(
            result.components.as_deref(),
            Some([UiComponent::Card { title, .. }]) if title == "Calculation Result"
        ));
    }

    #[test]
    fn test_decimal_calculation_display() {
        let dispatcher = Dispatcher::new();
        let ctx = Context::new().with("calculator", json!({"num1": 0.1, "num2": 0.2}));
        let result = run(&dispatcher, &ctx, "calculate_add", None);
        assert_eq!(
            result.map(|r| r.content),
            Ok(format!("Result: 0.1 + 0.2 = {}", format_number(0.1 + 0.2)))
        );
    }

    #[test]
    fn test_booking_round_trip() {
        let dispatcher = Dispatcher::new();
        let start = dispatcher.dispatch(&history("I need an appointment"), &Context::new(), None);
        let ctx = start.map(|r| r.context).unwrap_or_default();
        let dated = run(&dispatcher, &ctx, "select_date", Some(json!({"value": "2024-10-28"})));
        let ctx = dated.map(|r| r.context).unwrap_or_default();
        assert_eq!(ctx.nested("bookingFlow", "step"), Some(&json!(2)));

        let booked = run(&dispatcher, &ctx, "select_time", Some(json!({"value": "10:00"})));
        let booked = booked.unwrap_or_else(|_| Reply::text("", Context::new()));
        assert!(booked.content.contains("2024-10-28"));
        assert!(booked.content.contains("10:00"));
        assert_eq!(
            booked.context.nested("bookingFlow", "confirmed"),
            Some(&json!(true))
        );
        assert_eq!(action_names(&booked), vec!["add_calendar", "book_another"]);
    }

    #[test]
    fn test_unknown_action_echo() {
        let dispatcher = Dispatcher::new();
        let ctx = Context::new().with("k", json!("v"));
        let reply = run(&dispatcher, &ctx, "unknown_action", Some(json!({"foo": 1})));
        let reply = reply.unwrap_or_else(|_| Reply::text("", Context::new()));
        assert_eq!(reply.content, r#"Action "unknown_action" received! Data: {"foo":1}"#);
        assert!(reply.components.is_none());
        assert_eq!(reply.context, ctx);
    }

    #[test]
    fn test_unknown_action_without_data() {
        let dispatcher = Dispatcher::new();
        let reply = run(&dispatcher, &Context::new(), "goto_dashboard", None);
        assert_eq!(
            reply.map(|r| r.content),
            Ok("Action \"goto_dashboard\" received! ".to_string())
        );
        let falsy = run(&dispatcher, &Context::new(), "add_calendar", Some(json!("")));
        assert_eq!(
            falsy.map(|r| r.content),
            Ok("Action \"add_calendar\" received! ".to_string())
        );
    }

    #[test]
    fn test_echo_prints_integral_floats_as_integers() {
        let dispatcher = Dispatcher::new();
        let payload = json!({"foo": 1.0, "bar": [2.5, -3.0]});
        let reply = run(&dispatcher, &Context::new(), "custom", Some(payload));
        assert_eq!(
            reply.map(|r| r.content),
            Ok(r#"Action "custom" received! Data: {"foo":1,"bar":[2.5,-3]}"#.to_string())
        );
    }

    #[test]
    fn test_contact_form_submission_is_echoed() {
        let dispatcher = Dispatcher::new();
        let reply = run(
            &dispatcher,
            &Context::new(),
            "submit_contact",
            Some(json!({"name": "Bo", "message": "hi"})),
        );
        assert_eq!(
            reply.map(|r| r.content),
            Ok(r#"Action "submit_contact" received! Data: {"name":"Bo","message":"hi"}"#.to_string())
        );
    }

    #[test]
    fn test_rating_renders_five_stars() {
        let dispatcher = Dispatcher::new();
        let reply = run(&dispatcher, &Context::new(), "submit_rating", Some(json!({"value": "5"})));
        assert_eq!(
            reply.map(|r| r.content),
            Ok("Thank you for rating us ⭐⭐⭐⭐⭐! Your feedback helps us improve.".to_string())
        );
    }

    #[test]
    fn test_negative_rating_fails() {
        let dispatcher = Dispatcher::new();
        let reply = run(&dispatcher, &Context::new(), "submit_rating", Some(json!({"value": "-2"})));
        assert_eq!(reply, Err(DispatchError::InvalidStarCount(-2)));
    }

    #[test]
    fn test_buy_prefix_after_exact_table() {
        let dispatcher = Dispatcher::new();
        let reply = run(&dispatcher, &Context::new(), "buy_premium", None);
        assert_eq!(
            reply.map(|r| r.content),
            Ok("Redirecting to checkout for the premium plan...".to_string())
        );
    }

    #[test]
    fn test_respond_replaces_failure_with_fallback() {
        let dispatcher = Dispatcher::new();
        let request = DispatchRequest::default();
        assert_eq!(dispatcher.respond(&request), Err(FallbackReply::default()));
    }

    #[test]
    fn test_dispatch_is_idempotent() {
        let dispatcher = Dispatcher::new();
        let ctx = Context::new().with("calculator", json!({"num1": 2}));
        let a = run(&dispatcher, &ctx, "set_num2", Some(json!({"value": "5"})));
        let b = run(&dispatcher, &ctx, "set_num2", Some(json!({"value": "5"})));
        assert_eq!(a, b);
        let c = dispatcher.dispatch(&history("pie chart please"), &ctx, None);
        let d = dispatcher.dispatch(&history("pie chart please"), &ctx, None);
        assert_eq!(c, d);
    }
}
