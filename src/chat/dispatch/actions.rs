//! Handlers for widget actions.
//!
//! Each handler is a plain function of the incoming call. Handlers never mutate the
//! incoming context; stateful flows return an updated copy.

use serde_json::{Value, json};

use crate::chat::core::numbers::{format_number, number_value, truthy_number};
use crate::chat::core::{
    ButtonVariant, CardAction, ChartPoint, ChartType, Context, DispatchError, DispatchResult,
    FormField, SelectOption, UiComponent,
};
use crate::chat::dispatch::payload::{
    CountPayload, DecodePayload, FieldsPayload, NumberPayload, TextPayload, display_value,
};
use crate::chat::dispatch::request::Reply;

/// Star glyph used by rating replies.
pub const STAR: &str = "⭐";

/// Longest star run a rating reply will render: the longest string the web client can
/// hold, one UTF-16 unit per star.
pub const MAX_STAR_RUN: usize = (1 << 29) - 24;

/// Context key of the calculator flow.
pub const CALCULATOR_KEY: &str = "calculator";

/// Context key of the booking flow.
pub const BOOKING_KEY: &str = "bookingFlow";

/// Prefix shared by plan purchase actions.
pub const BUY_PREFIX: &str = "buy_";

/// An action invocation as seen by a handler.
#[derive(Clone, Copy, Debug)]
pub struct ActionCall<'a> {
    /// Action identifier.
    pub name: &'a str,
    /// Submitted payload.
    pub payload: Option<&'a Value>,
    /// Context of the current turn.
    pub context: &'a Context,
}

impl<'a> ActionCall<'a> {
    /// Decode the payload for this action's family.
    ///
    /// # Errors
    /// Returns [`DispatchError::BadPayload`] when the payload has the wrong shape.
    pub fn decode<T: DecodePayload<'a>>(&self) -> DispatchResult<T> {
        T::decode(self.name, self.payload)
    }
}

/// Signature shared by all action handlers.
pub type ActionHandler = fn(&ActionCall<'_>) -> DispatchResult<Reply>;

/// Actions matched by exact name.
#[must_use]
pub fn exact_handlers() -> Vec<(&'static str, ActionHandler)> {
    vec![
        ("submit_signup", submit_signup as ActionHandler),
        ("show_table", show_table),
        ("show_chart", show_chart),
        ("show_form", show_form),
        ("set_num1", set_num1),
        ("set_num2", set_num2),
        ("calculate_add", calculate_add),
        ("calculate_multiply", calculate_multiply),
        ("select_date", select_date),
        ("select_time", select_time),
        ("submit_rating", submit_rating),
        ("submit_comment", submit_comment),
        ("learn_more_premium", learn_more),
        ("learn_more_basic", learn_more),
    ]
}

/// Actions matched by prefix, checked in order after the exact table.
#[must_use]
pub fn prefix_handlers() -> Vec<(&'static str, ActionHandler)> {
    vec![(BUY_PREFIX, buy_plan as ActionHandler)]
}

fn submit_signup(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let form: FieldsPayload<'_> = call.decode()?;
    let name = form.text(call.name, "name")?;
    let email = form.text(call.name, "email")?;

    Ok(Reply::with_components(
        format!("Thanks for signing up, {name}! We've sent a confirmation email to {email}. 🎉"),
        vec![UiComponent::card(
            "Registration Successful",
            "Welcome aboard! Your account has been created and you can now access all features.",
            vec![CardAction::new("Go to Dashboard", "goto_dashboard")],
        )],
        call.context
            .with("user", Value::Object(form.fields.clone())),
    ))
}

fn show_table(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    Ok(Reply::with_components(
        "Here's your requested data table:",
        vec![UiComponent::table(
            "User Activity Report",
            &["User", "Actions", "Last Active", "Status"],
            &[
                ["Alice Johnson", "45", "2 mins ago", "🟢 Online"],
                ["Bob Smith", "32", "1 hour ago", "🟡 Away"],
                ["Carol White", "78", "5 mins ago", "🟢 Online"],
                ["David Brown", "23", "3 hours ago", "🔴 Offline"],
            ],
        )],
        call.context.clone(),
    ))
}

fn show_chart(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let week = [
        ("Mon", 12.0),
        ("Tue", 19.0),
        ("Wed", 15.0),
        ("Thu", 25.0),
        ("Fri", 22.0),
        ("Sat", 8.0),
        ("Sun", 5.0),
    ];
    Ok(Reply::with_components(
        "Here's a visualization of your data:",
        vec![UiComponent::Chart {
            chart_type: ChartType::Bar,
            data: week
                .iter()
                .map(|(name, value)| ChartPoint::new(name, *value))
                .collect(),
            title: Some("Weekly Activity".to_string()),
            x_key: None,
            y_key: None,
        }],
        call.context.clone(),
    ))
}

fn show_form(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    Ok(Reply::with_components(
        "Here's a contact form:",
        vec![UiComponent::Form {
            fields: vec![
                FormField::new("Name", "name", "text", "Your name"),
                FormField::new("Email", "email", "email", "your@email.com"),
                FormField::new("Message", "message", "text", "Your message..."),
            ],
            submit_label: "Send Message".to_string(),
            action: "submit_contact".to_string(),
        }],
        call.context.clone(),
    ))
}

fn set_num1(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let input: NumberPayload = call.decode()?;
    Ok(Reply::text(
        format!(
            "First number set to {}. Now enter the second number.",
            input.text
        ),
        call.context
            .spread_nested(CALCULATOR_KEY, [("num1", number_value(input.number))]),
    ))
}

fn set_num2(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let input: NumberPayload = call.decode()?;
    Ok(Reply::text(
        format!(
            "Second number set to {}. Click a button to calculate.",
            input.text
        ),
        call.context
            .spread_nested(CALCULATOR_KEY, [("num2", number_value(input.number))]),
    ))
}

/// Stored operand, 0 when absent, null, zero or not a number.
fn operand(context: &Context, field: &str) -> f64 {
    truthy_number(context.nested(CALCULATOR_KEY, field)).unwrap_or(0.0)
}

fn calculation_card(noun: &str, result: f64) -> UiComponent {
    // "Calculate Again" reopens the contact form, not the calculator.
    UiComponent::card(
        "Calculation Result",
        format!("The {noun} is {}", format_number(result)),
        vec![CardAction::new("Calculate Again", "show_form")],
    )
}

fn calculate_add(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let (a, b) = (operand(call.context, "num1"), operand(call.context, "num2"));
    let result = a + b;
    Ok(Reply::with_components(
        format!(
            "Result: {} + {} = {}",
            format_number(a),
            format_number(b),
            format_number(result)
        ),
        vec![calculation_card("sum", result)],
        call.context.clone(),
    ))
}

fn calculate_multiply(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let (a, b) = (operand(call.context, "num1"), operand(call.context, "num2"));
    let result = a * b;
    Ok(Reply::with_components(
        format!(
            "Result: {} × {} = {}",
            format_number(a),
            format_number(b),
            format_number(result)
        ),
        vec![calculation_card("product", result)],
        call.context.clone(),
    ))
}

fn select_date(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let date: TextPayload<'_> = call.decode()?;
    let slots = [
        ("09:00", "9:00 AM"),
        ("10:00", "10:00 AM"),
        ("11:00", "11:00 AM"),
        ("14:00", "2:00 PM"),
        ("15:00", "3:00 PM"),
        ("16:00", "4:00 PM"),
    ];

    Ok(Reply::with_components(
        format!("Great! You selected {}. Now choose a time slot:", date.text),
        vec![UiComponent::select(
            "Choose a time",
            slots
                .iter()
                .map(|(value, label)| SelectOption::new(value, label))
                .collect(),
            "select_time",
        )],
        call.context.spread_nested(
            BOOKING_KEY,
            [("date", date.raw.clone()), ("step", json!(2))],
        ),
    ))
}

fn select_time(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let time: TextPayload<'_> = call.decode()?;
    let date = call
        .context
        .nested(BOOKING_KEY, "date")
        .map_or_else(|| "undefined".to_string(), display_value);

    Ok(Reply::with_components(
        format!(
            "Perfect! Your appointment is booked for {date} at {}. 📅",
            time.text
        ),
        vec![UiComponent::card(
            "Booking Confirmed",
            format!(
                "Date: {date}\nTime: {}\n\nWe'll send you a reminder 24 hours before your appointment.",
                time.text
            ),
            vec![
                CardAction::new("Add to Calendar", "add_calendar"),
                CardAction::new("Book Another", "book_another"),
            ],
        )],
        call.context.spread_nested(
            BOOKING_KEY,
            [("time", time.raw.clone()), ("confirmed", json!(true))],
        ),
    ))
}

/// Render `count` stars; an unparseable count renders none.
fn star_run(count: Option<i64>) -> DispatchResult<String> {
    let Some(count) = count else {
        return Ok(String::new());
    };
    usize::try_from(count)
        .ok()
        .filter(|n| *n <= MAX_STAR_RUN)
        .map(|n| STAR.repeat(n))
        .ok_or(DispatchError::InvalidStarCount(count))
}

fn submit_rating(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let rating: CountPayload = call.decode()?;
    let stars = star_run(rating.count)?;
    Ok(Reply::text(
        format!("Thank you for rating us {stars}! Your feedback helps us improve."),
        call.context.clone(),
    ))
}

fn submit_comment(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let comment: TextPayload<'_> = call.decode()?;
    Ok(Reply::text(
        format!(
            "Thanks for your comment: \"{}\". We appreciate your detailed feedback!",
            comment.text
        ),
        call.context.clone(),
    ))
}

fn learn_more(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let premium = call.name.contains("premium");
    let (plan, features) = if premium {
        (
            "Premium",
            [
                "Unlimited storage",
                "Priority 24/7 support",
                "Advanced analytics",
                "Custom integrations",
                "$29.99/month",
            ],
        )
    } else {
        (
            "Basic",
            [
                "10GB storage",
                "Email support",
                "Advanced analytics",
                "Basic integrations",
                "$9.99/month",
            ],
        )
    };

    Ok(Reply::with_components(
        format!("Here are more details about the {plan} plan:"),
        vec![
            UiComponent::List {
                items: features.iter().map(ToString::to_string).collect(),
                ordered: None,
            },
            UiComponent::button(
                &format!("Buy {plan} Plan"),
                &format!("{BUY_PREFIX}{}", plan.to_lowercase()),
                Some(ButtonVariant::Primary),
            ),
        ],
        call.context.clone(),
    ))
}

fn buy_plan(call: &ActionCall<'_>) -> DispatchResult<Reply> {
    let plan = call.name.strip_prefix(BUY_PREFIX).unwrap_or(call.name);
    Ok(Reply::with_components(
        format!("Redirecting to checkout for the {plan} plan..."),
        vec![UiComponent::card(
            "Purchase Initiated",
            "Please complete the payment process to activate your subscription.",
            Vec::new(),
        )],
        call.context.clone(),
    ))
}
