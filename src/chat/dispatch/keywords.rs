//! Free-text routing: ordered keyword rules, first match wins.

use serde_json::json;

use crate::chat::core::{
    ButtonVariant, CardAction, ChartPoint, ChartType, Context, FormField, SelectOption,
    UiComponent,
};
use crate::chat::dispatch::actions::{BOOKING_KEY, CALCULATOR_KEY};
use crate::chat::dispatch::request::Reply;

/// One keyword set and the canned reply it produces.
#[derive(Clone, Copy, Debug)]
pub struct KeywordRule {
    /// Rule name, used in logs.
    pub name: &'static str,
    /// Substrings of the lower-cased text that select this rule.
    pub keywords: &'static [&'static str],
    /// Builds the reply from the lower-cased text and the current context.
    pub respond: fn(&str, &Context) -> Reply,
}

impl KeywordRule {
    /// Whether any keyword occurs in `text` (already lower-cased).
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// Rules in priority order.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "form",
        keywords: &["form", "signup", "register"],
        respond: signup_form,
    },
    KeywordRule {
        name: "table",
        keywords: &["table", "data", "list"],
        respond: sales_table,
    },
    KeywordRule {
        name: "chart",
        keywords: &["chart", "graph", "visualize"],
        respond: revenue_chart,
    },
    KeywordRule {
        name: "card",
        keywords: &["card", "product", "item"],
        respond: plan_cards,
    },
    KeywordRule {
        name: "survey",
        keywords: &["survey", "feedback", "rating"],
        respond: rating_survey,
    },
    KeywordRule {
        name: "calculator",
        keywords: &["calculator", "calculate", "compute"],
        respond: calculator,
    },
    KeywordRule {
        name: "booking",
        keywords: &["booking", "appointment", "schedule"],
        respond: booking,
    },
];

/// First rule matching `text`, which must already be lower-cased.
#[must_use]
pub fn find_rule(text: &str) -> Option<&'static KeywordRule> {
    KEYWORD_RULES.iter().find(|rule| rule.matches(text))
}

/// Reply when no rule matches: three quick-action buttons.
#[must_use]
pub fn quick_actions(context: &Context) -> Reply {
    Reply::with_components(
        "I can help you with various interactive UI elements! Here are some quick actions:",
        vec![
            UiComponent::button("📋 Show Data Table", "show_table", Some(ButtonVariant::Primary)),
            UiComponent::button("📊 Generate Chart", "show_chart", Some(ButtonVariant::Secondary)),
            UiComponent::button("📝 Create Form", "show_form", Some(ButtonVariant::Secondary)),
        ],
        context.clone(),
    )
}

fn signup_form(_text: &str, context: &Context) -> Reply {
    Reply::with_components(
        "I've created a signup form for you. Fill it out and I'll process your registration!",
        vec![UiComponent::Form {
            fields: vec![
                FormField::new("Full Name", "name", "text", "John Doe"),
                FormField::new("Email", "email", "email", "john@example.com"),
                FormField::new("Password", "password", "password", "••••••••"),
            ],
            submit_label: "Sign Up".to_string(),
            action: "submit_signup".to_string(),
        }],
        context.with("formType", json!("signup")),
    )
}

fn sales_table(_text: &str, context: &Context) -> Reply {
    Reply::with_components(
        "Here's a sample sales data table showing our top products:",
        vec![UiComponent::table(
            "Q4 2024 Sales Performance",
            &["Product", "Units Sold", "Revenue", "Growth"],
            &[
                ["Product A", "1,234", "$45,678", "+15%"],
                ["Product B", "987", "$32,450", "+8%"],
                ["Product C", "1,567", "$67,890", "+23%"],
                ["Product D", "654", "$21,234", "-5%"],
                ["Product E", "2,345", "$89,012", "+45%"],
            ],
        )],
        context.clone(),
    )
}

/// Chart subtype requested in the text; bar unless pie or line is mentioned.
fn chart_type(text: &str) -> ChartType {
    if text.contains("pie") {
        ChartType::Pie
    } else if text.contains("line") {
        ChartType::Line
    } else {
        ChartType::Bar
    }
}

fn revenue_chart(text: &str, context: &Context) -> Reply {
    let chart_type = chart_type(text);
    let months = [
        ("Jan", 4000.0),
        ("Feb", 3000.0),
        ("Mar", 5000.0),
        ("Apr", 4500.0),
        ("May", 6000.0),
        ("Jun", 5500.0),
    ];
    Reply::with_components(
        format!(
            "Here's a {} chart visualizing monthly revenue data:",
            chart_type.as_str()
        ),
        vec![UiComponent::Chart {
            chart_type,
            data: months
                .iter()
                .map(|(name, value)| ChartPoint::new(name, *value))
                .collect(),
            title: Some("Monthly Revenue 2024".to_string()),
            x_key: Some("name".to_string()),
            y_key: Some("value".to_string()),
        }],
        context.clone(),
    )
}

fn plan_cards(_text: &str, context: &Context) -> Reply {
    Reply::with_components(
        "Here are some product cards you might be interested in:",
        vec![
            UiComponent::card(
                "Premium Plan",
                "Get access to all features including advanced analytics, priority support, and unlimited storage.",
                vec![
                    CardAction::new("Learn More", "learn_more_premium"),
                    CardAction::new("Buy Now", "buy_premium"),
                ],
            ),
            UiComponent::card(
                "Basic Plan",
                "Perfect for getting started with essential features and 10GB storage.",
                vec![
                    CardAction::new("Learn More", "learn_more_basic"),
                    CardAction::new("Buy Now", "buy_basic"),
                ],
            ),
        ],
        context.clone(),
    )
}

fn rating_survey(_text: &str, context: &Context) -> Reply {
    let ratings = [
        ("5", "⭐⭐⭐⭐⭐ Excellent"),
        ("4", "⭐⭐⭐⭐ Good"),
        ("3", "⭐⭐⭐ Average"),
        ("2", "⭐⭐ Poor"),
        ("1", "⭐ Very Poor"),
    ];
    Reply::with_components(
        "I'd love to hear your feedback! Please rate your experience:",
        vec![
            UiComponent::select(
                "How would you rate your experience?",
                ratings
                    .iter()
                    .map(|(value, label)| SelectOption::new(value, label))
                    .collect(),
                "submit_rating",
            ),
            UiComponent::input(
                "Additional Comments",
                "Tell us more...",
                "text",
                "submit_comment",
            ),
        ],
        context.clone(),
    )
}

fn calculator(_text: &str, context: &Context) -> Reply {
    Reply::with_components(
        "Here's a simple calculator. Enter numbers and I'll help you compute:",
        vec![
            UiComponent::input("Enter first number", "0", "number", "set_num1"),
            UiComponent::input("Enter second number", "0", "number", "set_num2"),
            UiComponent::button("Add", "calculate_add", Some(ButtonVariant::Primary)),
            UiComponent::button(
                "Multiply",
                "calculate_multiply",
                Some(ButtonVariant::Secondary),
            ),
        ],
        context.with(CALCULATOR_KEY, json!({})),
    )
}

fn booking(_text: &str, context: &Context) -> Reply {
    let dates = [
        ("2024-10-27", "Monday, Oct 27"),
        ("2024-10-28", "Tuesday, Oct 28"),
        ("2024-10-29", "Wednesday, Oct 29"),
        ("2024-10-30", "Thursday, Oct 30"),
        ("2024-10-31", "Friday, Oct 31"),
    ];
    Reply::with_components(
        "Let's book an appointment. First, select your preferred date:",
        vec![UiComponent::select(
            "Choose a date",
            dates
                .iter()
                .map(|(value, label)| SelectOption::new(value, label))
                .collect(),
            "select_date",
        )],
        context.with(BOOKING_KEY, json!({"step": 1})),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = KEYWORD_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["form", "table", "chart", "card", "survey", "calculator", "booking"]
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(find_rule("show the chart as a table").map(|r| r.name), Some("table"));
        assert_eq!(find_rule("register for a booking").map(|r| r.name), Some("form"));
        assert!(find_rule("hello there").is_none());
    }

    #[test]
    fn test_substring_matching() {
        // "dataset" contains "data", "items" contains "item".
        assert_eq!(find_rule("a dataset").map(|r| r.name), Some("table"));
        assert_eq!(find_rule("some items").map(|r| r.name), Some("card"));
    }

    #[test]
    fn test_chart_subtypes() {
        assert_eq!(chart_type("a pie chart"), ChartType::Pie);
        assert_eq!(chart_type("a line graph"), ChartType::Line);
        assert_eq!(chart_type("pie or line chart"), ChartType::Pie);
        assert_eq!(chart_type("visualize sales"), ChartType::Bar);
    }

    #[test]
    fn test_chart_reply_names_subtype() {
        let reply = revenue_chart("line graph", &Context::new());
        assert_eq!(
            reply.content,
            "Here's a line chart visualizing monthly revenue data:"
        );
    }

    #[test]
    fn test_calculator_resets_state() {
        let ctx = Context::new().with(CALCULATOR_KEY, json!({"num1": 9}));
        let reply = calculator("calculator", &ctx);
        assert_eq!(reply.context.get(CALCULATOR_KEY), Some(&json!({})));
    }

    #[test]
    fn test_booking_starts_at_step_one() {
        let reply = booking("book an appointment", &Context::new());
        assert_eq!(reply.context.get(BOOKING_KEY), Some(&json!({"step": 1})));
        let options = match reply.components.as_deref() {
            Some([UiComponent::Select { options, .. }]) => options.len(),
            _ => 0,
        };
        assert_eq!(options, 5);
    }

    #[test]
    fn test_quick_actions_buttons() {
        let ctx = Context::new().with("x", json!(1));
        let reply = quick_actions(&ctx);
        let actions: Vec<&str> = reply
            .components
            .iter()
            .flatten()
            .flat_map(UiComponent::action_names)
            .collect();
        assert_eq!(actions, vec!["show_table", "show_chart", "show_form"]);
        assert_eq!(reply.context, ctx);
    }
}
