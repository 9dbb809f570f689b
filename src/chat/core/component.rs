//! UI component descriptors carried inside assistant replies.
//!
//! The set is closed: the rendering layer knows how to draw exactly these variants,
//! and every interactive variant names the action it emits when used.

use serde::{Deserialize, Serialize};

use crate::chat::core::numbers::serialize_number;

/// Visual emphasis of a button.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Main call to action.
    Primary,
    /// Alternative action.
    Secondary,
    /// Destructive action.
    Danger,
}

/// Chart rendering style.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Line chart.
    Line,
    /// Bar chart.
    #[default]
    Bar,
    /// Pie chart.
    Pie,
}

impl ChartType {
    /// Stable string form used in reply text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Pie => "pie",
        }
    }
}

/// One field of a form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Visible label.
    pub label: String,
    /// Key under which the value is submitted.
    pub name: String,
    /// HTML input type (`text`, `email`, `password`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FormField {
    /// Build a field with a placeholder.
    #[must_use]
    pub fn new(label: &str, name: &str, kind: &str, placeholder: &str) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            placeholder: Some(placeholder.to_string()),
        }
    }
}

/// A labelled data point of a chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category name.
    pub name: String,
    /// Plotted value.
    #[serde(serialize_with = "serialize_number")]
    pub value: f64,
}

impl ChartPoint {
    /// Build a data point.
    #[must_use]
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// A button attached to a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    /// Button label.
    pub label: String,
    /// Action emitted when clicked.
    pub action: String,
}

impl CardAction {
    /// Build a card action.
    #[must_use]
    pub fn new(label: &str, action: &str) -> Self {
        Self {
            label: label.to_string(),
            action: action.to_string(),
        }
    }
}

/// One entry of a select.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Visible label.
    pub label: String,
}

impl SelectOption {
    /// Build an option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// A renderable widget descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum UiComponent {
    /// Clickable button.
    Button {
        /// Button label.
        label: String,
        /// Action emitted when clicked.
        action: String,
        /// Visual emphasis.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<ButtonVariant>,
    },
    /// Single-line input whose value is submitted on its own.
    Input {
        /// Input label.
        label: String,
        /// Placeholder text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        /// HTML input type.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input_type: Option<String>,
        /// Action emitted with `{value}`.
        action: String,
    },
    /// Multi-field form submitted as a field map.
    Form {
        /// Fields in display order.
        fields: Vec<FormField>,
        /// Submit button label.
        submit_label: String,
        /// Action emitted with the field map.
        action: String,
    },
    /// Static table.
    Table {
        /// Column headers.
        headers: Vec<String>,
        /// Row cells.
        rows: Vec<Vec<String>>,
        /// Optional caption.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// Chart over labelled points.
    Chart {
        /// Rendering style.
        chart_type: ChartType,
        /// Data points.
        data: Vec<ChartPoint>,
        /// Chart title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Key used for the x axis.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x_key: Option<String>,
        /// Key used for the y axis.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y_key: Option<String>,
    },
    /// Titled card with optional buttons.
    Card {
        /// Card title.
        title: String,
        /// Body text.
        content: String,
        /// Card buttons.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actions: Option<Vec<CardAction>>,
    },
    /// Bullet or numbered list.
    List {
        /// List entries.
        items: Vec<String>,
        /// Numbered when true.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ordered: Option<bool>,
    },
    /// Dropdown whose choice is submitted as `{value}`.
    Select {
        /// Select label.
        label: String,
        /// Choices in display order.
        options: Vec<SelectOption>,
        /// Action emitted with `{value}`.
        action: String,
    },
}

impl UiComponent {
    /// Build a button.
    #[must_use]
    pub fn button(label: &str, action: &str, variant: Option<ButtonVariant>) -> Self {
        Self::Button {
            label: label.to_string(),
            action: action.to_string(),
            variant,
        }
    }

    /// Build an input.
    #[must_use]
    pub fn input(label: &str, placeholder: &str, input_type: &str, action: &str) -> Self {
        Self::Input {
            label: label.to_string(),
            placeholder: Some(placeholder.to_string()),
            input_type: Some(input_type.to_string()),
            action: action.to_string(),
        }
    }

    /// Build a card; no actions means the `actions` field is omitted.
    #[must_use]
    pub fn card(title: &str, content: impl Into<String>, actions: Vec<CardAction>) -> Self {
        Self::Card {
            title: title.to_string(),
            content: content.into(),
            actions: (!actions.is_empty()).then_some(actions),
        }
    }

    /// Build a select.
    #[must_use]
    pub fn select(label: &str, options: Vec<SelectOption>, action: &str) -> Self {
        Self::Select {
            label: label.to_string(),
            options,
            action: action.to_string(),
        }
    }

    /// Build a table from string slices.
    #[must_use]
    pub fn table(caption: &str, headers: &[&str], rows: &[[&str; 4]]) -> Self {
        Self::Table {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
            caption: Some(caption.to_string()),
        }
    }

    /// Stable variant tag, identical to the JSON `type` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Button { .. } => "button",
            Self::Input { .. } => "input",
            Self::Form { .. } => "form",
            Self::Table { .. } => "table",
            Self::Chart { .. } => "chart",
            Self::Card { .. } => "card",
            Self::List { .. } => "list",
            Self::Select { .. } => "select",
        }
    }

    /// Actions this component can emit, in display order.
    #[must_use]
    pub fn action_names(&self) -> Vec<&str> {
        match self {
            Self::Button { action, .. }
            | Self::Input { action, .. }
            | Self::Form { action, .. }
            | Self::Select { action, .. } => vec![action.as_str()],
            Self::Card { actions, .. } => actions
                .iter()
                .flatten()
                .map(|a| a.action.as_str())
                .collect(),
            Self::Table { .. } | Self::Chart { .. } | Self::List { .. } => Vec::new(),
        }
    }
}
