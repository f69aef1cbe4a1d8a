use serde::{Deserialize, Serialize};

/// One colour stop of a gradient, `percent` in `0..=100`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GradientStop {
    pub percent: f64,
    pub color: String,
}

impl GradientStop {
    pub fn new(percent: f64, color: impl Into<String>) -> Self {
        Self {
            percent,
            color: color.into(),
        }
    }
}

/// Current value of an input. Text and number inputs keep the raw buffer the user
/// typed; numbers are parsed when the value is checked or exported.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Axes(Vec<String>),
    Bool(bool),
    /// Stored option key of a select.
    Select(String),
    List(Vec<String>),
    Color(String),
    Image(Option<String>),
    Gradient(Vec<GradientStop>),
    Curve(Option<String>),
}

impl FieldValue {
    pub fn variant_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Axes(_) => "axes",
            FieldValue::Bool(_) => "checkbox",
            FieldValue::Select(_) => "select",
            FieldValue::List(_) => "list",
            FieldValue::Color(_) => "color",
            FieldValue::Image(_) => "image",
            FieldValue::Gradient(_) => "gradient",
            FieldValue::Curve(_) => "curve",
        }
    }

    /// True when a required input would reject this value.
    pub fn has_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) | FieldValue::Select(text) | FieldValue::Color(text) => {
                text.trim().is_empty()
            }
            FieldValue::Axes(axes) => axes.is_empty() || axes.iter().any(|a| a.trim().is_empty()),
            FieldValue::Bool(_) => false,
            FieldValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
            FieldValue::Image(source) | FieldValue::Curve(source) => source.is_none(),
            FieldValue::Gradient(stops) => stops.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) | FieldValue::Select(text) | FieldValue::Color(text) => {
                Some(text)
            }
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Bool(flag)
    }
}
