use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::domain::{FieldKind, FieldPath};
use crate::form::error::RegistryError;

use super::value::{FieldValue, GradientStop};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid colour pattern")
});

const DEFAULT_COLOR: &str = "#ffffff";

/// Value an input starts with when its definition carries no default.
pub(crate) fn blank_value(kind: &FieldKind) -> FieldValue {
    match kind {
        FieldKind::Text { axis_count } | FieldKind::Number { axis_count, .. } => match axis_count
        {
            Some(count) => FieldValue::Axes(vec![String::new(); *count]),
            None => FieldValue::Text(String::new()),
        },
        FieldKind::Checkbox => FieldValue::Bool(false),
        FieldKind::Select { options, .. } => {
            FieldValue::Select(options.keys().next().cloned().unwrap_or_default())
        }
        FieldKind::List => FieldValue::List(Vec::new()),
        FieldKind::Color => FieldValue::Color(DEFAULT_COLOR.to_string()),
        FieldKind::Image { .. } => FieldValue::Image(None),
        FieldKind::Gradient => FieldValue::Gradient(vec![
            GradientStop::new(0.0, DEFAULT_COLOR),
            GradientStop::new(100.0, DEFAULT_COLOR),
        ]),
        FieldKind::Curve => FieldValue::Curve(None),
    }
}

/// Like [`decode_value`], but layout defaults for axis inputs must be plain numbers;
/// expressions are only accepted from edits and snapshots.
pub(crate) fn decode_default(kind: &FieldKind, value: &Value) -> Result<FieldValue, String> {
    match kind.axis_count() {
        Some(count) => decode_axes(value, count, true),
        None => decode_value(kind, value),
    }
}

/// Structural conversion of a JSON value into the shape `kind` expects.
pub(crate) fn decode_value(kind: &FieldKind, value: &Value) -> Result<FieldValue, String> {
    match kind {
        FieldKind::Text { axis_count } => match axis_count {
            Some(count) => decode_axes(value, *count, false),
            None => decode_scalar(value, false).map(FieldValue::Text),
        },
        FieldKind::Number { axis_count, .. } => match axis_count {
            Some(count) => decode_axes(value, *count, true),
            None => decode_scalar(value, true).map(FieldValue::Text),
        },
        FieldKind::Checkbox => value
            .as_bool()
            .map(FieldValue::Bool)
            .ok_or_else(|| format!("expected a boolean, found {value}")),
        FieldKind::Select { .. } => value
            .as_str()
            .map(|key| FieldValue::Select(key.to_string()))
            .ok_or_else(|| format!("expected an option key, found {value}")),
        FieldKind::List => {
            let items = value
                .as_array()
                .ok_or_else(|| format!("expected a list of strings, found {value}"))?;
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| format!("list entry {item} is not a string"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List)
        }
        FieldKind::Color => value
            .as_str()
            .map(|color| FieldValue::Color(color.to_string()))
            .ok_or_else(|| format!("expected a colour string, found {value}")),
        FieldKind::Image { .. } => match value {
            Value::Null => Ok(FieldValue::Image(None)),
            Value::String(source) => Ok(FieldValue::Image(Some(source.clone()))),
            other => Err(format!("expected an image source, found {other}")),
        },
        FieldKind::Gradient => serde_json::from_value::<Vec<GradientStop>>(value.clone())
            .map(FieldValue::Gradient)
            .map_err(|err| format!("expected a list of gradient stops: {err}")),
        FieldKind::Curve => match value {
            Value::Null => Ok(FieldValue::Curve(None)),
            Value::String(id) => Ok(FieldValue::Curve(Some(id.clone()))),
            other => Err(format!("expected a curve id, found {other}")),
        },
    }
}

fn decode_scalar(value: &Value, numeric: bool) -> Result<String, String> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) if !numeric => Ok(text.clone()),
        other if numeric => Err(format!("expected a number, found {other}")),
        other => Err(format!("expected a number or expression, found {other}")),
    }
}

fn decode_axes(value: &Value, count: usize, numeric: bool) -> Result<FieldValue, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected {count} values, found {value}"))?;
    if items.len() != count {
        return Err(format!("expected {count} values, found {}", items.len()));
    }
    items
        .iter()
        .map(|item| decode_scalar(item, numeric))
        .collect::<Result<Vec<_>, _>>()
        .map(FieldValue::Axes)
}

/// Export representation used by snapshot documents. Blank inputs are omitted.
pub(crate) fn encode_value(value: &FieldValue) -> Option<Value> {
    match value {
        FieldValue::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| scalar_to_json(trimmed))
        }
        FieldValue::Axes(axes) => {
            if axes.iter().all(|axis| axis.trim().is_empty()) {
                return None;
            }
            let items = axes
                .iter()
                .map(|axis| match axis.trim() {
                    "" => Value::from(0),
                    trimmed => scalar_to_json(trimmed),
                })
                .collect();
            Some(Value::Array(items))
        }
        FieldValue::Bool(flag) => Some(Value::Bool(*flag)),
        FieldValue::Select(key) => Some(Value::String(key.clone())),
        FieldValue::List(items) => {
            let items = items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect::<Vec<_>>();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        FieldValue::Color(color) => Some(Value::String(color.clone())),
        FieldValue::Image(source) | FieldValue::Curve(source) => {
            source.as_ref().map(|source| Value::String(source.clone()))
        }
        FieldValue::Gradient(stops) => serde_json::to_value(stops).ok(),
    }
}

/// Numbers stay numbers; anything else is kept as a MoLang expression.
fn scalar_to_json(text: &str) -> Value {
    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

/// Interpret raw text typed into an input of the given kind.
pub(crate) fn parse_input(kind: &FieldKind, raw: &str) -> Result<FieldValue, String> {
    let trimmed = raw.trim();
    match kind {
        FieldKind::Text { axis_count } | FieldKind::Number { axis_count, .. } => {
            Ok(match axis_count {
                Some(_) => FieldValue::Axes(split_top_level(raw)),
                None => FieldValue::Text(trimmed.to_string()),
            })
        }
        FieldKind::Checkbox => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(FieldValue::Bool(true)),
            "false" | "0" | "off" | "no" => Ok(FieldValue::Bool(false)),
            _ => Err(format!("'{trimmed}' is not a valid boolean")),
        },
        FieldKind::Select { .. } => Ok(FieldValue::Select(trimmed.to_string())),
        FieldKind::List => Ok(FieldValue::List(
            split_top_level(raw)
                .into_iter()
                .filter(|item| !item.is_empty())
                .collect(),
        )),
        FieldKind::Color => Ok(FieldValue::Color(trimmed.to_string())),
        FieldKind::Image { .. } => Ok(FieldValue::Image(optional(trimmed))),
        FieldKind::Curve => Ok(FieldValue::Curve(optional(trimmed))),
        FieldKind::Gradient => split_top_level(raw)
            .into_iter()
            .filter(|stop| !stop.is_empty())
            .map(|stop| {
                let (percent, color) = stop
                    .split_once(':')
                    .ok_or_else(|| format!("gradient stop '{stop}' must look like 50:#ff0000"))?;
                let percent = percent
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a valid percentage", percent.trim()))?;
                Ok(GradientStop::new(percent, color.trim()))
            })
            .collect::<Result<Vec<_>, String>>()
            .map(FieldValue::Gradient),
    }
}

fn optional(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// Split on commas that are not nested inside parentheses or brackets, so
/// `math.random(0, 1), 2` yields two entries.
fn split_top_level(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in raw.chars() {
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    parts.push(current.trim().to_string());
    parts
}

/// Kind, option and range checks applied to every value before it is stored.
pub(crate) fn check_value(
    path: &FieldPath,
    kind: &FieldKind,
    value: &FieldValue,
) -> Result<(), RegistryError> {
    match (kind, value) {
        (FieldKind::Text { axis_count: None }, FieldValue::Text(_)) => Ok(()),
        (
            FieldKind::Text {
                axis_count: Some(count),
            },
            FieldValue::Axes(axes),
        ) => check_axis_count(path, *count, axes),
        (
            FieldKind::Number {
                axis_count: None,
                min,
                max,
            },
            FieldValue::Text(text),
        ) => check_number(path, text, *min, *max),
        (
            FieldKind::Number {
                axis_count: Some(count),
                min,
                max,
            },
            FieldValue::Axes(axes),
        ) => {
            check_axis_count(path, *count, axes)?;
            axes.iter()
                .try_for_each(|axis| check_number(path, axis, *min, *max))
        }
        (FieldKind::Checkbox, FieldValue::Bool(_)) => Ok(()),
        (FieldKind::Select { options, .. }, FieldValue::Select(key)) => {
            if options.contains_key(key) {
                Ok(())
            } else {
                Err(RegistryError::UnknownOption {
                    path: path.clone(),
                    option: key.clone(),
                })
            }
        }
        (FieldKind::List, FieldValue::List(_)) => Ok(()),
        (FieldKind::Color, FieldValue::Color(color)) => check_color(path, color),
        (FieldKind::Image { .. }, FieldValue::Image(_)) => Ok(()),
        (FieldKind::Gradient, FieldValue::Gradient(stops)) => {
            for stop in stops {
                if !(0.0..=100.0).contains(&stop.percent) {
                    return Err(RegistryError::InvalidValue {
                        path: path.clone(),
                        message: format!("gradient stop at {}% is outside 0..=100", stop.percent),
                    });
                }
                check_color(path, &stop.color)?;
            }
            Ok(())
        }
        (FieldKind::Curve, FieldValue::Curve(_)) => Ok(()),
        (kind, value) => Err(RegistryError::KindMismatch {
            path: path.clone(),
            expected: expected_variant(kind),
            found: value.variant_name(),
        }),
    }
}

fn expected_variant(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Text { axis_count } | FieldKind::Number { axis_count, .. } => {
            if axis_count.is_some() {
                "axes"
            } else {
                "text"
            }
        }
        other => other.name(),
    }
}

fn check_axis_count(path: &FieldPath, expected: usize, axes: &[String]) -> Result<(), RegistryError> {
    if axes.len() == expected {
        Ok(())
    } else {
        Err(RegistryError::AxisCount {
            path: path.clone(),
            expected,
            found: axes.len(),
        })
    }
}

fn check_number(
    path: &FieldPath,
    text: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), RegistryError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let number = trimmed
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| RegistryError::InvalidNumber {
            path: path.clone(),
            message: format!("'{trimmed}' is not a valid number"),
        })?;
    if let Some(min) = min
        && number < min
    {
        return Err(RegistryError::InvalidNumber {
            path: path.clone(),
            message: format!("{number} is below the minimum of {min}"),
        });
    }
    if let Some(max) = max
        && number > max
    {
        return Err(RegistryError::InvalidNumber {
            path: path.clone(),
            message: format!("{number} is above the maximum of {max}"),
        });
    }
    Ok(())
}

fn check_color(path: &FieldPath, color: &str) -> Result<(), RegistryError> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        Err(RegistryError::InvalidValue {
            path: path.clone(),
            message: format!("'{color}' is not a #rrggbb colour"),
        })
    }
}
