mod convert;
mod value;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{FieldDefinition, FieldKind, FieldPath, ModeGroup};

use super::error::RegistryError;

pub use value::{FieldValue, GradientStop};

#[derive(Debug, Clone)]
pub struct FieldState {
    pub path: FieldPath,
    pub definition: FieldDefinition,
    pub value: FieldValue,
    /// Result of mode gating; always true for fields without `enabled_modes`.
    pub enabled: bool,
    pub dirty: bool,
    pub error: Option<String>,
}

impl FieldState {
    /// Build the runtime state of a field, failing fast when its default does not fit.
    pub fn from_definition(
        path: FieldPath,
        definition: FieldDefinition,
    ) -> Result<Self, RegistryError> {
        if let Some(0) = definition.kind.axis_count() {
            return Err(RegistryError::InvalidDefault {
                path,
                message: "axis_count must be at least 1".to_string(),
            });
        }
        let value = match definition.value.as_ref() {
            Some(default) => {
                let value = convert::decode_default(&definition.kind, default).map_err(|message| {
                    RegistryError::InvalidDefault {
                        path: path.clone(),
                        message,
                    }
                })?;
                convert::check_value(&path, &definition.kind, &value).map_err(|err| {
                    RegistryError::InvalidDefault {
                        path: path.clone(),
                        message: err.to_string(),
                    }
                })?;
                value
            }
            None => convert::blank_value(&definition.kind),
        };
        Ok(Self {
            path,
            definition,
            value,
            enabled: true,
            dirty: false,
            error: None,
        })
    }

    pub fn key(&self) -> &str {
        &self.path.field
    }

    pub fn kind(&self) -> &FieldKind {
        &self.definition.kind
    }

    pub fn label(&self) -> &str {
        self.definition.label.as_deref().unwrap_or(&self.path.field)
    }

    pub fn is_required(&self) -> bool {
        self.definition.required
    }

    pub fn options(&self) -> Option<&IndexMap<String, String>> {
        match &self.definition.kind {
            FieldKind::Select { options, .. } => Some(options),
            _ => None,
        }
    }

    /// The group this select drives, if it is a mode select.
    pub fn mode_group(&self) -> Option<&ModeGroup> {
        match &self.definition.kind {
            FieldKind::Select { mode_group, .. } => mode_group.as_ref(),
            _ => None,
        }
    }

    pub fn enabled_modes(&self) -> Option<&[String]> {
        self.definition.enabled_modes.as_deref()
    }

    pub fn selected_key(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Select(key) => Some(key),
            _ => None,
        }
    }

    /// Whether uploads are offered for an image input.
    pub fn allows_upload(&self) -> bool {
        matches!(
            self.definition.kind,
            FieldKind::Image { allow_upload: true }
        )
    }

    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(text) | FieldValue::Color(text) => text.clone(),
            FieldValue::Axes(axes) => format!("[{}]", axes.join(", ")),
            FieldValue::Bool(flag) => flag.to_string(),
            FieldValue::Select(key) => self
                .options()
                .and_then(|options| options.get(key))
                .cloned()
                .unwrap_or_else(|| "<none>".to_string()),
            FieldValue::List(items) => format!("[{}]", items.join(", ")),
            FieldValue::Image(source) | FieldValue::Curve(source) => {
                source.clone().unwrap_or_else(|| "<none>".to_string())
            }
            FieldValue::Gradient(stops) => stops
                .iter()
                .map(|stop| format!("{}%: {}", stop.percent, stop.color))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Snapshot representation; `None` for blank inputs.
    pub fn current_value(&self) -> Option<Value> {
        convert::encode_value(&self.value)
    }

    /// Interpret text typed into this input. The result still has to pass `check`.
    pub fn parse_input(&self, raw: &str) -> Result<FieldValue, RegistryError> {
        convert::parse_input(&self.definition.kind, raw).map_err(|message| {
            RegistryError::InvalidValue {
                path: self.path.clone(),
                message,
            }
        })
    }

    /// Validate a candidate value without storing it.
    pub fn check(&self, value: &FieldValue) -> Result<(), RegistryError> {
        convert::check_value(&self.path, &self.definition.kind, value)?;
        if self.definition.required && value.has_blank() {
            return Err(RegistryError::Required {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn replace(&mut self, value: FieldValue) -> FieldValue {
        self.after_edit();
        std::mem::replace(&mut self.value, value)
    }

    /// Load a value from a snapshot document. Seeding does not mark the field dirty.
    pub fn seed_value(&mut self, value: &Value) -> Result<(), RegistryError> {
        let decoded = convert::decode_value(&self.definition.kind, value).map_err(|message| {
            RegistryError::InvalidValue {
                path: self.path.clone(),
                message,
            }
        })?;
        convert::check_value(&self.path, &self.definition.kind, &decoded)?;
        self.value = decoded;
        self.dirty = false;
        self.error = None;
        Ok(())
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    fn after_edit(&mut self) {
        self.dirty = true;
        self.error = None;
    }
}
