use anyhow::{Context, Result};
use jsonschema::validator_for;
use serde_json::{Map, Value, json};

use crate::{
    domain::FieldKind,
    form::{FieldState, GroupContent, GroupState, InputRegistry, RegistryError},
};

const HEX_COLOR_PATTERN: &str = "^#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$";

/// One problem found in a snapshot document.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotIssue {
    pub pointer: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ValidationOutcome {
    Valid,
    Invalid { issues: Vec<SnapshotIssue> },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// JSON Schema describing complete snapshot documents as the registry exports them.
/// Required inputs that are gated by a mode are only required when that mode is
/// selected.
pub fn snapshot_schema(registry: &InputRegistry) -> Value {
    let mut subjects = Map::new();
    for subject in registry.subjects() {
        let mut groups = Map::new();
        for group in subject.groups.values() {
            groups.insert(group.id.clone(), group_schema(registry, &subject.id, group));
        }
        let required = groups.keys().cloned().collect::<Vec<_>>();
        subjects.insert(
            subject.id.clone(),
            json!({
                "title": subject.label,
                "type": "object",
                "properties": groups,
                "required": required,
                "additionalProperties": false,
            }),
        );
    }
    let required = subjects.keys().cloned().collect::<Vec<_>>();
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": subjects,
        "required": required,
        "additionalProperties": false,
    })
}

fn group_schema(registry: &InputRegistry, subject: &str, group: &GroupState) -> Value {
    let inputs = match &group.content {
        GroupContent::Curves(_) => return curves_schema(&group.label),
        GroupContent::Inputs(inputs) => inputs,
    };

    let properties = inputs
        .iter()
        .map(|(key, field)| (key.clone(), field_schema(field)))
        .collect::<Map<_, _>>();
    let always_required = inputs
        .values()
        .filter(|field| field.is_required() && field.enabled_modes().is_none())
        .map(|field| Value::String(field.key().to_string()))
        .collect::<Vec<_>>();

    let mut schema = json!({
        "title": group.label,
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    });
    if !always_required.is_empty() {
        schema["required"] = Value::Array(always_required);
    }

    // Gates living in another group cannot be expressed with if/then here.
    let gate = registry
        .gate_for(subject, &group.id)
        .filter(|path| path.subject == subject && path.group == group.id)
        .and_then(|path| inputs.get(&path.field));
    if let Some(gate) = gate {
        let conditions = gate
            .options()
            .into_iter()
            .flat_map(|options| options.keys())
            .filter_map(|mode| {
                let required = inputs
                    .values()
                    .filter(|field| field.is_required())
                    .filter(|field| {
                        field
                            .enabled_modes()
                            .is_some_and(|modes| modes.iter().any(|m| m == mode))
                    })
                    .map(|field| Value::String(field.key().to_string()))
                    .collect::<Vec<_>>();
                (!required.is_empty()).then(|| {
                    json!({
                        "if": {
                            "properties": { gate.key(): { "const": mode } },
                            "required": [gate.key()],
                        },
                        "then": { "required": required },
                    })
                })
            })
            .collect::<Vec<_>>();
        if !conditions.is_empty() {
            schema["allOf"] = Value::Array(conditions);
        }
    }
    schema
}

fn field_schema(field: &FieldState) -> Value {
    let mut schema = match field.kind() {
        FieldKind::Text { axis_count } => {
            scalar_or_axes(json!({"type": ["string", "number"]}), *axis_count)
        }
        FieldKind::Number {
            axis_count,
            min,
            max,
        } => {
            let mut number = json!({"type": "number"});
            if let Some(min) = min {
                number["minimum"] = json!(min);
            }
            if let Some(max) = max {
                number["maximum"] = json!(max);
            }
            scalar_or_axes(number, *axis_count)
        }
        FieldKind::Checkbox => json!({"type": "boolean"}),
        FieldKind::Select { options, .. } => json!({
            "type": "string",
            "enum": options.keys().collect::<Vec<_>>(),
        }),
        FieldKind::List => json!({"type": "array", "items": {"type": "string"}}),
        FieldKind::Color => json!({"type": "string", "pattern": HEX_COLOR_PATTERN}),
        FieldKind::Image { .. } | FieldKind::Curve => json!({"type": "string"}),
        FieldKind::Gradient => json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "percent": {"type": "number", "minimum": 0, "maximum": 100},
                    "color": {"type": "string", "pattern": HEX_COLOR_PATTERN},
                },
                "required": ["percent", "color"],
            },
        }),
    };
    schema["title"] = json!(field.label());
    if let Some(info) = field.definition.info.as_ref() {
        schema["description"] = json!(info);
    }
    if let Some(default) = field.definition.value.as_ref() {
        schema["default"] = default.clone();
    }
    schema
}

fn scalar_or_axes(scalar: Value, axis_count: Option<usize>) -> Value {
    match axis_count {
        Some(count) => json!({
            "type": "array",
            "items": scalar,
            "minItems": count,
            "maxItems": count,
        }),
        None => scalar,
    }
}

fn curves_schema(label: &str) -> Value {
    json!({
        "title": label,
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "mode": {"enum": ["linear", "bezier", "catmull_rom", "bezier_chain"]},
                "input": {"type": "string"},
                "range": {"type": "string"},
                "nodes": {"type": "array", "items": {"type": "number"}},
            },
            "required": ["id"],
        },
    })
}

/// Check a snapshot document against the schema and against the registry's own
/// value rules (option keys, ranges, duplicate curves).
pub fn validate_snapshot(registry: &InputRegistry, document: &Value) -> Result<ValidationOutcome> {
    let schema = snapshot_schema(registry);
    let validator = validator_for(&schema).context("failed to compile snapshot schema")?;

    let mut issues = validator
        .iter_errors(document)
        .map(|error| SnapshotIssue {
            pointer: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect::<Vec<_>>();

    if issues.is_empty()
        && let Err(err) = registry.clone().seed_from_value(document)
    {
        issues.push(SnapshotIssue {
            pointer: issue_pointer(&err),
            message: err.to_string(),
        });
    }

    if issues.is_empty() {
        Ok(ValidationOutcome::Valid)
    } else {
        Ok(ValidationOutcome::Invalid { issues })
    }
}

fn issue_pointer(err: &RegistryError) -> String {
    match err {
        RegistryError::InvalidDefault { path, .. }
        | RegistryError::UnknownMode { path, .. }
        | RegistryError::KindMismatch { path, .. }
        | RegistryError::UnknownOption { path, .. }
        | RegistryError::AxisCount { path, .. }
        | RegistryError::InvalidNumber { path, .. }
        | RegistryError::InvalidValue { path, .. }
        | RegistryError::Required { path } => path.pointer(),
        RegistryError::InvalidLayout { location, .. } => {
            format!("/{}", location.replace('.', "/"))
        }
        RegistryError::NotFound { .. }
        | RegistryError::InvalidPath(_)
        | RegistryError::DuplicateCurve { .. }
        | RegistryError::InvalidCurve { .. } => String::new(),
    }
}
