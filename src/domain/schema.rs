use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::unique::unique_keys;

/// Complete layout of the editor: subjects, their groups and every input.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutDefinition {
    #[serde(deserialize_with = "unique_keys")]
    pub subjects: IndexMap<String, SubjectDefinition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubjectDefinition {
    pub label: String,
    #[serde(deserialize_with = "unique_keys")]
    pub groups: IndexMap<String, GroupDefinition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GroupDefinition {
    pub label: String,
    #[serde(default)]
    pub folded: bool,
    #[serde(flatten)]
    pub body: GroupBody,
}

/// A group either lists fixed inputs or manages a free list of curves.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBody {
    Inputs(#[serde(deserialize_with = "unique_keys")] IndexMap<String, FieldDefinition>),
    Curves(Vec<CurveDefinition>),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_modes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, usually a MoLang expression. `axis_count` turns it into a vector.
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        axis_count: Option<usize>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        axis_count: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Checkbox,
    Select {
        #[serde(deserialize_with = "unique_keys")]
        options: IndexMap<String, String>,
        #[serde(
            default,
            rename = "mode_groups",
            skip_serializing_if = "Option::is_none"
        )]
        mode_group: Option<ModeGroup>,
    },
    List,
    Color,
    Image {
        #[serde(default = "default_true")]
        allow_upload: bool,
    },
    Gradient,
    Curve,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Select { .. } => "select",
            FieldKind::List => "list",
            FieldKind::Color => "color",
            FieldKind::Image { .. } => "image",
            FieldKind::Gradient => "gradient",
            FieldKind::Curve => "curve",
        }
    }

    pub fn axis_count(&self) -> Option<usize> {
        match self {
            FieldKind::Text { axis_count } | FieldKind::Number { axis_count, .. } => *axis_count,
            _ => None,
        }
    }
}

/// `[subject, group]` tag naming the group whose mode a select field drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ModeGroup(pub String, pub String);

impl ModeGroup {
    pub fn new(subject: impl Into<String>, group: impl Into<String>) -> Self {
        Self(subject.into(), group.into())
    }

    pub fn subject(&self) -> &str {
        &self.0
    }

    pub fn group(&self) -> &str {
        &self.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveMode {
    #[default]
    Linear,
    Bezier,
    CatmullRom,
    BezierChain,
}

/// Named MoLang curve. Only the data is kept here; evaluation lives elsewhere.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CurveDefinition {
    pub id: String,
    #[serde(default)]
    pub mode: CurveMode,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub nodes: Vec<f64>,
}

impl CurveDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode: CurveMode::default(),
            input: String::new(),
            range: String::new(),
            nodes: Vec::new(),
        }
    }

    /// Snapshot entry for this curve.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "mode": self.mode,
            "input": self.input,
            "range": self.range,
            "nodes": self.nodes,
        })
    }
}

fn default_true() -> bool {
    true
}

fn is_false(flag: &bool) -> bool {
    !*flag
}
