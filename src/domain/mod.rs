mod parser;
mod path;
mod schema;
mod unique;

pub use parser::{parse_layout, parse_layout_str};
pub use path::FieldPath;
pub use schema::{
    CurveDefinition, CurveMode, FieldDefinition, FieldKind, GroupBody, GroupDefinition,
    LayoutDefinition, ModeGroup, SubjectDefinition,
};
