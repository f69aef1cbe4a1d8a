use crate::domain::FieldPath;

use super::field::FieldValue;

/// Emitted for every accepted edit; observers react to it instead of hooks living
/// inside the field definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChanged {
    pub path: FieldPath,
    pub previous: FieldValue,
    pub value: FieldValue,
}

impl FieldChanged {
    pub fn is(&self, subject: &str, group: &str, field: &str) -> bool {
        self.path.is(subject, group, field)
    }
}
