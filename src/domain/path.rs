use std::{fmt, str::FromStr};

use crate::form::RegistryError;

/// Address of one input: `subject.group.field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    pub subject: String,
    pub group: String,
    pub field: String,
}

impl FieldPath {
    pub fn new(
        subject: impl Into<String>,
        group: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            group: group.into(),
            field: field.into(),
        }
    }

    pub fn is(&self, subject: &str, group: &str, field: &str) -> bool {
        self.subject == subject && self.group == group && self.field == field
    }

    /// JSON pointer of the field inside a snapshot document.
    pub fn pointer(&self) -> String {
        format!("/{}/{}/{}", self.subject, self.group, self.field)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.subject, self.group, self.field)
    }
}

impl FromStr for FieldPath {
    type Err = RegistryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts = raw.split('.').map(str::trim).collect::<Vec<_>>();
        match parts.as_slice() {
            [subject, group, field]
                if !subject.is_empty() && !group.is_empty() && !field.is_empty() =>
            {
                Ok(FieldPath::new(*subject, *group, *field))
            }
            _ => Err(RegistryError::InvalidPath(raw.to_string())),
        }
    }
}
