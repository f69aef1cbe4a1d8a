use std::fmt;

use crate::domain::FieldPath;

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// A subject, group, field or curve is not part of the registry.
    NotFound { path: String },
    InvalidPath(String),
    /// A default value does not match its field's kind or axis count.
    InvalidDefault { path: FieldPath, message: String },
    /// `enabled_modes` references a value no gating select can produce.
    UnknownMode { path: FieldPath, mode: String },
    InvalidLayout { location: String, message: String },
    KindMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },
    UnknownOption { path: FieldPath, option: String },
    AxisCount {
        path: FieldPath,
        expected: usize,
        found: usize,
    },
    InvalidNumber { path: FieldPath, message: String },
    InvalidValue { path: FieldPath, message: String },
    Required { path: FieldPath },
    DuplicateCurve { id: String },
    InvalidCurve { id: String, message: String },
}

impl RegistryError {
    pub(crate) fn not_found(segments: &[&str]) -> Self {
        RegistryError::NotFound {
            path: segments.join("."),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound { path } => write!(f, "{path}: not found"),
            RegistryError::InvalidPath(raw) => {
                write!(f, "'{raw}' is not a subject.group.field path")
            }
            RegistryError::InvalidDefault { path, message } => {
                write!(f, "{path}: invalid default: {message}")
            }
            RegistryError::UnknownMode { path, mode } => {
                write!(f, "{path}: enabled mode '{mode}' is not offered by any mode select")
            }
            RegistryError::InvalidLayout { location, message } => {
                write!(f, "{location}: {message}")
            }
            RegistryError::KindMismatch {
                path,
                expected,
                found,
            } => write!(f, "{path}: expected a {expected} value, found {found}"),
            RegistryError::UnknownOption { path, option } => {
                write!(f, "{path}: '{option}' is not one of the available options")
            }
            RegistryError::AxisCount {
                path,
                expected,
                found,
            } => write!(f, "{path}: expected {expected} axes, found {found}"),
            RegistryError::InvalidNumber { path, message }
            | RegistryError::InvalidValue { path, message } => write!(f, "{path}: {message}"),
            RegistryError::Required { path } => write!(f, "{path}: a value is required"),
            RegistryError::DuplicateCurve { id } => write!(f, "curve '{id}' already exists"),
            RegistryError::InvalidCurve { id, message } => write!(f, "curve '{id}': {message}"),
        }
    }
}

impl std::error::Error for RegistryError {}
