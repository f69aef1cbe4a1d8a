mod actions;
mod error;
mod field;
mod group;
mod registry;

pub use actions::FieldChanged;
pub use error::RegistryError;
pub use field::{FieldState, FieldValue, GradientStop};
pub use group::{GroupContent, GroupState, SubjectState};
pub use registry::InputRegistry;

pub(crate) use registry::check_curves;
