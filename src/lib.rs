#![deny(rust_2018_idioms)]

mod domain;
mod editor;
mod events;
mod form;
mod io;
mod preview;
mod schema;
mod validation;


pub use domain::{
    CurveDefinition, CurveMode, FieldDefinition, FieldKind, FieldPath, GroupBody,
    GroupDefinition, LayoutDefinition, ModeGroup, SubjectDefinition, parse_layout,
    parse_layout_str,
};
pub use editor::{Editor, EditorError};
pub use events::{FieldObserver, HookError, ObserverBus};
pub use form::{
    FieldChanged, FieldState, FieldValue, GradientStop, GroupContent, GroupState, InputRegistry,
    RegistryError, SubjectState,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_str, read_document,
    read_layout, render,
};
pub use preview::{
    EmitterMode, EmitterPreview, EmitterPreviewUpdater, EmitterShape, MaterialRefresher,
    MaterialSink, TextureSource, VariableParser,
};
pub use schema::{RegistryOptions, SNOWSTORM_LAYOUT, build_registry, snowstorm_layout};
pub use validation::{SnapshotIssue, ValidationOutcome, snapshot_schema, validate_snapshot};

pub mod prelude {
    pub use super::{
        Editor, FieldPath, FieldValue, InputRegistry, RegistryError, RegistryOptions,
    };
}
