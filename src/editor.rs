use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    domain::FieldPath,
    events::{FieldObserver, HookError, ObserverBus},
    form::{FieldChanged, FieldState, FieldValue, InputRegistry, RegistryError},
    preview::{EmitterPreview, EmitterPreviewUpdater, VariableParser},
};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorError {
    Registry(RegistryError),
    Hook(HookError),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Registry(err) => err.fmt(f),
            EditorError::Hook(err) => write!(f, "preview update failed: {err}"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Registry(err) => Some(err),
            EditorError::Hook(err) => Some(err),
        }
    }
}

impl From<RegistryError> for EditorError {
    fn from(err: RegistryError) -> Self {
        EditorError::Registry(err)
    }
}

impl From<HookError> for EditorError {
    fn from(err: HookError) -> Self {
        EditorError::Hook(err)
    }
}

/// Editing session: the registry, the preview it drives and the observers between them.
///
/// Edits are transactional. Observers run against a working copy of the preview, and
/// if any of them fails the field value and its gating are rolled back and the
/// preview is left as it was. Side effects an observer performs outside the preview
/// (for example through a [`MaterialSink`](crate::MaterialSink)) are not undone.
#[derive(Debug)]
pub struct Editor {
    registry: InputRegistry,
    preview: EmitterPreview,
    observers: ObserverBus,
}

impl Editor {
    pub fn new(registry: InputRegistry) -> Self {
        Self {
            registry,
            preview: EmitterPreview::default(),
            observers: ObserverBus::new(),
        }
    }

    pub fn with_observer(mut self, observer: impl FieldObserver + 'static) -> Self {
        self.observers.subscribe(observer);
        self
    }

    /// Subscribe the variable parser and the emitter lifetime/shape updater.
    pub fn with_default_observers(self) -> Self {
        self.with_observer(VariableParser)
            .with_observer(EmitterPreviewUpdater)
    }

    pub fn subscribe(&mut self, observer: impl FieldObserver + 'static) {
        self.observers.subscribe(observer);
    }

    pub fn registry(&self) -> &InputRegistry {
        &self.registry
    }

    pub fn preview(&self) -> &EmitterPreview {
        &self.preview
    }

    pub fn into_parts(self) -> (InputRegistry, EmitterPreview) {
        (self.registry, self.preview)
    }

    pub fn set(&mut self, path: &FieldPath, value: FieldValue) -> Result<FieldChanged, EditorError> {
        let prior = self.prior_state(path)?;
        let change = self.registry.set_value(path, value).inspect_err(|err| {
            warn!(field = %path, error = %err, "edit rejected");
        })?;
        self.commit(change, prior)
    }

    /// Apply raw text typed into an input.
    pub fn set_input(&mut self, path: &FieldPath, raw: &str) -> Result<FieldChanged, EditorError> {
        let prior = self.prior_state(path)?;
        let change = self.registry.set_input(path, raw).inspect_err(|err| {
            warn!(field = %path, error = %err, "edit rejected");
        })?;
        self.commit(change, prior)
    }

    fn prior_state(&self, path: &FieldPath) -> Result<FieldState, EditorError> {
        let field = self.registry.field(path).inspect_err(|err| {
            warn!(field = %path, error = %err, "edit rejected");
        })?;
        Ok(field.clone())
    }

    fn commit(
        &mut self,
        change: FieldChanged,
        prior: FieldState,
    ) -> Result<FieldChanged, EditorError> {
        let mut working = self.preview.clone();
        match self.observers.dispatch(&change, &mut working) {
            Ok(()) => {
                self.preview = working;
                Ok(change)
            }
            Err(err) => {
                warn!(field = %change.path, error = %err, "observer failed, edit rolled back");
                self.registry.restore(prior)?;
                Err(err.into())
            }
        }
    }

    /// Replay every input through the observers so the preview reflects the current
    /// values, e.g. defaults right after startup.
    pub fn sync_preview(&mut self) -> Result<(), EditorError> {
        let mut working = self.preview.clone();
        for field in self.registry.fields() {
            let change = FieldChanged {
                path: field.path.clone(),
                previous: field.value.clone(),
                value: field.value.clone(),
            };
            self.observers.dispatch(&change, &mut working)?;
        }
        self.preview = working;
        debug!(observers = self.observers.len(), "preview synchronized");
        Ok(())
    }

    pub fn validate(&mut self) -> Vec<RegistryError> {
        self.registry.validate()
    }

    pub fn snapshot(&self) -> Value {
        self.registry.snapshot()
    }

    /// Load a snapshot document and resync the preview. Nothing changes on failure.
    pub fn load_snapshot(&mut self, document: &Value) -> Result<(), EditorError> {
        let backup = self.registry.clone();
        self.registry.seed_from_value(document)?;
        if let Err(err) = self.sync_preview() {
            self.registry = backup;
            return Err(err);
        }
        Ok(())
    }
}
