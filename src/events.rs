use std::fmt;

use crate::{domain::FieldPath, form::FieldChanged, preview::EmitterPreview};

/// Failure raised by an observer. It aborts the edit that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct HookError {
    pub path: FieldPath,
    pub message: String,
}

impl HookError {
    pub fn new(path: &FieldPath, message: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl std::error::Error for HookError {}

/// Reacts to accepted edits by updating the live preview.
pub trait FieldObserver {
    fn field_changed(
        &mut self,
        change: &FieldChanged,
        preview: &mut EmitterPreview,
    ) -> Result<(), HookError>;
}

impl<F> FieldObserver for F
where
    F: FnMut(&FieldChanged, &mut EmitterPreview) -> Result<(), HookError>,
{
    fn field_changed(
        &mut self,
        change: &FieldChanged,
        preview: &mut EmitterPreview,
    ) -> Result<(), HookError> {
        self(change, preview)
    }
}

#[derive(Default)]
pub struct ObserverBus {
    observers: Vec<Box<dyn FieldObserver>>,
}

impl ObserverBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FieldObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify observers in subscription order, stopping at the first failure.
    pub fn dispatch(
        &mut self,
        change: &FieldChanged,
        preview: &mut EmitterPreview,
    ) -> Result<(), HookError> {
        for observer in &mut self.observers {
            observer.field_changed(change, preview)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ObserverBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}
