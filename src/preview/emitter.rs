use crate::{
    events::{FieldObserver, HookError},
    form::{FieldChanged, FieldValue},
};

use super::EmitterPreview;

/// Mirrors the emitter lifetime and shape inputs into the preview.
#[derive(Debug, Clone, Default)]
pub struct EmitterPreviewUpdater;

impl FieldObserver for EmitterPreviewUpdater {
    fn field_changed(
        &mut self,
        change: &FieldChanged,
        preview: &mut EmitterPreview,
    ) -> Result<(), HookError> {
        let path = &change.path;
        if path.subject != "emitter" {
            return Ok(());
        }
        match (path.group.as_str(), path.field.as_str(), &change.value) {
            ("lifetime", "mode", FieldValue::Select(mode)) => {
                preview.mode = mode
                    .parse()
                    .map_err(|message: String| HookError::new(path, message))?;
            }
            ("lifetime", "active_time", FieldValue::Text(expr)) => {
                preview.active_time = expr.clone();
            }
            ("lifetime", "sleep_time", FieldValue::Text(expr)) => {
                preview.sleep_time = expr.clone();
            }
            ("shape", "mode", FieldValue::Select(shape)) => {
                preview.shape = shape
                    .parse()
                    .map_err(|message: String| HookError::new(path, message))?;
            }
            _ => {}
        }
        Ok(())
    }
}
