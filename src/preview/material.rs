use crate::{
    events::{FieldObserver, HookError},
    form::{FieldChanged, FieldValue},
};

use super::EmitterPreview;

/// Texture inputs the material is built from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextureSource {
    pub path: Option<String>,
    /// Uploaded image data (usually a data URL); wins over `path` when set.
    pub image: Option<String>,
}

/// Material system of the host renderer.
pub trait MaterialSink {
    fn update_material(&mut self, texture: &TextureSource) -> Result<(), HookError>;
}

impl<F> MaterialSink for F
where
    F: FnMut(&TextureSource) -> Result<(), HookError>,
{
    fn update_material(&mut self, texture: &TextureSource) -> Result<(), HookError> {
        self(texture)
    }
}

/// Rebuilds the material whenever the texture path or image changes.
#[derive(Debug)]
pub struct MaterialRefresher<S> {
    sink: S,
}

impl<S: MaterialSink> MaterialRefresher<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: MaterialSink> FieldObserver for MaterialRefresher<S> {
    fn field_changed(
        &mut self,
        change: &FieldChanged,
        preview: &mut EmitterPreview,
    ) -> Result<(), HookError> {
        if change.path.subject != "particle" || change.path.group != "texture" {
            return Ok(());
        }
        match (change.path.field.as_str(), &change.value) {
            ("path", FieldValue::Text(path)) => {
                let path = path.trim();
                preview.texture.path = (!path.is_empty()).then(|| path.to_string());
            }
            ("image", FieldValue::Image(image)) => {
                preview.texture.image = image.clone();
            }
            _ => return Ok(()),
        }
        self.sink.update_material(&preview.texture)?;
        preview.material_revision += 1;
        Ok(())
    }
}
