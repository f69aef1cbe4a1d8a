//! Live emitter preview and the observers that keep it in sync with the inputs.

mod emitter;
mod material;
mod variables;

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

pub use emitter::EmitterPreviewUpdater;
pub use material::{MaterialRefresher, MaterialSink, TextureSource};
pub use variables::VariableParser;

/// State the preview renderer reads. Owned by the editor session and handed to
/// observers explicitly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmitterPreview {
    pub creation_variables: IndexMap<String, String>,
    pub tick_variables: IndexMap<String, String>,
    pub mode: EmitterMode,
    pub shape: EmitterShape,
    /// MoLang expressions, evaluated by the renderer.
    pub active_time: String,
    pub sleep_time: String,
    pub texture: TextureSource,
    /// Bumped every time the material is rebuilt.
    pub material_revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitterMode {
    #[default]
    Looping,
    Once,
    Expression,
}

impl FromStr for EmitterMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "looping" => Ok(EmitterMode::Looping),
            "once" => Ok(EmitterMode::Once),
            "expression" => Ok(EmitterMode::Expression),
            other => Err(format!("unknown emitter lifetime mode '{other}'")),
        }
    }
}

impl fmt::Display for EmitterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmitterMode::Looping => "looping",
            EmitterMode::Once => "once",
            EmitterMode::Expression => "expression",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitterShape {
    #[default]
    Point,
    Sphere,
    Box,
    Disc,
    EntityAabb,
}

impl FromStr for EmitterShape {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "point" => Ok(EmitterShape::Point),
            "sphere" => Ok(EmitterShape::Sphere),
            "box" => Ok(EmitterShape::Box),
            "disc" => Ok(EmitterShape::Disc),
            "entity_aabb" => Ok(EmitterShape::EntityAabb),
            other => Err(format!("unknown emitter shape '{other}'")),
        }
    }
}

impl fmt::Display for EmitterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmitterShape::Point => "point",
            EmitterShape::Sphere => "sphere",
            EmitterShape::Box => "box",
            EmitterShape::Disc => "disc",
            EmitterShape::EntityAabb => "entity_aabb",
        })
    }
}
