use anyhow::Result;

use crate::{
    domain::{LayoutDefinition, parse_layout_str},
    form::InputRegistry,
    io::DocumentFormat,
};

use super::{RegistryOptions, build_registry};

/// Input layout of the Bedrock particle editor.
pub const SNOWSTORM_LAYOUT: &str = include_str!("snowstorm.json");

pub fn snowstorm_layout() -> Result<LayoutDefinition> {
    parse_layout_str(SNOWSTORM_LAYOUT, DocumentFormat::Json)
}

impl InputRegistry {
    /// Registry for the built-in particle editor layout.
    pub fn snowstorm(options: &RegistryOptions) -> Result<Self> {
        let layout = snowstorm_layout()?;
        Ok(build_registry(&layout, options)?)
    }
}
