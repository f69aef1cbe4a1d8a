use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::io::DocumentFormat;

use super::schema::LayoutDefinition;

/// Parse a layout document held in a `serde_json::Value`.
pub fn parse_layout(value: &Value) -> Result<LayoutDefinition> {
    LayoutDefinition::deserialize(value).context("failed to parse layout definition")
}

/// Parse a layout document from text. Deserializes straight from the source format so
/// repeated keys are reported rather than silently merged.
pub fn parse_layout_str(contents: &str, format: DocumentFormat) -> Result<LayoutDefinition> {
    match format {
        DocumentFormat::Json => serde_json::from_str::<LayoutDefinition>(contents)
            .with_context(|| "failed to parse JSON layout"),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::from_str::<LayoutDefinition>(contents)
            .with_context(|| "failed to parse YAML layout"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::from_str::<LayoutDefinition>(contents)
            .with_context(|| "failed to parse TOML layout"),
    }
}
