use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::{
    events::{FieldObserver, HookError},
    form::FieldChanged,
};

use super::EmitterPreview;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Rebuilds the start and tick MoLang variable tables from the variable lists.
#[derive(Debug, Clone, Default)]
pub struct VariableParser;

impl VariableParser {
    /// `Variable.Speed = 1 + 2` becomes `("variable.speed", "1+2")`. Lines without an
    /// assignment are skipped; only the first `=` separates name and value.
    pub fn parse(lines: &[String]) -> IndexMap<String, String> {
        let mut table = IndexMap::new();
        for line in lines {
            let compact = WHITESPACE.replace_all(line, "").to_lowercase();
            if let Some((name, value)) = compact.split_once('=') {
                table.insert(name.to_string(), value.to_string());
            }
        }
        table
    }
}

impl FieldObserver for VariableParser {
    fn field_changed(
        &mut self,
        change: &FieldChanged,
        preview: &mut EmitterPreview,
    ) -> Result<(), HookError> {
        let target = if change.is("effect", "variables", "creation_vars") {
            &mut preview.creation_variables
        } else if change.is("effect", "variables", "tick_vars") {
            &mut preview.tick_variables
        } else {
            return Ok(());
        };
        let lines = change
            .value
            .as_list()
            .ok_or_else(|| HookError::new(&change.path, "variables must be a list"))?;
        *target = Self::parse(lines);
        Ok(())
    }
}
