mod layout;
mod options;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    domain::{FieldKind, FieldPath, GroupBody, LayoutDefinition, ModeGroup},
    form::{
        FieldState, GroupContent, GroupState, InputRegistry, RegistryError, SubjectState,
        check_curves,
    },
};

pub use layout::{SNOWSTORM_LAYOUT, snowstorm_layout};
pub use options::RegistryOptions;

/// Turn a layout definition into a registry, rejecting defaults that do not fit their
/// field and mode references no select can satisfy.
pub fn build_registry(
    layout: &LayoutDefinition,
    options: &RegistryOptions,
) -> Result<InputRegistry, RegistryError> {
    let mut subjects = IndexMap::with_capacity(layout.subjects.len());
    let mut gates: IndexMap<ModeGroup, FieldPath> = IndexMap::new();

    for (subject_id, subject) in &layout.subjects {
        let mut groups = IndexMap::with_capacity(subject.groups.len());
        for (group_id, group) in &subject.groups {
            let content = match &group.body {
                GroupBody::Inputs(inputs) => {
                    let mut fields = IndexMap::with_capacity(inputs.len());
                    for (key, definition) in inputs {
                        let path = FieldPath::new(subject_id, group_id, key);
                        let mut definition = definition.clone();
                        if options.embedded_host
                            && let FieldKind::Image { allow_upload } = &mut definition.kind
                        {
                            *allow_upload = false;
                        }
                        if let FieldKind::Select {
                            options: choices,
                            mode_group,
                        } = &definition.kind
                        {
                            if choices.is_empty() {
                                return Err(RegistryError::InvalidLayout {
                                    location: path.to_string(),
                                    message: "select inputs need at least one option".to_string(),
                                });
                            }
                            if let Some(tag) = mode_group
                                && let Some(existing) = gates.insert(tag.clone(), path.clone())
                            {
                                return Err(RegistryError::InvalidLayout {
                                    location: path.to_string(),
                                    message: format!(
                                        "mode group {}.{} is already driven by {existing}",
                                        tag.subject(),
                                        tag.group()
                                    ),
                                });
                            }
                        }
                        let field = FieldState::from_definition(path, definition)?;
                        fields.insert(key.clone(), field);
                    }
                    GroupContent::Inputs(fields)
                }
                GroupBody::Curves(curves) => {
                    check_curves(curves)?;
                    GroupContent::Curves(curves.clone())
                }
            };
            groups.insert(
                group_id.clone(),
                GroupState {
                    id: group_id.clone(),
                    label: group.label.clone(),
                    folded: group.folded,
                    content,
                },
            );
        }
        subjects.insert(
            subject_id.clone(),
            SubjectState {
                id: subject_id.clone(),
                label: subject.label.clone(),
                groups,
            },
        );
    }

    for (tag, path) in &gates {
        let exists = subjects
            .get(tag.subject())
            .is_some_and(|subject| subject.groups.contains_key(tag.group()));
        if !exists {
            return Err(RegistryError::InvalidLayout {
                location: path.to_string(),
                message: format!("mode group {}.{} does not exist", tag.subject(), tag.group()),
            });
        }
    }

    let mut registry = InputRegistry::new(subjects, gates);
    check_mode_references(&registry)?;
    if options.initialize_selects {
        registry.initialize_select_defaults();
    }
    debug!(
        fields = registry.field_count(),
        embedded = options.embedded_host,
        "input registry built"
    );
    Ok(registry)
}

fn check_mode_references(registry: &InputRegistry) -> Result<(), RegistryError> {
    for subject in registry.subjects() {
        for group in subject.groups.values() {
            let gate = registry
                .gate_for(&subject.id, &group.id)
                .map(|path| registry.field(path))
                .transpose()?;
            for field in group.fields() {
                let Some(modes) = field.enabled_modes() else {
                    continue;
                };
                if modes.is_empty() {
                    return Err(RegistryError::InvalidLayout {
                        location: field.path.to_string(),
                        message: "enabled_modes must list at least one mode".to_string(),
                    });
                }
                let offered = gate.and_then(FieldState::options);
                for mode in modes {
                    if !offered.is_some_and(|options| options.contains_key(mode)) {
                        return Err(RegistryError::UnknownMode {
                            path: field.path.clone(),
                            mode: mode.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
