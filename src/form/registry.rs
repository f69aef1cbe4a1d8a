use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{CurveDefinition, FieldPath, ModeGroup};

use super::{
    actions::FieldChanged,
    error::RegistryError,
    field::{FieldState, FieldValue},
    group::{GroupContent, GroupState, SubjectState},
};

/// Every subject, group and input of the editor, in declared order.
///
/// Built once by [`build_registry`](crate::schema::build_registry) and owned by the
/// caller; values are edited in place through [`InputRegistry::set_value`].
#[derive(Debug, Clone)]
pub struct InputRegistry {
    subjects: IndexMap<String, SubjectState>,
    /// Mode select driving each gated group.
    gates: IndexMap<ModeGroup, FieldPath>,
}

impl InputRegistry {
    pub(crate) fn new(
        subjects: IndexMap<String, SubjectState>,
        gates: IndexMap<ModeGroup, FieldPath>,
    ) -> Self {
        Self { subjects, gates }
    }

    pub fn subjects(&self) -> impl Iterator<Item = &SubjectState> {
        self.subjects.values()
    }

    pub fn subject(&self, subject: &str) -> Result<&SubjectState, RegistryError> {
        self.subjects
            .get(subject)
            .ok_or_else(|| RegistryError::not_found(&[subject]))
    }

    pub fn group(&self, subject: &str, group: &str) -> Result<&GroupState, RegistryError> {
        self.subject(subject)?
            .groups
            .get(group)
            .ok_or_else(|| RegistryError::not_found(&[subject, group]))
    }

    fn group_mut(&mut self, subject: &str, group: &str) -> Result<&mut GroupState, RegistryError> {
        self.subjects
            .get_mut(subject)
            .ok_or_else(|| RegistryError::not_found(&[subject]))?
            .groups
            .get_mut(group)
            .ok_or_else(|| RegistryError::not_found(&[subject, group]))
    }

    pub fn get(&self, subject: &str, group: &str, field: &str) -> Result<&FieldState, RegistryError> {
        self.group(subject, group)?
            .field(field)
            .ok_or_else(|| RegistryError::not_found(&[subject, group, field]))
    }

    pub fn get_mut(
        &mut self,
        subject: &str,
        group: &str,
        field: &str,
    ) -> Result<&mut FieldState, RegistryError> {
        self.group_mut(subject, group)?
            .field_mut(field)
            .ok_or_else(|| RegistryError::not_found(&[subject, group, field]))
    }

    pub fn field(&self, path: &FieldPath) -> Result<&FieldState, RegistryError> {
        self.get(&path.subject, &path.group, &path.field)
    }

    pub fn field_mut(&mut self, path: &FieldPath) -> Result<&mut FieldState, RegistryError> {
        self.get_mut(&path.subject, &path.group, &path.field)
    }

    /// Visit every input once, subject by subject and group by group.
    pub fn for_each_field<F>(&self, mut visit: F)
    where
        F: FnMut(&FieldState, &str),
    {
        for field in self.fields() {
            visit(field, field.key());
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldState> {
        self.subjects
            .values()
            .flat_map(|subject| subject.groups.values())
            .flat_map(GroupState::fields)
    }

    fn fields_mut(&mut self) -> impl Iterator<Item = &mut FieldState> {
        self.subjects
            .values_mut()
            .flat_map(|subject| subject.groups.values_mut())
            .flat_map(GroupState::fields_mut)
    }

    pub fn field_count(&self) -> usize {
        self.subjects
            .values()
            .flat_map(|subject| subject.groups.values())
            .map(GroupState::field_count)
            .sum()
    }

    pub fn enabled_fields(&self) -> impl Iterator<Item = &FieldState> {
        self.fields().filter(|field| field.enabled)
    }

    pub fn is_enabled(&self, path: &FieldPath) -> Result<bool, RegistryError> {
        self.field(path).map(|field| field.enabled)
    }

    /// Path of the select whose value gates `subject.group`.
    pub fn gate_for(&self, subject: &str, group: &str) -> Option<&FieldPath> {
        self.gates.get(&ModeGroup::new(subject, group))
    }

    /// Resolve every select against its options and recompute the enabled state of
    /// the inputs it gates. Only direct gating is resolved; running it again changes
    /// nothing.
    pub fn initialize_select_defaults(&mut self) {
        let mut modes = Vec::new();
        for field in self.fields_mut() {
            let Some(options) = field.options() else {
                continue;
            };
            let fallback = match field.selected_key() {
                Some(key) if options.contains_key(key) => None,
                _ => Some(options.keys().next().cloned().unwrap_or_default()),
            };
            if let Some(key) = fallback {
                field.value = FieldValue::Select(key);
            }
            if let (Some(gate), Some(key)) = (field.mode_group(), field.selected_key()) {
                modes.push((gate.clone(), key.to_string()));
            }
        }
        for (gate, mode) in &modes {
            self.apply_mode(gate, mode);
        }
        debug!(gates = modes.len(), "select defaults initialized");
    }

    fn apply_mode(&mut self, gate: &ModeGroup, mode: &str) {
        let Ok(group) = self.group_mut(gate.subject(), gate.group()) else {
            return;
        };
        for field in group.fields_mut() {
            let Some(modes) = field.enabled_modes() else {
                continue;
            };
            let enabled = modes.iter().any(|candidate| candidate == mode);
            field.enabled = enabled;
        }
    }

    /// Store a new value. Editing a mode select re-gates the group it drives.
    pub fn set_value(
        &mut self,
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<FieldChanged, RegistryError> {
        let field = self.field_mut(path)?;
        field.check(&value)?;
        let previous = field.replace(value.clone());
        if let (Some(gate), FieldValue::Select(mode)) = (field.mode_group().cloned(), &value) {
            self.apply_mode(&gate, mode);
        }
        debug!(field = %path, value = ?value, "field updated");
        Ok(FieldChanged {
            path: path.clone(),
            previous,
            value,
        })
    }

    /// Parse raw input text for the field, then store it like [`Self::set_value`].
    pub fn set_input(&mut self, path: &FieldPath, raw: &str) -> Result<FieldChanged, RegistryError> {
        let value = self.field(path)?.parse_input(raw)?;
        self.set_value(path, value)
    }

    /// Put back `prior`, the state a field had before an edit, including its dirty
    /// flag, error and any gating the edit caused.
    pub(crate) fn restore(&mut self, prior: FieldState) -> Result<(), RegistryError> {
        let gate = prior.mode_group().cloned();
        let mode = prior.selected_key().map(str::to_string);
        let path = prior.path.clone();
        *self.field_mut(&path)? = prior;
        if let (Some(gate), Some(mode)) = (gate, mode) {
            self.apply_mode(&gate, &mode);
        }
        Ok(())
    }

    /// Check every enabled input, recording problems on the fields themselves.
    pub fn validate(&mut self) -> Vec<RegistryError> {
        let mut issues = Vec::new();
        for field in self.fields_mut() {
            field.clear_error();
            if !field.enabled {
                continue;
            }
            if let Err(err) = field.check(&field.value) {
                field.set_error(err.to_string());
                issues.push(err);
            }
        }
        issues
    }

    pub fn is_dirty(&self) -> bool {
        self.fields().any(|field| field.dirty)
    }

    pub fn error_count(&self) -> usize {
        self.fields().filter(|field| field.error.is_some()).count()
    }

    pub fn clear_errors(&mut self) {
        for field in self.fields_mut() {
            field.clear_error();
        }
    }

    /// Nested `subject/group/field` document of every enabled, non-blank input plus
    /// the curve lists. Every subject and group is present, possibly empty.
    pub fn snapshot(&self) -> Value {
        let mut root = Map::new();
        for subject in self.subjects.values() {
            let mut groups = Map::new();
            for group in subject.groups.values() {
                let entry = match &group.content {
                    GroupContent::Inputs(inputs) => {
                        let values = inputs
                            .values()
                            .filter(|field| field.enabled)
                            .filter_map(|field| {
                                field
                                    .current_value()
                                    .map(|value| (field.key().to_string(), value))
                            })
                            .collect::<Map<_, _>>();
                        Value::Object(values)
                    }
                    GroupContent::Curves(curves) => {
                        Value::Array(curves.iter().map(CurveDefinition::to_value).collect())
                    }
                };
                groups.insert(group.id.clone(), entry);
            }
            root.insert(subject.id.clone(), Value::Object(groups));
        }
        Value::Object(root)
    }

    /// Load values from a snapshot document. Either every value is accepted or the
    /// registry is left untouched.
    pub fn seed_from_value(&mut self, value: &Value) -> Result<(), RegistryError> {
        if !value.is_object() {
            return Err(RegistryError::InvalidLayout {
                location: "snapshot".to_string(),
                message: format!("expected an object of subjects, found {value}"),
            });
        }
        let mut next = self.clone();
        for field in next.fields_mut() {
            let seeded = value
                .get(&field.path.subject)
                .and_then(|subject| subject.get(&field.path.group))
                .and_then(|group| group.get(&field.path.field));
            if let Some(seeded) = seeded {
                field.seed_value(seeded)?;
            }
        }
        for subject in next.subjects.values_mut() {
            for group in subject.groups.values_mut() {
                let location = format!("{}.{}", subject.id, group.id);
                let seeded = value.get(&subject.id).and_then(|entry| entry.get(&group.id));
                if let (Some(curves), Some(seeded)) = (group.curves_mut(), seeded) {
                    let parsed = serde_json::from_value::<Vec<CurveDefinition>>(seeded.clone())
                        .map_err(|err| RegistryError::InvalidLayout {
                            location,
                            message: err.to_string(),
                        })?;
                    check_curves(&parsed)?;
                    *curves = parsed;
                }
            }
        }
        next.initialize_select_defaults();
        *self = next;
        Ok(())
    }

    pub fn curves(&self) -> impl Iterator<Item = &CurveDefinition> {
        self.subjects
            .values()
            .flat_map(|subject| subject.groups.values())
            .filter_map(GroupState::curves)
            .flatten()
    }

    pub fn curve(&self, id: &str) -> Option<&CurveDefinition> {
        self.curves().find(|curve| curve.id == id)
    }

    pub fn add_curve(
        &mut self,
        subject: &str,
        group: &str,
        curve: CurveDefinition,
    ) -> Result<(), RegistryError> {
        if self.curve(&curve.id).is_some() {
            return Err(RegistryError::DuplicateCurve { id: curve.id });
        }
        check_curve_nodes(&curve)?;
        let curves = self.curve_list_mut(subject, group)?;
        debug!(curve = %curve.id, "curve added");
        curves.push(curve);
        Ok(())
    }

    pub fn remove_curve(
        &mut self,
        subject: &str,
        group: &str,
        id: &str,
    ) -> Result<CurveDefinition, RegistryError> {
        let curves = self.curve_list_mut(subject, group)?;
        let index = curves
            .iter()
            .position(|curve| curve.id == id)
            .ok_or_else(|| RegistryError::not_found(&[subject, group, id]))?;
        Ok(curves.remove(index))
    }

    fn curve_list_mut(
        &mut self,
        subject: &str,
        group: &str,
    ) -> Result<&mut Vec<CurveDefinition>, RegistryError> {
        self.group_mut(subject, group)?
            .curves_mut()
            .ok_or_else(|| RegistryError::InvalidLayout {
                location: format!("{subject}.{group}"),
                message: "group does not hold curves".to_string(),
            })
    }
}

/// Curve ids are unique and every node is a finite number.
pub(crate) fn check_curves(curves: &[CurveDefinition]) -> Result<(), RegistryError> {
    for (index, curve) in curves.iter().enumerate() {
        if curves[..index].iter().any(|other| other.id == curve.id) {
            return Err(RegistryError::DuplicateCurve {
                id: curve.id.clone(),
            });
        }
        check_curve_nodes(curve)?;
    }
    Ok(())
}

fn check_curve_nodes(curve: &CurveDefinition) -> Result<(), RegistryError> {
    match curve.nodes.iter().position(|node| !node.is_finite()) {
        Some(index) => Err(RegistryError::InvalidCurve {
            id: curve.id.clone(),
            message: format!("node {index} is not a finite number"),
        }),
        None => Ok(()),
    }
}
