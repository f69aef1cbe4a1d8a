use indexmap::IndexMap;

use crate::domain::CurveDefinition;

use super::field::FieldState;

#[derive(Debug, Clone)]
pub struct SubjectState {
    pub id: String,
    pub label: String,
    pub groups: IndexMap<String, GroupState>,
}

#[derive(Debug, Clone)]
pub struct GroupState {
    pub id: String,
    pub label: String,
    pub folded: bool,
    pub content: GroupContent,
}

#[derive(Debug, Clone)]
pub enum GroupContent {
    Inputs(IndexMap<String, FieldState>),
    Curves(Vec<CurveDefinition>),
}

impl GroupState {
    pub fn fields(&self) -> impl Iterator<Item = &FieldState> {
        let inputs = match &self.content {
            GroupContent::Inputs(inputs) => Some(inputs.values()),
            GroupContent::Curves(_) => None,
        };
        inputs.into_iter().flatten()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut FieldState> {
        let inputs = match &mut self.content {
            GroupContent::Inputs(inputs) => Some(inputs.values_mut()),
            GroupContent::Curves(_) => None,
        };
        inputs.into_iter().flatten()
    }

    pub fn field(&self, key: &str) -> Option<&FieldState> {
        match &self.content {
            GroupContent::Inputs(inputs) => inputs.get(key),
            GroupContent::Curves(_) => None,
        }
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FieldState> {
        match &mut self.content {
            GroupContent::Inputs(inputs) => inputs.get_mut(key),
            GroupContent::Curves(_) => None,
        }
    }

    pub fn field_count(&self) -> usize {
        match &self.content {
            GroupContent::Inputs(inputs) => inputs.len(),
            GroupContent::Curves(_) => 0,
        }
    }

    pub fn curves(&self) -> Option<&[CurveDefinition]> {
        match &self.content {
            GroupContent::Curves(curves) => Some(curves),
            GroupContent::Inputs(_) => None,
        }
    }

    pub(crate) fn curves_mut(&mut self) -> Option<&mut Vec<CurveDefinition>> {
        match &mut self.content {
            GroupContent::Curves(curves) => Some(curves),
            GroupContent::Inputs(_) => None,
        }
    }
}
