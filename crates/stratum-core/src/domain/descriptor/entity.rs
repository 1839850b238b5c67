//! Entity descriptor.

use super::VariableDescriptor;

/// Describes a planning entity collection and its variables.
///
/// Variable order is significant: a variable's position is its
/// `variable_index` in a [`VariableKey`](crate::domain::VariableKey).
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    pub type_name: &'static str,
    pub solution_field: &'static str,
    pub variable_descriptors: Vec<VariableDescriptor>,
    /// Value range id when this collection provides candidate values.
    pub value_range_provider: Option<&'static str>,
    pub pin_field: Option<&'static str>,
}

impl EntityDescriptor {
    pub fn new(type_name: &'static str, solution_field: &'static str) -> Self {
        EntityDescriptor {
            type_name,
            solution_field,
            variable_descriptors: Vec::new(),
            value_range_provider: None,
            pin_field: None,
        }
    }

    pub fn with_variable(mut self, descriptor: VariableDescriptor) -> Self {
        self.variable_descriptors.push(descriptor);
        self
    }

    pub fn with_value_range_provider(mut self, id: &'static str) -> Self {
        self.value_range_provider = Some(id);
        self
    }

    pub fn with_pin_field(mut self, field: &'static str) -> Self {
        self.pin_field = Some(field);
        self
    }

    pub fn genuine_variable_descriptors(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.variable_descriptors
            .iter()
            .filter(|v| v.kind.is_genuine())
    }

    pub fn shadow_variable_descriptors(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.variable_descriptors
            .iter()
            .filter(|v| v.kind.is_shadow())
    }

    pub fn find_variable(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variable_descriptors.iter().find(|v| v.name == name)
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variable_descriptors.iter().position(|v| v.name == name)
    }

    pub fn has_genuine_variables(&self) -> bool {
        self.variable_descriptors.iter().any(|v| v.kind.is_genuine())
    }
}
