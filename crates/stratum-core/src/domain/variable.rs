//! Variable classification.

/// What kind of field a variable descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Holds a single value drawn from a value range, or unassigned.
    Genuine,
    /// Holds an ordered list of elements drawn from a value range.
    List,
    /// Derived from other variables; never assigned by a move.
    Shadow,
}

impl VariableKind {
    /// Returns true for variables the solver changes directly.
    pub fn is_genuine(&self) -> bool {
        matches!(self, VariableKind::Genuine | VariableKind::List)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, VariableKind::List)
    }

    pub fn is_shadow(&self) -> bool {
        matches!(self, VariableKind::Shadow)
    }
}

/// Identifies one variable: `(entity descriptor index, variable index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableKey {
    pub descriptor_index: usize,
    pub variable_index: usize,
}

impl VariableKey {
    pub const fn new(descriptor_index: usize, variable_index: usize) -> Self {
        Self {
            descriptor_index,
            variable_index,
        }
    }
}

/// A `(entity type, variable name)` reference used to declare shadow sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableSource {
    pub entity: &'static str,
    pub variable: &'static str,
}
