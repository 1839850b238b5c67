//! Variable descriptor.

use crate::domain::variable::{VariableKind, VariableSource};

/// Describes one variable field on an entity.
///
/// # Example
///
/// ```
/// use stratum_core::domain::VariableDescriptor;
///
/// let room = VariableDescriptor::genuine("room").with_value_range("rooms");
/// assert!(room.kind.is_genuine());
///
/// let arrival = VariableDescriptor::shadow("arrival_time").with_source("Vehicle", "visits");
/// assert_eq!(arrival.sources.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct VariableDescriptor {
    pub name: &'static str,
    pub kind: VariableKind,
    pub allows_unassigned: bool,
    /// Id of the value range this variable draws from.
    pub value_range: Option<&'static str>,
    /// Variables a shadow is derived from.
    pub sources: Vec<VariableSource>,
}

impl VariableDescriptor {
    fn with_kind(name: &'static str, kind: VariableKind) -> Self {
        VariableDescriptor {
            name,
            kind,
            allows_unassigned: false,
            value_range: None,
            sources: Vec::new(),
        }
    }

    pub fn genuine(name: &'static str) -> Self {
        Self::with_kind(name, VariableKind::Genuine)
    }

    pub fn list(name: &'static str) -> Self {
        Self::with_kind(name, VariableKind::List)
    }

    pub fn shadow(name: &'static str) -> Self {
        let mut descriptor = Self::with_kind(name, VariableKind::Shadow);
        descriptor.allows_unassigned = true;
        descriptor
    }

    pub fn with_value_range(mut self, range: &'static str) -> Self {
        self.value_range = Some(range);
        self
    }

    pub fn with_allows_unassigned(mut self, allows: bool) -> Self {
        self.allows_unassigned = allows;
        self
    }

    /// Adds a source variable; may be called repeatedly.
    pub fn with_source(mut self, entity: &'static str, variable: &'static str) -> Self {
        self.sources.push(VariableSource { entity, variable });
        self
    }
}
