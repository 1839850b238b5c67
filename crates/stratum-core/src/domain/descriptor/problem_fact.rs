//! Problem fact descriptor.

/// Describes a problem fact collection on the solution.
#[derive(Debug, Clone)]
pub struct ProblemFactDescriptor {
    pub type_name: &'static str,
    pub solution_field: &'static str,
    pub is_collection: bool,
    /// Value range id when this collection provides candidate values.
    pub value_range_provider: Option<&'static str>,
}

impl ProblemFactDescriptor {
    pub fn new(type_name: &'static str, solution_field: &'static str) -> Self {
        ProblemFactDescriptor {
            type_name,
            solution_field,
            is_collection: true,
            value_range_provider: None,
        }
    }

    /// Marks this fact as a single value rather than a collection.
    pub fn single(mut self) -> Self {
        self.is_collection = false;
        self
    }

    pub fn with_value_range_provider(mut self, id: &'static str) -> Self {
        self.value_range_provider = Some(id);
        self
    }
}
