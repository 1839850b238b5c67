//! Domain model for planning problems
//!
//! - `PlanningSolution`: the root aggregate owning facts, entities and score
//! - `PlanningEntity`: records whose planning variables the solver changes
//! - `ProblemFact`: immutable input data
//! - Descriptors: validated metadata about variables, value ranges and shadows

mod descriptor;
mod traits;
mod value_range;
mod variable;

pub use descriptor::{
    EntityDescriptor, ProblemFactDescriptor, SolutionDescriptor, VariableDescriptor,
};
pub use traits::{PlanningEntity, PlanningId, PlanningSolution, ProblemFact};
pub use value_range::{FieldValueRange, IndexRange, IntegerRange, StaticValueRange, ValueRange};
pub use variable::{VariableKey, VariableKind, VariableSource};
