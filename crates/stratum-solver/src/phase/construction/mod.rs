//! Construction heuristic phases
//!
//! Build an initial solution by assigning every unassigned planning
//! variable exactly once. Each assignment is one step: all candidates for
//! the entity (or list element) are scored and the best one is kept, the
//! first candidate winning ties. Value and entity sorting therefore decide
//! which candidate wins among equals.

mod basic;
mod list;


pub use basic::ConstructionHeuristicPhase;
pub use list::ListConstructionPhase;
pub use stratum_config::ConstructionHeuristicType;
