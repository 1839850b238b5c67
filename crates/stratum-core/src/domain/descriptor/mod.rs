//! Runtime metadata describing the shape of a planning problem.

mod entity;
mod problem_fact;
mod solution;
mod var_descriptor;

#[cfg(test)]
mod tests;

pub use entity::EntityDescriptor;
pub use problem_fact::ProblemFactDescriptor;
pub use solution::SolutionDescriptor;
pub use var_descriptor::VariableDescriptor;
