//! Scope for solver execution.
//!
//! A [`SolverScope`] owns the score director, the best solution found so far
//! and the counters that terminations read. Phases mark their start on the
//! scope so phase-level terminations see phase-relative [`Progress`].

mod progress;
mod solver;

pub use progress::Progress;
pub use solver::SolverScope;

#[cfg(test)]
mod tests;
