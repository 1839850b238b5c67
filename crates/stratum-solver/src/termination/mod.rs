//! Termination conditions for solver phases.
//!
//! A termination reads a [`Progress`] snapshot. The solver checks its own
//! termination against run progress; a phase additionally checks its own
//! termination against phase progress. Checks happen between steps only, so
//! a move evaluation is never interrupted.

mod best_score;
mod composite;
mod external;
mod move_count;
mod step_count;
mod time;
mod unimproved;

use std::fmt::Debug;

use stratum_core::domain::PlanningSolution;

use crate::scope::Progress;

pub use best_score::{BestScoreFeasibleTermination, BestScoreTermination};
pub use composite::{AndTermination, OrTermination};
pub use external::ExternalTermination;
pub use move_count::MoveCountTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::{UnimprovedStepCountTermination, UnimprovedTimeTermination};

/// Trait for determining when to stop solving.
///
/// # Type Parameters
/// * `S` - The planning solution type
pub trait Termination<S: PlanningSolution>: Send + Sync + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool;
}

impl<S: PlanningSolution, T: Termination<S> + ?Sized> Termination<S> for Box<T> {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        (**self).is_terminated(progress)
    }
}

/// Never terminates; the run ends when its phases finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl<S: PlanningSolution> Termination<S> for NoTermination {
    fn is_terminated(&self, _progress: &Progress<S::Score>) -> bool {
        false
    }
}
