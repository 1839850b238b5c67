//! Move count termination.

use stratum_core::domain::PlanningSolution;

use super::Termination;
use crate::scope::Progress;

/// Terminates after a number of evaluated moves.
///
/// Checked between steps, so the last step may evaluate its whole batch
/// and overshoot the limit.
#[derive(Debug, Clone)]
pub struct MoveCountTermination {
    limit: u64,
}

impl MoveCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution> Termination<S> for MoveCountTermination {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        progress.move_count >= self.limit
    }
}
