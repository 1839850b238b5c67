//! Step count termination.

use stratum_core::domain::PlanningSolution;

use super::Termination;
use crate::scope::Progress;

/// Terminates after a number of completed steps.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution> Termination<S> for StepCountTermination {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        progress.step_count >= self.limit
    }
}
