//! Termination conditions based on lack of improvement.

use std::time::Duration;

use stratum_core::domain::PlanningSolution;

use super::Termination;
use crate::scope::Progress;

/// Terminates if the best score has not improved for a number of steps.
///
/// Useful to stop once the search has plateaued.
#[derive(Debug, Clone)]
pub struct UnimprovedStepCountTermination {
    limit: u64,
}

impl UnimprovedStepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution> Termination<S> for UnimprovedStepCountTermination {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        progress.unimproved_step_count >= self.limit
    }
}

/// Terminates if the best score has not improved for a duration.
#[derive(Debug, Clone)]
pub struct UnimprovedTimeTermination {
    limit: Duration,
}

impl UnimprovedTimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl<S: PlanningSolution> Termination<S> for UnimprovedTimeTermination {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        progress.unimproved_elapsed >= self.limit
    }
}
