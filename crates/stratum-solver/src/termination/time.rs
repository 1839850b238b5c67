//! Wall-clock limit.

use std::time::Duration;

use stratum_core::domain::PlanningSolution;

use super::Termination;
use crate::scope::Progress;

/// Stops once `limit` has elapsed.
///
/// The clock is the one of the [`Progress`] being checked, so the same
/// termination limits the whole run when set on the solver and a single
/// phase when set on that phase. The limit itself is inclusive.
///
/// ```
/// use std::time::Duration;
/// use stratum_core::score::SimpleScore;
/// use stratum_solver::scope::Progress;
/// use stratum_solver::termination::{Termination, TimeTermination};
/// # use stratum_core::domain::PlanningSolution;
/// # #[derive(Clone, Debug)]
/// # struct Plan;
/// # impl PlanningSolution for Plan {
/// #     type Score = SimpleScore;
/// #     fn score(&self) -> Option<SimpleScore> { None }
/// #     fn set_score(&mut self, _: Option<SimpleScore>) {}
/// # }
///
/// let half_second = TimeTermination::millis(500);
/// let mut progress = Progress::<SimpleScore>::start();
/// progress.elapsed = Duration::from_millis(499);
/// assert!(!Termination::<Plan>::is_terminated(&half_second, &progress));
/// progress.elapsed = Duration::from_millis(500);
/// assert!(Termination::<Plan>::is_terminated(&half_second, &progress));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Duration::from_millis(ms).into()
    }

    pub fn seconds(secs: u64) -> Self {
        Duration::from_secs(secs).into()
    }
}

impl From<Duration> for TimeTermination {
    fn from(limit: Duration) -> Self {
        Self::new(limit)
    }
}

impl<S: PlanningSolution> Termination<S> for TimeTermination {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        progress.elapsed >= self.limit
    }
}
