//! Progress snapshots read by terminations.

use std::time::Duration;

/// Counters of a run or of a single phase at one point in time.
///
/// The best score is always the run's best; the other fields are relative
/// to the start of the run or of the phase, depending on which scope built
/// the snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress<Sc> {
    pub elapsed: Duration,
    pub step_count: u64,
    pub move_count: u64,
    /// Score of the best initialized solution; partial solutions never count.
    pub best_score: Option<Sc>,
    /// Time since the best score last improved.
    pub unimproved_elapsed: Duration,
    /// Steps since the best score last improved.
    pub unimproved_step_count: u64,
}

impl<Sc> Progress<Sc> {
    /// A snapshot at the very start of a run.
    pub fn start() -> Self {
        Self {
            elapsed: Duration::ZERO,
            step_count: 0,
            move_count: 0,
            best_score: None,
            unimproved_elapsed: Duration::ZERO,
            unimproved_step_count: 0,
        }
    }

    pub fn with_best_score(mut self, score: Sc) -> Self {
        self.best_score = Some(score);
        self
    }
}

impl<Sc> Default for Progress<Sc> {
    fn default() -> Self {
        Self::start()
    }
}
