//! Score-based termination conditions.

use stratum_core::domain::PlanningSolution;
use stratum_core::score::Score;

use super::Termination;
use crate::scope::Progress;

/// Terminates when best score reaches or exceeds a target.
///
/// # Example
///
/// ```
/// use stratum_solver::termination::BestScoreTermination;
/// use stratum_core::score::SimpleScore;
///
/// let term: BestScoreTermination<SimpleScore> = BestScoreTermination::new(SimpleScore::of(0));
/// ```
#[derive(Debug, Clone)]
pub struct BestScoreTermination<Sc: Score> {
    target_score: Sc,
}

impl<Sc: Score> BestScoreTermination<Sc> {
    pub fn new(target_score: Sc) -> Self {
        Self { target_score }
    }
}

impl<S, Sc> Termination<S> for BestScoreTermination<Sc>
where
    S: PlanningSolution<Score = Sc>,
    Sc: Score,
{
    fn is_terminated(&self, progress: &Progress<Sc>) -> bool {
        progress
            .best_score
            .is_some_and(|score| score >= self.target_score)
    }
}

/// Terminates as soon as the best score is feasible (every hard level at
/// zero or above).
#[derive(Debug, Clone, Copy, Default)]
pub struct BestScoreFeasibleTermination;

impl BestScoreFeasibleTermination {
    pub fn new() -> Self {
        Self
    }
}

impl<S: PlanningSolution> Termination<S> for BestScoreFeasibleTermination {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        progress.best_score.is_some_and(|score| score.is_feasible())
    }
}
