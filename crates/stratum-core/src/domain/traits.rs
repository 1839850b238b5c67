//! Core domain traits

use std::hash::Hash;

use crate::score::Score;

/// The root aggregate of a planning problem.
///
/// Owns every problem fact and planning entity plus the current score.
/// Exactly one working solution is live per solver; the solver holds
/// exclusive mutation rights to it while solving.
///
/// # Example
///
/// ```
/// use stratum_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct NQueens {
///     rows: Vec<Option<usize>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for NQueens {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
///
///     fn is_initialized(&self) -> bool {
///         self.rows.iter().all(Option::is_some)
///     }
/// }
/// ```
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    type Score: Score;

    /// Returns `None` until the solution has been scored.
    fn score(&self) -> Option<Self::Score>;

    fn set_score(&mut self, score: Option<Self::Score>);

    /// Returns true once every genuine variable that disallows unassigned
    /// has a value.
    fn is_initialized(&self) -> bool {
        true
    }
}

/// A mutable record holding one or more planning variables.
///
/// Pinned entities are never changed by moves.
pub trait PlanningEntity: Clone + Send + Sync + 'static {
    fn is_pinned(&self) -> bool {
        false
    }
}

/// Immutable input data owned by the solution.
pub trait ProblemFact: Clone + Send + Sync + 'static {}

/// Stable identity for entities and facts.
///
/// The id must never change during solving.
pub trait PlanningId {
    type Id: Eq + Hash + Clone + Send + Sync + 'static;

    fn planning_id(&self) -> Self::Id;
}
