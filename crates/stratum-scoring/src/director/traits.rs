//! Score director trait definition.

use stratum_core::domain::{PlanningSolution, SolutionDescriptor};
use stratum_core::ScoreCorruptionError;

use crate::api::analysis::ScoreExplanation;

/// Solutions whose entity and fact collections can be counted by descriptor
/// index.
///
/// Directors use the counts to translate structural changes into source
/// events, and selectors use them to enumerate entities.
pub trait SolvableSolution: PlanningSolution {
    /// Number of entities in the collection of entity descriptor `descriptor_index`.
    fn entity_count(solution: &Self, descriptor_index: usize) -> usize;

    /// Number of facts in the collection of fact descriptor `descriptor_index`.
    fn fact_count(_solution: &Self, _descriptor_index: usize) -> usize {
        0
    }
}

/// The score director owns the working solution and keeps its score current.
///
/// It is responsible for:
/// - Maintaining the working solution
/// - Calculating scores (incrementally when possible)
/// - Turning change notifications into constraint graph events
/// - Recomputing shadow variables after genuine variables change
///
/// # Change protocol
///
/// Every mutation of the working solution is bracketed by a `before_*` and an
/// `after_*` notification for the element it touches. Entity and fact indices
/// are positions in their collections; an insertion or removal at index `i`
/// shifts every later element, so the director treats `i..n` as changed.
pub trait ScoreDirector<S: PlanningSolution>: Send {
    fn working_solution(&self) -> &S;

    /// Mutations made through this reference must be reported with the
    /// before/after notifications.
    fn working_solution_mut(&mut self) -> &mut S;

    /// Replaces the working solution and drops all incremental state.
    fn set_working_solution(&mut self, solution: S);

    /// Calculates the current score and stores it on the working solution.
    fn calculate_score(&mut self) -> S::Score;

    fn solution_descriptor(&self) -> &SolutionDescriptor;

    fn clone_working_solution(&self) -> S;

    /// Called before a planning variable is changed.
    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    /// Called after a planning variable is changed.
    ///
    /// An empty `variable_name` means any genuine variable of the entity may
    /// have changed.
    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    fn before_entity_added(&mut self, descriptor_index: usize, entity_index: usize);

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize);

    fn before_entity_removed(&mut self, descriptor_index: usize, entity_index: usize);

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize);

    fn before_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize);

    fn after_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize);

    fn before_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize);

    fn after_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize);

    fn before_problem_fact_changed(&mut self, descriptor_index: usize, fact_index: usize);

    fn after_problem_fact_changed(&mut self, descriptor_index: usize, fact_index: usize);

    /// Recomputes every shadow variable from scratch.
    fn trigger_variable_listeners(&mut self);

    /// Returns the number of entities for a given descriptor index.
    fn entity_count(&self, descriptor_index: usize) -> usize;

    /// Returns the total number of entities across all collections.
    fn total_entity_count(&self) -> usize {
        (0..self.solution_descriptor().entity_descriptor_count())
            .map(|d| self.entity_count(d))
            .sum()
    }

    /// Returns true if this score director supports incremental scoring.
    fn is_incremental(&self) -> bool {
        false
    }

    /// Drops incremental state; the next `calculate_score` starts from scratch.
    fn reset(&mut self) {}

    /// Compares the current score against a full recalculation.
    ///
    /// Directors that always calculate from scratch have nothing to compare.
    fn assert_score_from_scratch(&mut self) -> Result<S::Score, ScoreCorruptionError> {
        Ok(self.calculate_score())
    }

    /// Breaks the current score down per constraint.
    fn explain_score(&mut self) -> ScoreExplanation<S::Score> {
        ScoreExplanation::new(self.calculate_score(), Vec::new())
    }

    /// Registers a typed undo closure.
    ///
    /// Called by moves after applying changes. The closures run in reverse
    /// order during `RecordingScoreDirector::undo_changes`.
    ///
    /// Default implementation does nothing (for non-recording directors).
    fn register_undo(&mut self, _undo: Box<dyn FnOnce(&mut S) + Send>) {}
}
