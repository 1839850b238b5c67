//! Recording score director for undo tracking.
//!
//! `RecordingScoreDirector` wraps another director and stores the typed undo
//! closures moves register while they mutate the working solution:
//!
//! ```text
//! let mut recording = RecordingScoreDirector::new(&mut inner);
//! mv.do_move(&mut recording);     // the move registers its undo closure
//! let score = recording.calculate_score();
//! recording.undo_changes();       // closures run in reverse order
//! ```
//!
//! Undo closures only restore genuine variables. Every touched entity is then
//! re-announced to the inner director, which recomputes cascaded shadows and
//! propagates the restored state through the constraint graph.

use stratum_core::domain::{PlanningSolution, SolutionDescriptor};
use stratum_core::ScoreCorruptionError;

use super::ScoreDirector;
use crate::api::analysis::ScoreExplanation;

/// A score director wrapper that stores typed undo closures.
///
/// # Example
///
/// ```
/// use stratum_core::domain::SolutionDescriptor;
/// use stratum_core::{PlanningSolution, SimpleScore};
/// use stratum_scoring::director::{
///     RecordingScoreDirector, ScoreDirector, SimpleScoreDirector, SolvableSolution,
/// };
///
/// #[derive(Clone)]
/// struct Solution { value: i64, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Solution {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
/// }
///
/// impl SolvableSolution for Solution {
///     fn entity_count(_: &Self, _: usize) -> usize { 1 }
/// }
///
/// let mut sd = SimpleScoreDirector::new(
///     Solution { value: 10, score: None },
///     SolutionDescriptor::new("Solution"),
///     |s: &Solution| SimpleScore::of(s.value),
/// );
///
/// let mut recording = RecordingScoreDirector::new(&mut sd);
///
/// let old_value = recording.working_solution().value;
/// recording.before_variable_changed(0, 0, "value");
/// recording.working_solution_mut().value = 20;
/// recording.after_variable_changed(0, 0, "value");
/// recording.register_undo(Box::new(move |s: &mut Solution| s.value = old_value));
/// assert_eq!(recording.calculate_score(), SimpleScore::of(20));
///
/// recording.undo_changes();
/// assert_eq!(recording.working_solution().value, 10);
/// assert_eq!(recording.calculate_score(), SimpleScore::of(10));
/// ```
pub struct RecordingScoreDirector<'a, S: PlanningSolution> {
    inner: &'a mut dyn ScoreDirector<S>,
    undo_stack: Vec<Box<dyn FnOnce(&mut S) + Send>>,
    /// (descriptor_index, entity_index) pairs announced since the last reset.
    modified_entities: Vec<(usize, usize)>,
}

impl<'a, S: PlanningSolution> RecordingScoreDirector<'a, S> {
    pub fn new(inner: &'a mut dyn ScoreDirector<S>) -> Self {
        Self {
            inner,
            undo_stack: Vec::with_capacity(16),
            modified_entities: Vec::with_capacity(8),
        }
    }

    /// Undoes all recorded changes in reverse order.
    ///
    /// 1. Announce the upcoming change on every modified entity
    /// 2. Run undo closures to restore planning variable values
    /// 3. Announce the restored entities so shadows and the graph catch up
    pub fn undo_changes(&mut self) {
        for &(descriptor_index, entity_index) in &self.modified_entities {
            self.inner
                .before_variable_changed(descriptor_index, entity_index, "");
        }

        while let Some(undo) = self.undo_stack.pop() {
            undo(self.inner.working_solution_mut());
        }

        for (descriptor_index, entity_index) in self.modified_entities.drain(..) {
            self.inner
                .after_variable_changed(descriptor_index, entity_index, "");
        }
    }

    /// Clears the recording state so the allocations can be reused.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.modified_entities.clear();
    }

    pub fn change_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    fn track(&mut self, descriptor_index: usize, entity_index: usize) {
        let key = (descriptor_index, entity_index);
        if !self.modified_entities.contains(&key) {
            self.modified_entities.push(key);
        }
    }
}

impl<S: PlanningSolution> ScoreDirector<S> for RecordingScoreDirector<'_, S> {
    fn working_solution(&self) -> &S {
        self.inner.working_solution()
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.inner.working_solution_mut()
    }

    fn set_working_solution(&mut self, solution: S) {
        self.clear();
        self.inner.set_working_solution(solution);
    }

    fn calculate_score(&mut self) -> S::Score {
        self.inner.calculate_score()
    }

    fn solution_descriptor(&self) -> &SolutionDescriptor {
        self.inner.solution_descriptor()
    }

    fn clone_working_solution(&self) -> S {
        self.inner.clone_working_solution()
    }

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        self.inner
            .before_variable_changed(descriptor_index, entity_index, variable_name);
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        self.inner
            .after_variable_changed(descriptor_index, entity_index, variable_name);
        self.track(descriptor_index, entity_index);
    }

    fn before_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        self.inner.before_entity_added(descriptor_index, entity_index);
    }

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        self.inner.after_entity_added(descriptor_index, entity_index);
    }

    fn before_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        self.inner.before_entity_removed(descriptor_index, entity_index);
    }

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        self.inner.after_entity_removed(descriptor_index, entity_index);
    }

    fn before_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) {
        self.inner.before_problem_fact_added(descriptor_index, fact_index);
    }

    fn after_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) {
        self.inner.after_problem_fact_added(descriptor_index, fact_index);
    }

    fn before_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) {
        self.inner.before_problem_fact_removed(descriptor_index, fact_index);
    }

    fn after_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) {
        self.inner.after_problem_fact_removed(descriptor_index, fact_index);
    }

    fn before_problem_fact_changed(&mut self, descriptor_index: usize, fact_index: usize) {
        self.inner.before_problem_fact_changed(descriptor_index, fact_index);
    }

    fn after_problem_fact_changed(&mut self, descriptor_index: usize, fact_index: usize) {
        self.inner.after_problem_fact_changed(descriptor_index, fact_index);
    }

    fn trigger_variable_listeners(&mut self) {
        self.inner.trigger_variable_listeners();
    }

    fn entity_count(&self, descriptor_index: usize) -> usize {
        self.inner.entity_count(descriptor_index)
    }

    fn total_entity_count(&self) -> usize {
        self.inner.total_entity_count()
    }

    fn is_incremental(&self) -> bool {
        self.inner.is_incremental()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.clear();
    }

    fn assert_score_from_scratch(&mut self) -> Result<S::Score, ScoreCorruptionError> {
        self.inner.assert_score_from_scratch()
    }

    fn explain_score(&mut self) -> ScoreExplanation<S::Score> {
        self.inner.explain_score()
    }

    fn register_undo(&mut self, undo: Box<dyn FnOnce(&mut S) + Send>) {
        self.undo_stack.push(undo);
    }
}
