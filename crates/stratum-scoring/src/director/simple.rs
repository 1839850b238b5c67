//! Simple score director with full recalculation.

use stratum_core::domain::SolutionDescriptor;

use super::shadow::{removal_cascade, ShadowCascade};
use super::traits::{ScoreDirector, SolvableSolution};

/// A score director that recalculates the full score each time.
///
/// The calculator is stored as a concrete generic type parameter, not as
/// `Arc<dyn Fn>`. This is slow but obviously correct, which makes it the
/// reference the incremental director is tested against.
pub struct SimpleScoreDirector<S: SolvableSolution, C> {
    working_solution: S,
    solution_descriptor: SolutionDescriptor,
    score_calculator: C,
    shadows: ShadowCascade<S>,
    score_dirty: bool,
    cached_score: Option<S::Score>,
}

impl<S, C> SimpleScoreDirector<S, C>
where
    S: SolvableSolution,
    C: Fn(&S) -> S::Score + Send + Sync,
{
    pub fn new(solution: S, solution_descriptor: SolutionDescriptor, score_calculator: C) -> Self {
        SimpleScoreDirector {
            working_solution: solution,
            solution_descriptor,
            score_calculator,
            shadows: ShadowCascade::empty(),
            score_dirty: true,
            cached_score: None,
        }
    }

    /// Installs the shadow cascade and brings every shadow up to date.
    pub fn with_shadows(mut self, shadows: ShadowCascade<S>) -> Self {
        self.shadows = shadows;
        self.shadows.update_all(&mut self.working_solution);
        self
    }

    pub fn take_solution(self) -> S {
        self.working_solution
    }

    fn mark_dirty(&mut self) {
        self.score_dirty = true;
    }
}

impl<S, C> Clone for SimpleScoreDirector<S, C>
where
    S: SolvableSolution,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            working_solution: self.working_solution.clone(),
            solution_descriptor: self.solution_descriptor.clone(),
            score_calculator: self.score_calculator.clone(),
            shadows: self.shadows.clone(),
            score_dirty: self.score_dirty,
            cached_score: self.cached_score,
        }
    }
}

impl<S, C> ScoreDirector<S> for SimpleScoreDirector<S, C>
where
    S: SolvableSolution,
    C: Fn(&S) -> S::Score + Send + Sync,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.mark_dirty();
        &mut self.working_solution
    }

    fn set_working_solution(&mut self, solution: S) {
        self.working_solution = solution;
        self.shadows.update_all(&mut self.working_solution);
        self.mark_dirty();
    }

    fn calculate_score(&mut self) -> S::Score {
        if !self.score_dirty {
            if let Some(score) = self.cached_score {
                return score;
            }
        }

        let score = (self.score_calculator)(&self.working_solution);
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
        self.score_dirty = false;
        score
    }

    fn solution_descriptor(&self) -> &SolutionDescriptor {
        &self.solution_descriptor
    }

    fn clone_working_solution(&self) -> S {
        self.working_solution.clone()
    }

    fn before_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        self.mark_dirty();
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        let variable_index = if variable_name.is_empty() {
            None
        } else {
            self.solution_descriptor
                .entity_descriptors
                .get(descriptor_index)
                .and_then(|e| e.variable_index(variable_name))
        };
        let mut changed = Vec::new();
        self.shadows.cascade(
            &mut self.working_solution,
            descriptor_index,
            variable_index,
            entity_index,
            &mut changed,
        );
        self.mark_dirty();
    }

    fn before_entity_added(&mut self, _descriptor_index: usize, _entity_index: usize) {
        self.mark_dirty();
    }

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        let mut changed = Vec::new();
        self.shadows.cascade(
            &mut self.working_solution,
            descriptor_index,
            None,
            entity_index,
            &mut changed,
        );
        self.mark_dirty();
    }

    fn before_entity_removed(&mut self, _descriptor_index: usize, _entity_index: usize) {
        self.mark_dirty();
    }

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        let n = S::entity_count(&self.working_solution, descriptor_index);
        let mut changed = Vec::new();
        for index in removal_cascade(entity_index, n) {
            self.shadows.cascade(
                &mut self.working_solution,
                descriptor_index,
                None,
                index,
                &mut changed,
            );
        }
        self.mark_dirty();
    }

    fn before_problem_fact_added(&mut self, _descriptor_index: usize, _fact_index: usize) {
        self.mark_dirty();
    }

    fn after_problem_fact_added(&mut self, _descriptor_index: usize, _fact_index: usize) {
        self.mark_dirty();
    }

    fn before_problem_fact_removed(&mut self, _descriptor_index: usize, _fact_index: usize) {
        self.mark_dirty();
    }

    fn after_problem_fact_removed(&mut self, _descriptor_index: usize, _fact_index: usize) {
        self.mark_dirty();
    }

    fn before_problem_fact_changed(&mut self, _descriptor_index: usize, _fact_index: usize) {
        self.mark_dirty();
    }

    fn after_problem_fact_changed(&mut self, _descriptor_index: usize, _fact_index: usize) {
        self.mark_dirty();
    }

    fn trigger_variable_listeners(&mut self) {
        self.shadows.update_all(&mut self.working_solution);
        self.mark_dirty();
    }

    fn entity_count(&self, descriptor_index: usize) -> usize {
        S::entity_count(&self.working_solution, descriptor_index)
    }

    fn reset(&mut self) {
        self.mark_dirty();
        self.cached_score = None;
    }
}
