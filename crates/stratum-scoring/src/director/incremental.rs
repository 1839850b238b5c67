//! Incremental score director over a [`ConstraintSet`].
//!
//! Change notifications become [`SourceEvent`]s propagated through the
//! constraint graph. The cached score is adjusted by the delta of every
//! event, so a variable change costs time proportional to the tuples it
//! touches.

use std::fmt;

use stratum_core::domain::SolutionDescriptor;
use stratum_core::score::Score;
use stratum_core::ScoreCorruptionError;
use tracing::{debug, warn};

use super::shadow::{removal_cascade, ShadowCascade};
use super::traits::{ScoreDirector, SolvableSolution};
use crate::api::analysis::ScoreExplanation;
use crate::api::constraint_set::ConstraintSet;
use crate::graph::{SourceClass, SourceEvent};

/// A score director that maintains the score incrementally.
///
/// Cloning the director forks it: the clone owns a copy of the working
/// solution and of every node's incremental state.
///
/// # Example
///
/// ```
/// use stratum_core::domain::{EntityDescriptor, SolutionDescriptor, VariableDescriptor};
/// use stratum_core::{PlanningSolution, SimpleScore};
/// use stratum_scoring::director::{IncrementalScoreDirector, ScoreDirector, SolvableSolution};
/// use stratum_scoring::stream::{entities, ConstraintFactory};
///
/// #[derive(Clone)]
/// struct Plan {
///     slots: Vec<Option<i64>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for Plan {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// impl SolvableSolution for Plan {
///     fn entity_count(plan: &Self, _d: usize) -> usize { plan.slots.len() }
/// }
///
/// let descriptor = SolutionDescriptor::new("Plan")
///     .with_value_range("values")
///     .with_entity(
///         EntityDescriptor::new("Slot", "slots")
///             .with_variable(VariableDescriptor::genuine("value").with_value_range("values")),
///     )
///     .with_score_field("score")
///     .validate()
///     .unwrap();
///
/// let unassigned = ConstraintFactory::<Plan, SimpleScore>::new()
///     .for_each(entities(0, |p: &Plan| p.slots.as_slice()))
///     .filter(|slot: &Option<i64>| slot.is_none())
///     .penalize(SimpleScore::of(1))
///     .as_constraint("Unassigned slot");
///
/// let plan = Plan { slots: vec![Some(1), None], score: None };
/// let mut director = IncrementalScoreDirector::new(plan, descriptor, (unassigned,));
/// assert_eq!(director.calculate_score(), SimpleScore::of(-1));
///
/// director.before_variable_changed(0, 1, "value");
/// director.working_solution_mut().slots[1] = Some(4);
/// director.after_variable_changed(0, 1, "value");
/// assert_eq!(director.calculate_score(), SimpleScore::of(0));
/// ```
pub struct IncrementalScoreDirector<S, C>
where
    S: SolvableSolution,
    C: ConstraintSet<S, S::Score>,
{
    working_solution: S,
    solution_descriptor: SolutionDescriptor,
    constraints: C,
    shadows: ShadowCascade<S>,
    cached_score: S::Score,
    initialized: bool,
    calculation_count: u64,
    changed: Vec<(usize, usize)>,
}

impl<S, C> IncrementalScoreDirector<S, C>
where
    S: SolvableSolution,
    C: ConstraintSet<S, S::Score>,
{
    pub fn new(solution: S, solution_descriptor: SolutionDescriptor, constraints: C) -> Self {
        Self {
            working_solution: solution,
            solution_descriptor,
            constraints,
            shadows: ShadowCascade::empty(),
            cached_score: S::Score::zero(),
            initialized: false,
            calculation_count: 0,
            changed: Vec::new(),
        }
    }

    /// Installs the shadow cascade and brings every shadow up to date.
    pub fn with_shadows(mut self, shadows: ShadowCascade<S>) -> Self {
        self.shadows = shadows;
        self.shadows.update_all(&mut self.working_solution);
        self.reset_state();
        self
    }

    /// Returns the cached score without recalculation.
    pub fn cached_score(&self) -> S::Score {
        self.cached_score
    }

    pub fn constraints(&self) -> &C {
        &self.constraints
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of `calculate_score` calls so far.
    pub fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    /// Consumes the director and returns the working solution.
    pub fn take_solution(self) -> S {
        self.working_solution
    }

    fn reset_state(&mut self) {
        self.constraints.reset_all();
        self.initialized = false;
        self.cached_score = S::Score::zero();
    }

    fn emit(&mut self, event: SourceEvent) {
        let delta = self.constraints.on_event_all(&self.working_solution, &event);
        self.cached_score = self.cached_score + delta;
    }

    // Emits `make(index)` for every index in `range` of `class`.
    fn emit_range(
        &mut self,
        class: SourceClass,
        range: std::ops::Range<usize>,
        make: fn(SourceClass, usize) -> SourceEvent,
    ) {
        if !self.initialized {
            return;
        }
        for index in range {
            self.emit(make(class, index));
        }
    }

    // Runs the shadow cascade for a change on `(descriptor_index, entity_index)`
    // and emits updates for every entity it touched outside `skip`.
    fn cascade_and_update(
        &mut self,
        descriptor_index: usize,
        variable_index: Option<usize>,
        entity_index: usize,
        skip: std::ops::Range<usize>,
    ) {
        let mut changed = std::mem::take(&mut self.changed);
        changed.clear();
        self.shadows.cascade(
            &mut self.working_solution,
            descriptor_index,
            variable_index,
            entity_index,
            &mut changed,
        );
        if self.initialized {
            for &(d, i) in &changed {
                if d == descriptor_index && skip.contains(&i) {
                    continue;
                }
                self.emit(update(SourceClass::Entity(d), i));
            }
        }
        self.changed = changed;
    }

    fn variable_index(&self, descriptor_index: usize, variable_name: &str) -> Option<usize> {
        if variable_name.is_empty() {
            return None;
        }
        self.solution_descriptor
            .entity_descriptors
            .get(descriptor_index)
            .and_then(|e| e.variable_index(variable_name))
    }
}

fn insert(class: SourceClass, index: usize) -> SourceEvent {
    SourceEvent::Insert { class, index }
}

fn update(class: SourceClass, index: usize) -> SourceEvent {
    SourceEvent::Update { class, index }
}

fn retract(class: SourceClass, index: usize) -> SourceEvent {
    SourceEvent::Retract { class, index }
}

impl<S, C> Clone for IncrementalScoreDirector<S, C>
where
    S: SolvableSolution,
    C: ConstraintSet<S, S::Score>,
{
    fn clone(&self) -> Self {
        Self {
            working_solution: self.working_solution.clone(),
            solution_descriptor: self.solution_descriptor.clone(),
            constraints: self.constraints.clone(),
            shadows: self.shadows.clone(),
            cached_score: self.cached_score,
            initialized: self.initialized,
            calculation_count: self.calculation_count,
            changed: Vec::new(),
        }
    }
}

impl<S, C> fmt::Debug for IncrementalScoreDirector<S, C>
where
    S: SolvableSolution,
    C: ConstraintSet<S, S::Score>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalScoreDirector")
            .field("initialized", &self.initialized)
            .field("cached_score", &self.cached_score)
            .field("constraint_count", &self.constraints.constraint_count())
            .field("shadows", &self.shadows)
            .finish()
    }
}

impl<S, C> ScoreDirector<S> for IncrementalScoreDirector<S, C>
where
    S: SolvableSolution,
    C: ConstraintSet<S, S::Score>,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        &mut self.working_solution
    }

    fn set_working_solution(&mut self, solution: S) {
        self.working_solution = solution;
        self.shadows.update_all(&mut self.working_solution);
        self.reset_state();
    }

    fn calculate_score(&mut self) -> S::Score {
        if !self.initialized {
            self.cached_score = self.constraints.initialize_all(&self.working_solution);
            self.initialized = true;
            debug!(
                score = %self.cached_score,
                constraint_count = self.constraints.constraint_count(),
                "Initialized constraint graph"
            );
        }
        self.calculation_count += 1;
        self.working_solution.set_score(Some(self.cached_score));
        self.cached_score
    }

    fn solution_descriptor(&self) -> &SolutionDescriptor {
        &self.solution_descriptor
    }

    fn clone_working_solution(&self) -> S {
        self.working_solution.clone()
    }

    // Nodes keep the tuples they last emitted, so the graph only needs the
    // new state.
    fn before_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        let variable_index = self.variable_index(descriptor_index, variable_name);
        self.cascade_and_update(
            descriptor_index,
            variable_index,
            entity_index,
            entity_index..entity_index + 1,
        );
        if self.initialized {
            self.emit(update(SourceClass::Entity(descriptor_index), entity_index));
        }
    }

    fn before_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        let n = S::entity_count(&self.working_solution, descriptor_index);
        self.emit_range(
            SourceClass::Entity(descriptor_index),
            entity_index..n,
            retract,
        );
    }

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        let n = S::entity_count(&self.working_solution, descriptor_index);
        self.cascade_and_update(descriptor_index, None, entity_index, entity_index..n);
        self.emit_range(
            SourceClass::Entity(descriptor_index),
            entity_index..n,
            insert,
        );
    }

    fn before_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        let n = S::entity_count(&self.working_solution, descriptor_index);
        self.emit_range(
            SourceClass::Entity(descriptor_index),
            entity_index..n,
            retract,
        );
    }

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        let n = S::entity_count(&self.working_solution, descriptor_index);
        for index in removal_cascade(entity_index, n) {
            self.cascade_and_update(descriptor_index, None, index, entity_index..n);
        }
        self.emit_range(
            SourceClass::Entity(descriptor_index),
            entity_index..n,
            insert,
        );
    }

    fn before_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) {
        let n = S::fact_count(&self.working_solution, descriptor_index);
        self.emit_range(SourceClass::Fact(descriptor_index), fact_index..n, retract);
    }

    fn after_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) {
        let n = S::fact_count(&self.working_solution, descriptor_index);
        self.emit_range(SourceClass::Fact(descriptor_index), fact_index..n, insert);
    }

    fn before_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) {
        let n = S::fact_count(&self.working_solution, descriptor_index);
        self.emit_range(SourceClass::Fact(descriptor_index), fact_index..n, retract);
    }

    fn after_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) {
        let n = S::fact_count(&self.working_solution, descriptor_index);
        self.emit_range(SourceClass::Fact(descriptor_index), fact_index..n, insert);
    }

    fn before_problem_fact_changed(&mut self, _descriptor_index: usize, _fact_index: usize) {}

    fn after_problem_fact_changed(&mut self, descriptor_index: usize, fact_index: usize) {
        if self.initialized {
            self.emit(update(SourceClass::Fact(descriptor_index), fact_index));
        }
    }

    fn trigger_variable_listeners(&mut self) {
        if self.shadows.is_empty() {
            return;
        }
        self.shadows.update_all(&mut self.working_solution);
        self.reset_state();
    }

    fn entity_count(&self, descriptor_index: usize) -> usize {
        S::entity_count(&self.working_solution, descriptor_index)
    }

    fn is_incremental(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.reset_state();
    }

    fn assert_score_from_scratch(&mut self) -> Result<S::Score, ScoreCorruptionError> {
        let incremental = self.calculate_score();
        let mut fresh = self.constraints.clone();
        fresh.reset_all();
        let from_scratch = fresh.initialize_all(&self.working_solution);
        if from_scratch == incremental {
            return Ok(incremental);
        }

        let diverging_constraints = self
            .constraints
            .evaluate_each()
            .into_iter()
            .zip(fresh.evaluate_each())
            .filter(|(live, expected)| live.score != expected.score)
            .map(|(live, expected)| {
                format!("{}: {} != {}", live.name, live.score, expected.score)
            })
            .collect::<Vec<_>>();
        warn!(
            incremental = %incremental,
            from_scratch = %from_scratch,
            diverging = diverging_constraints.len(),
            "Score corruption detected"
        );
        Err(ScoreCorruptionError {
            incremental: incremental.to_string(),
            from_scratch: from_scratch.to_string(),
            context: format!("score calculation #{}", self.calculation_count),
            diverging_constraints,
        })
    }

    fn explain_score(&mut self) -> ScoreExplanation<S::Score> {
        let score = self.calculate_score();
        ScoreExplanation::new(score, self.constraints.analyze())
    }
}
