//! Exhaustive search phase using branch-and-bound.
//!
//! Exhaustive search assigns the unassigned entities of one basic variable
//! in every possible combination. Branch and bound prunes any partial
//! assignment whose score cannot beat the best complete assignment found so
//! far; brute force explores every node.
//!
//! # Exploration Types
//!
//! - **Depth First**: Explores deepest nodes first (memory efficient)
//! - **Score First**: Explores best-scoring nodes first (greedy)
//!
//! The bound of a partial assignment is its own score, which is only sound
//! when assigning further entities can never raise the score, as with
//! penalty-only constraints.

mod node;

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_config::ExhaustiveSearchConfig;
use stratum_core::domain::PlanningSolution;
use stratum_core::SolverError;
use stratum_scoring::ScoreDirector;
use tracing::{debug, warn};

use crate::heuristic::variable::{BasicVariable, PlanningValue};
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::Termination;
use node::{Frontier, Node};

pub use stratum_config::{ExhaustiveSearchType, ExplorationType};

/// Exhaustive search phase over one basic variable.
///
/// Skips itself with a warning when more than `entity_limit` entities are
/// unassigned. At the end the working solution holds the best complete
/// assignment found, or its starting state if none was.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stratum_solver::heuristic::BasicVariable;
/// use stratum_solver::phase::exhaustive::ExhaustiveSearchPhase;
/// use stratum_solver::phase::Phase;
/// use stratum_solver::scope::SolverScope;
/// use stratum_core::score::SimpleScore;
/// use stratum_test::nqueens::{self, NQueensSolution};
///
/// let row = Arc::new(BasicVariable::new(
///     0, "row", nqueens::queen_count, nqueens::get_queen_row, nqueens::set_queen_row,
///     nqueens::row_range(4),
/// ));
/// let director = nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap();
/// let mut scope = SolverScope::new(director);
/// ExhaustiveSearchPhase::new(row).solve(&mut scope).unwrap();
/// assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
/// ```
pub struct ExhaustiveSearchPhase<S: PlanningSolution, V> {
    variable: Arc<BasicVariable<S, V>>,
    search_type: ExhaustiveSearchType,
    exploration_type: ExplorationType,
    entity_limit: usize,
    node_limit: Option<u64>,
    termination: Option<Box<dyn Termination<S>>>,
}

impl<S, V> ExhaustiveSearchPhase<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    /// Depth-first branch and bound over at most 12 entities.
    pub fn new(variable: Arc<BasicVariable<S, V>>) -> Self {
        Self {
            variable,
            search_type: ExhaustiveSearchType::BranchAndBound,
            exploration_type: ExplorationType::DepthFirst,
            entity_limit: 12,
            node_limit: None,
            termination: None,
        }
    }

    pub fn from_config(
        variable: Arc<BasicVariable<S, V>>,
        config: &ExhaustiveSearchConfig,
    ) -> Self {
        Self::new(variable)
            .with_search_type(config.exhaustive_search_type)
            .with_exploration_type(config.exploration_type)
            .with_entity_limit(config.entity_limit())
            .with_node_limit(config.node_limit)
    }

    pub fn with_search_type(mut self, search_type: ExhaustiveSearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn with_exploration_type(mut self, exploration_type: ExplorationType) -> Self {
        self.exploration_type = exploration_type;
        self
    }

    pub fn with_entity_limit(mut self, entity_limit: usize) -> Self {
        self.entity_limit = entity_limit;
        self
    }

    pub fn with_node_limit(mut self, node_limit: Option<u64>) -> Self {
        self.node_limit = node_limit;
        self
    }

    pub fn with_termination(mut self, termination: impl Termination<S> + 'static) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_boxed_termination(mut self, termination: Option<Box<dyn Termination<S>>>) -> Self {
        self.termination = termination;
        self
    }

    fn prunes(&self) -> bool {
        self.search_type == ExhaustiveSearchType::BranchAndBound
    }

    fn assign(&self, director: &mut dyn ScoreDirector<S>, entity: usize, value: Option<V>) {
        let var = &self.variable;
        director.before_variable_changed(var.descriptor_index, entity, var.variable_name);
        (var.setter)(director.working_solution_mut(), entity, value);
        director.after_variable_changed(var.descriptor_index, entity, var.variable_name);
    }

    // Rewinds the assigned prefix `current` to the longest prefix it shares
    // with `target`, then assigns the rest of `target`.
    fn move_to(
        &self,
        director: &mut dyn ScoreDirector<S>,
        entities: &[usize],
        current: &mut Vec<V>,
        target: &[V],
    ) {
        let shared = current
            .iter()
            .zip(target)
            .take_while(|(a, b)| a == b)
            .count();
        while current.len() > shared {
            current.pop();
            self.assign(director, entities[current.len()], None);
        }
        for value in &target[shared..] {
            self.assign(director, entities[current.len()], Some(value.clone()));
            current.push(value.clone());
        }
    }
}

impl<S: PlanningSolution, V> Debug for ExhaustiveSearchPhase<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExhaustiveSearchPhase")
            .field("variable", &self.variable.variable_name)
            .field("search_type", &self.search_type)
            .field("exploration_type", &self.exploration_type)
            .field("entity_limit", &self.entity_limit)
            .field("node_limit", &self.node_limit)
            .finish()
    }
}

impl<S, D, V> Phase<S, D> for ExhaustiveSearchPhase<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: PlanningValue,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<'_, S, D>) -> Result<(), SolverError> {
        let entities = self.variable.unassigned_entities(solver_scope.working_solution());
        if entities.is_empty() {
            return Ok(());
        }
        if entities.len() > self.entity_limit {
            warn!(
                event = "phase_skipped",
                phase = "ExhaustiveSearch",
                entity_count = entities.len(),
                entity_limit = self.entity_limit,
                reason = "too many entities for exhaustive search",
            );
            return Ok(());
        }

        let mut frontier = Frontier::new(self.exploration_type);
        frontier.push(Node::root(solver_scope.calculate_score()));
        let mut current: Vec<V> = Vec::new();
        let mut best: Option<Node<V, S::Score>> = None;
        let mut sequence = 0u64;
        let mut nodes = 0u64;

        while let Some(node) = frontier.pop() {
            if solver_scope.is_phase_terminated(self.termination.as_deref())
                || self.node_limit.is_some_and(|limit| nodes >= limit)
            {
                break;
            }
            if self.prunes() && best.as_ref().is_some_and(|b| node.score <= b.score) {
                continue;
            }
            nodes += 1;
            solver_scope.step_started();
            self.move_to(solver_scope.score_director_mut(), &entities, &mut current, &node.path);

            if node.depth() == entities.len() {
                if best.as_ref().map_or(true, |b| node.score > b.score) {
                    solver_scope.update_best_solution_with(node.score);
                    best = Some(node.clone());
                }
                solver_scope.step_ended(node.score);
                continue;
            }

            let entity = entities[node.depth()];
            let values = self.variable.values(solver_scope.working_solution(), entity);
            let mut children = Vec::with_capacity(values.len());
            for value in values {
                self.assign(solver_scope.score_director_mut(), entity, Some(value.clone()));
                let score = solver_scope.calculate_score();
                self.assign(solver_scope.score_director_mut(), entity, None);
                solver_scope.record_move(true);
                let prunable = self.prunes() && best.as_ref().is_some_and(|b| score <= b.score);
                if !prunable {
                    sequence += 1;
                    children.push(node.child(value, score, sequence));
                }
            }
            frontier.push_children(children);
            solver_scope.step_ended(node.score);
            solver_scope.assert_step()?;
        }

        let target = best.as_ref().map_or(&[][..], |b| b.path.as_slice());
        self.move_to(solver_scope.score_director_mut(), &entities, &mut current, target);
        solver_scope.calculate_score();
        debug!(
            event = "exhaustive_search_done",
            nodes,
            best_score = ?best.as_ref().map(|b| b.score),
        );
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "ExhaustiveSearch"
    }
}

#[cfg(test)]
mod tests;
