//! Move selectors for basic variables.

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

use rand::RngCore;
use stratum_core::domain::PlanningSolution;
use stratum_scoring::ScoreDirector;

use super::{emit, EntitySelector, MoveSelector, SelectionOrder, ValueSelector};
use crate::heuristic::r#move::{ChangeMove, MoveArena, SwapMove};
use crate::heuristic::variable::{BasicVariable, PlanningValue};

/// Every `(entity, value)` change of one basic variable.
///
/// Changes to the entity's current value are skipped.
pub struct ChangeMoveSelector<S, V, M> {
    variable: Arc<BasicVariable<S, V>>,
    entity_selector: EntitySelector,
    value_selector: ValueSelector,
    order: SelectionOrder,
    _phantom: PhantomData<fn() -> M>,
}

impl<S, V, M> Debug for ChangeMoveSelector<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMoveSelector")
            .field("variable", &self.variable.variable_name)
            .field("order", &self.order)
            .finish()
    }
}

impl<S, V, M> ChangeMoveSelector<S, V, M> {
    pub fn new(variable: Arc<BasicVariable<S, V>>, order: SelectionOrder) -> Self {
        Self {
            variable,
            entity_selector: EntitySelector::new(SelectionOrder::Original),
            value_selector: ValueSelector::new(SelectionOrder::Original),
            order,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, M> MoveSelector<S, M> for ChangeMoveSelector<S, V, M>
where
    S: PlanningSolution,
    V: PlanningValue,
    M: From<ChangeMove<S, V>>,
{
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        let solution = score_director.working_solution();
        let var = &self.variable;
        let mut moves: Vec<M> = Vec::new();
        for entity in self.entity_selector.select(var, solution, rng) {
            let current = var.get(solution, entity);
            for value in self.value_selector.select(var, solution, entity, rng) {
                if value != current {
                    moves.push(ChangeMove::new(Arc::clone(var), entity, value).into());
                }
            }
        }
        emit(moves, self.order, rng, arena);
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        let solution = score_director.working_solution();
        (0..self.variable.entity_count(solution))
            .map(|e| self.variable.value_range.size(solution, e))
            .sum()
    }
}

/// Every swap between two movable entities holding different values.
pub struct SwapMoveSelector<S, V, M> {
    variable: Arc<BasicVariable<S, V>>,
    entity_selector: EntitySelector,
    order: SelectionOrder,
    _phantom: PhantomData<fn() -> M>,
}

impl<S, V, M> Debug for SwapMoveSelector<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapMoveSelector")
            .field("variable", &self.variable.variable_name)
            .field("order", &self.order)
            .finish()
    }
}

impl<S, V, M> SwapMoveSelector<S, V, M> {
    pub fn new(variable: Arc<BasicVariable<S, V>>, order: SelectionOrder) -> Self {
        Self {
            variable,
            entity_selector: EntitySelector::new(SelectionOrder::Original),
            order,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, M> MoveSelector<S, M> for SwapMoveSelector<S, V, M>
where
    S: PlanningSolution,
    V: PlanningValue,
    M: From<SwapMove<S, V>>,
{
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        let solution = score_director.working_solution();
        let var = &self.variable;
        let entities = self.entity_selector.select(var, solution, rng);
        let values: Vec<Option<V>> = entities.iter().map(|&e| var.get(solution, e)).collect();
        let mut moves: Vec<M> = Vec::new();
        for i in 0..entities.len() {
            for j in (i + 1)..entities.len() {
                if values[i] != values[j] {
                    moves.push(SwapMove::new(Arc::clone(var), entities[i], entities[j]).into());
                }
            }
        }
        emit(moves, self.order, rng, arena);
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        let n = self.variable.entity_count(score_director.working_solution());
        n * n.saturating_sub(1) / 2
    }
}
