//! Entity selection for basic variables.

use rand::prelude::SliceRandom;
use rand::RngCore;
use stratum_core::domain::PlanningSolution;

use super::SelectionOrder;
use crate::heuristic::variable::{BasicVariable, PlanningValue};

/// Picks the movable entities of one basic variable.
///
/// Pinned entities are never selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitySelector {
    order: SelectionOrder,
}

impl EntitySelector {
    pub fn new(order: SelectionOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SelectionOrder {
        self.order
    }

    pub fn select<S, V>(
        &self,
        variable: &BasicVariable<S, V>,
        solution: &S,
        rng: &mut dyn RngCore,
    ) -> Vec<usize>
    where
        S: PlanningSolution,
        V: PlanningValue,
    {
        let mut entities: Vec<usize> = (0..variable.entity_count(solution))
            .filter(|&e| !variable.is_pinned(solution, e))
            .collect();
        if self.order == SelectionOrder::Random {
            entities.shuffle(rng);
        }
        entities
    }

    /// Unassigned entities, hardest first when the variable has a
    /// difficulty function and `decreasing` is set.
    ///
    /// The sort is stable, so equally difficult entities keep index order.
    pub fn select_unassigned<S, V>(
        &self,
        variable: &BasicVariable<S, V>,
        solution: &S,
        decreasing: bool,
    ) -> Vec<usize>
    where
        S: PlanningSolution,
        V: PlanningValue,
    {
        let mut entities = variable.unassigned_entities(solution);
        if let (true, Some(difficulty)) = (decreasing, variable.difficulty) {
            entities.sort_by_key(|&e| std::cmp::Reverse(difficulty(solution, e)));
        }
        entities
    }
}
