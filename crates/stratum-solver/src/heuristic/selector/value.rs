//! Value selection for basic variables.

use rand::prelude::SliceRandom;
use rand::RngCore;
use stratum_core::domain::PlanningSolution;

use super::SelectionOrder;
use crate::heuristic::variable::{BasicVariable, PlanningValue};

/// Strength ordering applied to candidate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueSorting {
    /// Value range order.
    #[default]
    None,
    WeakestFirst,
    StrongestFirst,
}

/// Lists the candidate values of a basic variable for one entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSelector {
    order: SelectionOrder,
    sorting: ValueSorting,
}

impl ValueSelector {
    pub fn new(order: SelectionOrder) -> Self {
        Self {
            order,
            sorting: ValueSorting::None,
        }
    }

    /// Original order sorted by strength; ignored when the variable has no
    /// strength function.
    pub fn sorted(sorting: ValueSorting) -> Self {
        Self {
            order: SelectionOrder::Original,
            sorting,
        }
    }

    /// Candidate values, including `None` when the variable allows
    /// unassigned.
    pub fn select<S, V>(
        &self,
        variable: &BasicVariable<S, V>,
        solution: &S,
        entity_index: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Option<V>>
    where
        S: PlanningSolution,
        V: PlanningValue,
    {
        let mut values = variable.values(solution, entity_index);
        match (self.sorting, variable.strength) {
            (ValueSorting::WeakestFirst, Some(strength)) => {
                values.sort_by_key(|v| strength(solution, v));
            }
            (ValueSorting::StrongestFirst, Some(strength)) => {
                values.sort_by_key(|v| std::cmp::Reverse(strength(solution, v)));
            }
            _ => {}
        }
        if self.order == SelectionOrder::Random {
            values.shuffle(rng);
        }
        let mut candidates: Vec<Option<V>> = values.into_iter().map(Some).collect();
        if variable.allows_unassigned {
            candidates.push(None);
        }
        candidates
    }
}
