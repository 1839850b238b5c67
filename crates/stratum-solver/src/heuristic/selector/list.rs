//! Move selectors for list variables.
//!
//! All four selectors enumerate their full neighborhood over the movable
//! entities of one list variable:
//!
//! - [`ListChangeMoveSelector`] - every element to every other position
//! - [`ListSwapMoveSelector`] - every pair of positions
//! - [`ListReverseMoveSelector`] - every segment of two or more elements
//! - [`SubListChangeMoveSelector`] - every bounded sublist to every position

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

use rand::RngCore;
use stratum_core::domain::PlanningSolution;
use stratum_scoring::ScoreDirector;

use super::{emit, MoveSelector, SelectionOrder};
use crate::heuristic::r#move::{
    ListChangeMove, ListReverseMove, ListSwapMove, MoveArena, SubListChangeMove,
};
use crate::heuristic::variable::{ListVariable, PlanningValue};

macro_rules! list_selector {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<S, V, M> {
            variable: Arc<ListVariable<S, V>>,
            order: SelectionOrder,
            _phantom: PhantomData<fn() -> M>,
        }

        impl<S, V, M> $name<S, V, M> {
            pub fn new(variable: Arc<ListVariable<S, V>>, order: SelectionOrder) -> Self {
                Self {
                    variable,
                    order,
                    _phantom: PhantomData,
                }
            }
        }

        impl<S, V, M> Debug for $name<S, V, M> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("variable", &self.variable.variable_name)
                    .field("order", &self.order)
                    .finish()
            }
        }
    };
}

// `(entity, len)` for every movable entity.
fn movable_lists<S, V>(variable: &ListVariable<S, V>, solution: &S) -> Vec<(usize, usize)>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    (0..variable.entity_count(solution))
        .filter(|&e| !variable.is_pinned(solution, e))
        .map(|e| (e, variable.len(solution, e)))
        .collect()
}

list_selector! {
    /// Relocates single elements within and across lists.
    ListChangeMoveSelector
}

impl<S, V, M> MoveSelector<S, M> for ListChangeMoveSelector<S, V, M>
where
    S: PlanningSolution,
    V: PlanningValue,
    M: From<ListChangeMove<S, V>>,
{
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        let lists = movable_lists(&self.variable, score_director.working_solution());
        let mut moves: Vec<M> = Vec::new();
        for &(from, from_len) in &lists {
            for from_index in 0..from_len {
                for &(to, to_len) in &lists {
                    // Positions after the element is removed.
                    let positions = if from == to { to_len } else { to_len + 1 };
                    for to_index in 0..positions {
                        if from == to && to_index == from_index {
                            continue;
                        }
                        let change = ListChangeMove::new(
                            Arc::clone(&self.variable),
                            from,
                            from_index,
                            to,
                            to_index,
                        );
                        moves.push(change.into());
                    }
                }
            }
        }
        emit(moves, self.order, rng, arena);
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        let lists = movable_lists(&self.variable, score_director.working_solution());
        let elements: usize = lists.iter().map(|&(_, len)| len).sum();
        elements * (elements + lists.len())
    }
}

list_selector! {
    /// Swaps every pair of positions, within and across lists.
    ListSwapMoveSelector
}

impl<S, V, M> MoveSelector<S, M> for ListSwapMoveSelector<S, V, M>
where
    S: PlanningSolution,
    V: PlanningValue,
    M: From<ListSwapMove<S, V>>,
{
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        let solution = score_director.working_solution();
        let positions: Vec<(usize, usize)> = movable_lists(&self.variable, solution)
            .into_iter()
            .flat_map(|(e, len)| (0..len).map(move |i| (e, i)))
            .collect();
        let mut moves: Vec<M> = Vec::new();
        for (k, &(e1, i1)) in positions.iter().enumerate() {
            for &(e2, i2) in &positions[k + 1..] {
                moves.push(ListSwapMove::new(Arc::clone(&self.variable), e1, i1, e2, i2).into());
            }
        }
        emit(moves, self.order, rng, arena);
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        let n: usize = movable_lists(&self.variable, score_director.working_solution())
            .iter()
            .map(|&(_, len)| len)
            .sum();
        n * n.saturating_sub(1) / 2
    }
}

list_selector! {
    /// Reverses every segment of at least two elements (2-opt).
    ListReverseMoveSelector
}

impl<S, V, M> MoveSelector<S, M> for ListReverseMoveSelector<S, V, M>
where
    S: PlanningSolution,
    V: PlanningValue,
    M: From<ListReverseMove<S, V>>,
{
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        let mut moves: Vec<M> = Vec::new();
        for (entity, len) in movable_lists(&self.variable, score_director.working_solution()) {
            for start in 0..len {
                for end in (start + 2)..=len {
                    let reverse =
                        ListReverseMove::new(Arc::clone(&self.variable), entity, start, end);
                    moves.push(reverse.into());
                }
            }
        }
        emit(moves, self.order, rng, arena);
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        movable_lists(&self.variable, score_director.working_solution())
            .iter()
            .map(|&(_, len)| len * len.saturating_sub(1) / 2)
            .sum()
    }
}

/// Relocates every sublist of `minimum..=maximum` elements.
pub struct SubListChangeMoveSelector<S, V, M> {
    variable: Arc<ListVariable<S, V>>,
    minimum_size: usize,
    maximum_size: usize,
    order: SelectionOrder,
    _phantom: PhantomData<fn() -> M>,
}

impl<S, V, M> Debug for SubListChangeMoveSelector<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubListChangeMoveSelector")
            .field("variable", &self.variable.variable_name)
            .field("sizes", &(self.minimum_size..=self.maximum_size))
            .field("order", &self.order)
            .finish()
    }
}

impl<S, V, M> SubListChangeMoveSelector<S, V, M> {
    /// A minimum below 1 is raised to 1.
    pub fn new(
        variable: Arc<ListVariable<S, V>>,
        minimum_size: usize,
        maximum_size: usize,
        order: SelectionOrder,
    ) -> Self {
        let minimum_size = minimum_size.max(1);
        Self {
            variable,
            minimum_size,
            maximum_size: maximum_size.max(minimum_size),
            order,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, M> MoveSelector<S, M> for SubListChangeMoveSelector<S, V, M>
where
    S: PlanningSolution,
    V: PlanningValue,
    M: From<SubListChangeMove<S, V>>,
{
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        let lists = movable_lists(&self.variable, score_director.working_solution());
        let mut moves: Vec<M> = Vec::new();
        for &(from, from_len) in &lists {
            for size in self.minimum_size..=self.maximum_size.min(from_len) {
                for start in 0..=(from_len - size) {
                    for &(to, to_len) in &lists {
                        let remaining = if from == to { to_len - size } else { to_len };
                        for to_index in 0..=remaining {
                            if from == to && to_index == start {
                                continue;
                            }
                            moves.push(
                                SubListChangeMove::new(
                                    Arc::clone(&self.variable),
                                    from,
                                    start,
                                    start + size,
                                    to,
                                    to_index,
                                )
                                .into(),
                            );
                        }
                    }
                }
            }
        }
        emit(moves, self.order, rng, arena);
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        let lists = movable_lists(&self.variable, score_director.working_solution());
        let elements: usize = lists.iter().map(|&(_, len)| len).sum();
        let sizes = self.maximum_size + 1 - self.minimum_size;
        elements * sizes * (elements + lists.len())
    }
}
