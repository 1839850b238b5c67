//! Selectors for entities, values, and moves.
//!
//! Selectors enumerate the elements that the solver considers when
//! exploring the solution space. A move selector fills the step's
//! [`MoveArena`] with every candidate of its neighborhood, in original order
//! or shuffled with the solver's seeded random generator.

mod basic;
mod entity;
mod list;
mod union;
mod value;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use rand::prelude::SliceRandom;
use rand::RngCore;
use stratum_core::domain::PlanningSolution;
use stratum_scoring::ScoreDirector;

pub use basic::{ChangeMoveSelector, SwapMoveSelector};
pub use entity::EntitySelector;
pub use list::{
    ListChangeMoveSelector, ListReverseMoveSelector, ListSwapMoveSelector,
    SubListChangeMoveSelector,
};
pub use stratum_config::SelectionOrder;
pub use union::UnionMoveSelector;
pub use value::{ValueSelector, ValueSorting};

use crate::heuristic::r#move::MoveArena;

/// Generates the candidate moves of one step.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type the arena holds
pub trait MoveSelector<S: PlanningSolution, M>: Send + Debug {
    /// Appends every candidate move for the current working solution.
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    );

    /// Returns the approximate number of moves.
    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize;
}

impl<S: PlanningSolution, M> MoveSelector<S, M> for Box<dyn MoveSelector<S, M>> {
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        (**self).fill(score_director, rng, arena)
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        (**self).size(score_director)
    }
}

// Moves generated in original order go straight to the arena; random order
// shuffles the batch first.
pub(crate) fn emit<M>(
    mut moves: Vec<M>,
    order: SelectionOrder,
    rng: &mut dyn RngCore,
    arena: &mut MoveArena<M>,
) {
    if order == SelectionOrder::Random {
        moves.shuffle(rng);
    }
    arena.extend(moves);
}
