//! Union of move selectors.

use std::fmt::{self, Debug};

use rand::RngCore;
use stratum_core::domain::PlanningSolution;
use stratum_scoring::ScoreDirector;

use super::MoveSelector;
use crate::heuristic::r#move::MoveArena;

/// Concatenates the neighborhoods of its children, in child order.
///
/// Each child applies its own selection order, so a random child shuffles
/// only its own moves.
pub struct UnionMoveSelector<S, M> {
    children: Vec<Box<dyn MoveSelector<S, M>>>,
}

impl<S, M> Debug for UnionMoveSelector<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionMoveSelector")
            .field("children", &self.children.len())
            .finish()
    }
}

impl<S: PlanningSolution, M> UnionMoveSelector<S, M> {
    pub fn new(children: Vec<Box<dyn MoveSelector<S, M>>>) -> Self {
        Self { children }
    }

    pub fn with(mut self, child: impl MoveSelector<S, M> + 'static) -> Self
    where
        M: 'static,
    {
        self.children.push(Box::new(child));
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<S: PlanningSolution, M> MoveSelector<S, M> for UnionMoveSelector<S, M> {
    fn fill(
        &mut self,
        score_director: &dyn ScoreDirector<S>,
        rng: &mut dyn RngCore,
        arena: &mut MoveArena<M>,
    ) {
        for child in &mut self.children {
            child.fill(score_director, rng, arena);
        }
    }

    fn size(&self, score_director: &dyn ScoreDirector<S>) -> usize {
        self.children.iter().map(|c| c.size(score_director)).sum()
    }
}
