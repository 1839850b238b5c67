//! Tabu search acceptor.

use std::collections::VecDeque;

use rand::RngCore;
use stratum_core::domain::PlanningSolution;

use super::{AcceptContext, Acceptor};
use crate::heuristic::r#move::MoveSignature;

/// Tabu search acceptor.
///
/// Remembers the signatures of the last steps' moves:
/// - entity tabu forbids any move touching an entity moved in the last
///   `entity_tabu_size` steps;
/// - move tabu forbids the exact undo of any of the last `move_tabu_size`
///   step moves.
///
/// Non-tabu moves are always accepted; the forager picks among them. With
/// aspiration, a tabu move that beats the best score is accepted anyway.
///
/// # Example
///
/// ```
/// use stratum_solver::phase::localsearch::TabuSearchAcceptor;
///
/// let acceptor = TabuSearchAcceptor::new(7, 0).with_aspiration(false);
/// assert_eq!(acceptor.tabu_len(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct TabuSearchAcceptor {
    entity_tabu_size: usize,
    move_tabu_size: usize,
    aspiration: bool,
    // Most recent step last.
    recent: VecDeque<MoveSignature>,
}

impl TabuSearchAcceptor {
    pub fn new(entity_tabu_size: usize, move_tabu_size: usize) -> Self {
        Self {
            entity_tabu_size,
            move_tabu_size,
            aspiration: true,
            recent: VecDeque::new(),
        }
    }

    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    /// Number of remembered step moves.
    pub fn tabu_len(&self) -> usize {
        self.recent.len()
    }

    fn window(&self) -> usize {
        self.entity_tabu_size.max(self.move_tabu_size)
    }

    /// True if `signature` is forbidden by either tabu list.
    pub fn is_tabu(&self, signature: &MoveSignature) -> bool {
        self.recent.iter().rev().enumerate().any(|(age, step)| {
            (age < self.entity_tabu_size && step.touches(signature))
                || (age < self.move_tabu_size && step.reverses(signature))
        })
    }
}

impl<S: PlanningSolution> Acceptor<S> for TabuSearchAcceptor {
    fn is_accepted(&self, candidate: &AcceptContext<'_, S::Score>, _rng: &mut dyn RngCore) -> bool {
        if self.aspiration && candidate.move_score > candidate.best_score {
            return true;
        }
        candidate.signature.map_or(true, |sig| !self.is_tabu(sig))
    }

    fn needs_signatures(&self) -> bool {
        true
    }

    fn phase_started(&mut self, _initial_score: &S::Score) {
        self.recent.clear();
    }

    fn phase_ended(&mut self) {
        self.recent.clear();
    }

    fn step_ended(&mut self, _step_score: &S::Score, signature: Option<&MoveSignature>) {
        let Some(signature) = signature else {
            return;
        };
        self.recent.push_back(signature.clone());
        while self.recent.len() > self.window() {
            self.recent.pop_front();
        }
    }
}
