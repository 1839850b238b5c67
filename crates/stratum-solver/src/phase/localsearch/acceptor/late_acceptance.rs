//! Late acceptance acceptor.

use std::fmt::{self, Debug};

use rand::RngCore;
use stratum_core::domain::PlanningSolution;

use super::{AcceptContext, Acceptor};
use crate::heuristic::r#move::MoveSignature;

/// Late acceptance acceptor - compares against the score from N steps ago.
///
/// Keeps a ring of the last `late_acceptance_size` step scores. A move is
/// accepted if it is at least as good as the oldest score in the ring or
/// as the last step score.
///
/// # Example
///
/// ```
/// use stratum_solver::phase::localsearch::LateAcceptanceAcceptor;
/// use stratum_test::nqueens::NQueensSolution;
///
/// let acceptor = LateAcceptanceAcceptor::<NQueensSolution>::new(400);
/// ```
pub struct LateAcceptanceAcceptor<S: PlanningSolution> {
    late_acceptance_size: usize,
    score_history: Vec<S::Score>,
    current_index: usize,
}

impl<S: PlanningSolution> LateAcceptanceAcceptor<S> {
    /// A size of zero is treated as one.
    pub fn new(late_acceptance_size: usize) -> Self {
        Self {
            late_acceptance_size: late_acceptance_size.max(1),
            score_history: Vec::new(),
            current_index: 0,
        }
    }

    fn late_score(&self) -> Option<&S::Score> {
        self.score_history.get(self.current_index)
    }
}

impl<S: PlanningSolution> Default for LateAcceptanceAcceptor<S> {
    fn default() -> Self {
        Self::new(400)
    }
}

impl<S: PlanningSolution> Clone for LateAcceptanceAcceptor<S> {
    fn clone(&self) -> Self {
        Self {
            late_acceptance_size: self.late_acceptance_size,
            score_history: self.score_history.clone(),
            current_index: self.current_index,
        }
    }
}

impl<S: PlanningSolution> Debug for LateAcceptanceAcceptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LateAcceptanceAcceptor")
            .field("late_acceptance_size", &self.late_acceptance_size)
            .field("current_index", &self.current_index)
            .finish()
    }
}

impl<S: PlanningSolution> Acceptor<S> for LateAcceptanceAcceptor<S> {
    fn is_accepted(&self, candidate: &AcceptContext<'_, S::Score>, _rng: &mut dyn RngCore) -> bool {
        if candidate.move_score >= candidate.last_step_score {
            return true;
        }
        self.late_score()
            .map_or(true, |late| candidate.move_score >= late)
    }

    fn phase_started(&mut self, initial_score: &S::Score) {
        self.score_history = vec![*initial_score; self.late_acceptance_size];
        self.current_index = 0;
    }

    fn phase_ended(&mut self) {
        self.score_history.clear();
    }

    fn step_ended(&mut self, step_score: &S::Score, _signature: Option<&MoveSignature>) {
        if let Some(slot) = self.score_history.get_mut(self.current_index) {
            *slot = *step_score;
        }
        self.current_index = (self.current_index + 1) % self.late_acceptance_size;
    }
}
