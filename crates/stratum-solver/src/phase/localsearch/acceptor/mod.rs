//! Acceptors for local search move acceptance.
//!
//! Acceptors decide whether a move's resulting score is admissible given
//! the last step's score, the best score and, for tabu search, what the
//! move changes.

mod hill_climbing;
mod late_acceptance;
mod simulated_annealing;
mod tabu_search;

use std::fmt::Debug;

use rand::RngCore;
use stratum_core::domain::PlanningSolution;

use crate::heuristic::r#move::MoveSignature;

pub use hill_climbing::HillClimbingAcceptor;
pub use late_acceptance::LateAcceptanceAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;
pub use tabu_search::TabuSearchAcceptor;

/// One evaluated move as seen by an acceptor.
#[derive(Debug, Clone, Copy)]
pub struct AcceptContext<'a, Sc> {
    pub last_step_score: &'a Sc,
    pub best_score: &'a Sc,
    pub move_score: &'a Sc,
    /// Present when the acceptor asked for signatures.
    pub signature: Option<&'a MoveSignature>,
}

/// Trait for accepting or rejecting moves in local search.
///
/// Acceptors implement different strategies for escaping local optima,
/// such as hill climbing, simulated annealing, or tabu search.
pub trait Acceptor<S: PlanningSolution>: Send + Debug {
    /// Returns true if the evaluated move may become the step's move.
    fn is_accepted(&self, candidate: &AcceptContext<'_, S::Score>, rng: &mut dyn RngCore) -> bool;

    /// True if [`AcceptContext::signature`] must be filled in.
    fn needs_signatures(&self) -> bool {
        false
    }

    /// Called when a phase starts, and again after problem changes.
    fn phase_started(&mut self, _initial_score: &S::Score) {}

    /// Called when a phase ends.
    fn phase_ended(&mut self) {}

    /// Called when a step ends with the picked move applied.
    fn step_ended(&mut self, _step_score: &S::Score, _signature: Option<&MoveSignature>) {}
}

impl<S: PlanningSolution> Acceptor<S> for Box<dyn Acceptor<S>> {
    fn is_accepted(&self, candidate: &AcceptContext<'_, S::Score>, rng: &mut dyn RngCore) -> bool {
        (**self).is_accepted(candidate, rng)
    }

    fn needs_signatures(&self) -> bool {
        (**self).needs_signatures()
    }

    fn phase_started(&mut self, initial_score: &S::Score) {
        (**self).phase_started(initial_score)
    }

    fn phase_ended(&mut self) {
        (**self).phase_ended()
    }

    fn step_ended(&mut self, step_score: &S::Score, signature: Option<&MoveSignature>) {
        (**self).step_ended(step_score, signature)
    }
}
