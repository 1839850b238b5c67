//! Simulated annealing acceptor.

use rand::{Rng, RngCore};
use stratum_core::domain::PlanningSolution;
use stratum_core::score::Score;

use super::{AcceptContext, Acceptor};
use crate::heuristic::r#move::MoveSignature;

/// Simulated annealing acceptor - accepts worsening moves with a
/// temperature-based probability.
///
/// A worsening move is accepted with probability `exp(-diff / T)`, where
/// `diff` is the loss at the most significant score level on which the move
/// and the last step differ. The temperature starts at
/// `starting_temperature` and is multiplied by `cooling_rate` after every
/// step.
///
/// # Example
///
/// ```
/// use stratum_solver::phase::localsearch::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(2.0, 0.99);
/// assert_eq!(acceptor.temperature(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    current_temperature: f64,
    cooling_rate: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(starting_temperature: f64, cooling_rate: f64) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature,
            cooling_rate,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current_temperature
    }

    /// Probability of accepting a move that loses `diff` at its most
    /// significant differing level.
    pub fn acceptance_probability(&self, diff: i64) -> f64 {
        if diff <= 0 {
            return 1.0;
        }
        if self.current_temperature <= 0.0 {
            return 0.0;
        }
        (-(diff as f64) / self.current_temperature).exp()
    }
}

impl Default for SimulatedAnnealingAcceptor {
    fn default() -> Self {
        Self::new(1.0, 0.999)
    }
}

// Loss of `worse` against `better` at the first level where they differ.
fn leading_loss<Sc: Score>(better: &Sc, worse: &Sc) -> i64 {
    better
        .to_level_numbers()
        .into_iter()
        .zip(worse.to_level_numbers())
        .map(|(b, w)| b.saturating_sub(w))
        .find(|d| *d != 0)
        .unwrap_or(0)
}

impl<S: PlanningSolution> Acceptor<S> for SimulatedAnnealingAcceptor {
    fn is_accepted(&self, candidate: &AcceptContext<'_, S::Score>, rng: &mut dyn RngCore) -> bool {
        if candidate.move_score >= candidate.last_step_score {
            return true;
        }
        let diff = leading_loss(candidate.last_step_score, candidate.move_score);
        let probability = self.acceptance_probability(diff);
        probability > 0.0 && rng.random::<f64>() < probability
    }

    fn phase_started(&mut self, _initial_score: &S::Score) {
        self.current_temperature = self.starting_temperature;
    }

    fn step_ended(&mut self, _step_score: &S::Score, _signature: Option<&MoveSignature>) {
        self.current_temperature *= self.cooling_rate;
    }
}
