//! Hill climbing acceptor.

use rand::RngCore;
use stratum_core::domain::PlanningSolution;

use super::{AcceptContext, Acceptor};

/// Hill climbing acceptor - accepts only non-worsening moves.
///
/// Moves that keep the score equal are accepted so the search can walk
/// across plateaus. The step score therefore never decreases, which makes
/// hill climbing monotonic in every score level's lexicographic order.
///
/// # Example
///
/// ```
/// use stratum_solver::phase::localsearch::HillClimbingAcceptor;
///
/// let acceptor = HillClimbingAcceptor::new();
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl<S: PlanningSolution> Acceptor<S> for HillClimbingAcceptor {
    fn is_accepted(&self, candidate: &AcceptContext<'_, S::Score>, _rng: &mut dyn RngCore) -> bool {
        candidate.move_score >= candidate.last_step_score
    }
}
