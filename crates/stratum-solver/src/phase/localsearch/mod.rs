//! Local search phase
//!
//! Improves an existing solution by iteratively applying moves
//! that are accepted according to an acceptance criterion.

mod acceptor;
mod forager;
mod phase;

#[cfg(test)]
mod tests;

pub use acceptor::{
    AcceptContext, Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor,
    SimulatedAnnealingAcceptor, TabuSearchAcceptor,
};
pub use forager::AcceptedCountForager;
pub use phase::LocalSearchPhase;

use stratum_config::AcceptorConfig;
use stratum_core::domain::PlanningSolution;

/// Builds the acceptor a config describes; `None` means hill climbing.
pub fn acceptor_from_config<S: PlanningSolution>(
    config: Option<&AcceptorConfig>,
) -> Box<dyn Acceptor<S>> {
    match config {
        None | Some(AcceptorConfig::HillClimbing) => Box::new(HillClimbingAcceptor::new()),
        Some(AcceptorConfig::SimulatedAnnealing(c)) => Box::new(SimulatedAnnealingAcceptor::new(
            c.starting_temperature(),
            c.cooling_rate(),
        )),
        Some(AcceptorConfig::TabuSearch(c)) => Box::new(
            TabuSearchAcceptor::new(
                c.entity_tabu_size.unwrap_or(0),
                c.move_tabu_size.unwrap_or(0),
            )
            .with_aspiration(c.aspiration.unwrap_or(true)),
        ),
        Some(AcceptorConfig::LateAcceptance(c)) => Box::new(LateAcceptanceAcceptor::<S>::new(
            c.late_acceptance_size.unwrap_or(400),
        )),
    }
}
