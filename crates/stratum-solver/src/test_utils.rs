//! Test utilities for stratum-solver
//!
//! Binds the variables of the `stratum-test` fixtures and builds scopes
//! around their directors.

use std::sync::Arc;

use stratum_config::EnvironmentMode;
use stratum_core::domain::{IndexRange, PlanningSolution};
use stratum_scoring::ScoreDirector;

use crate::heuristic::{BasicVariable, ListVariable};
use crate::scope::SolverScope;

pub use stratum_test::assignment::{self, Timetable};
pub use stratum_test::nqueens::{self, NQueensSolution};
pub use stratum_test::routing::{self, RoutingSolution};

/// The `Queen.row` variable over rows `0..n`.
pub fn queen_row(n: usize) -> Arc<BasicVariable<NQueensSolution, i64>> {
    Arc::new(BasicVariable::new(
        0,
        "row",
        nqueens::queen_count,
        nqueens::get_queen_row,
        nqueens::set_queen_row,
        nqueens::row_range(n),
    ))
}

/// The `Lesson.room` variable over every room.
pub fn lesson_room() -> Arc<BasicVariable<Timetable, usize>> {
    Arc::new(BasicVariable::new(
        0,
        "room",
        assignment::lesson_count,
        assignment::get_lesson_room,
        assignment::set_lesson_room,
        IndexRange::new(assignment::room_count),
    ))
}

/// The `Vehicle.visits` list variable over every visit.
pub fn vehicle_visits() -> Arc<ListVariable<RoutingSolution, usize>> {
    Arc::new(ListVariable::new(
        routing::VEHICLE_DESCRIPTOR,
        "visits",
        routing::vehicle_count,
        routing::route,
        routing::route_mut,
        IndexRange::new(routing::visit_count),
    ))
}

/// Visits at 2, 5, 9 and 14 on a line, two vehicles of capacity 3.
pub fn four_visits() -> RoutingSolution {
    RoutingSolution::on_line(&[2, 5, 9, 14], &[20, 20, 20, 40], &[3, 3])
}

/// A reproducible scope with seed 7.
pub fn seeded_scope<S, D>(director: D) -> SolverScope<'static, S, D>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    SolverScope::new(director)
        .with_seed(7)
        .with_environment_mode(EnvironmentMode::Reproducible)
}
