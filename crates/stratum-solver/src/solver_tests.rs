use std::sync::Arc;

use stratum_config::SelectionOrder;
use stratum_core::score::SimpleScore;
use stratum_core::MoveApplicationError;
use stratum_test::assignment::Lesson;

use super::*;
use crate::event::CountingEventListener;
use crate::heuristic::r#move::ChangeMove;
use crate::heuristic::selector::ChangeMoveSelector;
use crate::phase::construction::{ConstructionHeuristicPhase, ConstructionHeuristicType};
use crate::phase::localsearch::{HillClimbingAcceptor, LocalSearchPhase};
use crate::phase::Phase;
use crate::realtime::{AddEntity, SolverHandle};
use crate::termination::StepCountTermination;
use crate::test_utils::{assignment, lesson_room, nqueens, queen_row, NQueensSolution, Timetable};

type QueenMove = ChangeMove<NQueensSolution, i64>;

fn first_fit(n: usize) -> ConstructionHeuristicPhase<NQueensSolution, i64> {
    ConstructionHeuristicPhase::new(queen_row(n), ConstructionHeuristicType::FirstFit)
}

fn hill_climbing(
    n: usize,
    order: SelectionOrder,
) -> LocalSearchPhase<
    NQueensSolution,
    QueenMove,
    ChangeMoveSelector<NQueensSolution, i64, QueenMove>,
    HillClimbingAcceptor,
> {
    LocalSearchPhase::new(ChangeMoveSelector::new(queen_row(n), order), HillClimbingAcceptor::new())
}

#[derive(Debug)]
struct FailingPhase;

impl<S: PlanningSolution, D: ScoreDirector<S>> Phase<S, D> for FailingPhase {
    fn solve(&mut self, _solver_scope: &mut SolverScope<'_, S, D>) -> Result<(), SolverError> {
        Err(MoveApplicationError::NotDoable("always fails".into()).into())
    }

    fn phase_type_name(&self) -> &'static str {
        "Failing"
    }
}

#[test]
fn test_phases_run_in_order_and_fire_events() {
    let counter = Arc::new(CountingEventListener::new());
    let mut events = SolverEventSupport::new();
    events.add_solver_listener(counter.clone());
    events.add_phase_listener(counter.clone());

    let mut solver = Solver::new((first_fit(8), hill_climbing(8, SelectionOrder::Original)))
        .with_termination(StepCountTermination::new(20))
        .with_events(events);
    let director = nqueens::incremental_director(NQueensSolution::uninitialized(8)).unwrap();
    let solution = solver.solve(director).unwrap();

    assert!(solution.rows().iter().all(Option::is_some));
    assert_eq!(solution.score, Some(nqueens::calculate_conflicts(&solution)));
    assert_eq!(counter.solving_started_count(), 1);
    assert_eq!(counter.solving_ended_count(), 1);
    assert_eq!(counter.phase_started_count(), 2);
    assert_eq!(counter.phase_ended_count(), 2);
    assert!(counter.best_solution_count() >= 1);

    let stats = solver.last_stats().unwrap();
    assert!(stats.step_count <= 20);
    assert_eq!(stats.phases.len(), 2);
    assert_eq!(stats.phases[0].step_count, 8);
    assert!(!solver.is_solving());
}

#[test]
fn test_failing_phase_returns_best_solution() {
    let mut solver = Solver::new((
        first_fit(4),
        FailingPhase,
        hill_climbing(4, SelectionOrder::Original),
    ));
    let director = nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap();
    let failure = solver.solve(director).unwrap_err();

    assert!(matches!(failure.error, SolverError::MoveApplication(_)));
    assert_eq!(
        failure.best_solution.rows(),
        vec![Some(0), Some(2), Some(0), Some(1)]
    );
    assert_eq!(solver.last_stats().unwrap().phases.len(), 2);
}

#[test]
fn test_boxed_phase_list() {
    fn solve<D: ScoreDirector<NQueensSolution> + 'static>(director: D) -> NQueensSolution {
        let phases: Vec<Box<dyn Phase<NQueensSolution, D>>> = vec![Box::new(first_fit(4))];
        Solver::new(phases).solve(director).unwrap()
    }
    let solution = solve(nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap());
    assert_eq!(solution.rows(), vec![Some(0), Some(2), Some(0), Some(1)]);
}

#[test]
fn test_same_seed_same_result() {
    let run = || {
        let mut solver = Solver::new((hill_climbing(8, SelectionOrder::Random),))
            .with_termination(StepCountTermination::new(10))
            .with_random_seed(42);
        let director = nqueens::incremental_director(NQueensSolution::with_rows(&[0; 8])).unwrap();
        solver.solve(director).unwrap().rows()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_problem_changes_before_first_phase() {
    let (handle, receiver) = SolverHandle::new();
    handle.add_problem_change(AddEntity::new(
        0,
        Lesson::new(4, "Noether", 12, 1),
        |t: &mut Timetable| &mut t.lessons,
    ));
    let construction =
        ConstructionHeuristicPhase::new(lesson_room(), ConstructionHeuristicType::FirstFit);
    let mut solver = Solver::new((construction,)).with_problem_changes(receiver);
    let director = assignment::incremental_director(Timetable::small()).unwrap();
    let solution = solver.solve(director).unwrap();

    assert_eq!(solution.lessons.len(), 5);
    assert!(solution.lessons.iter().all(|l| l.room.is_some()));
    assert_eq!(solution.score, Some(assignment::calculate_score(&solution)));
    assert!(!handle.is_solving());
}

#[test]
fn test_terminate_early_before_solving_skips_phases() {
    let (handle, receiver) = SolverHandle::<NQueensSolution>::new();
    let mut solver = Solver::new((first_fit(4),)).with_problem_changes(receiver);
    handle.terminate_early();

    let director = nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap();
    let solution = solver.solve(director).unwrap();
    assert_eq!(solution.rows(), vec![None; 4]);
    assert_eq!(solver.last_stats().unwrap().step_count, 0);

    // The request is consumed by the run it stopped.
    assert!(!handle.is_terminate_early_requested());
    let director = nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap();
    let solution = solver.solve(director).unwrap();
    assert!(solution.rows().iter().all(Option::is_some));
    assert_eq!(solution.score, Some(SimpleScore::of(-2)));
}
