use std::sync::{Arc, Mutex};

use stratum_config::{EnvironmentMode, SelectionOrder};
use stratum_core::score::{HardSoftScore, SimpleScore};
use stratum_scoring::ScoreDirector;

use super::*;
use crate::event::{SolverEventSupport, StepLifecycleListener};
use crate::heuristic::r#move::{BasicMove, ChangeMove, ListMove};
use crate::heuristic::selector::{
    ChangeMoveSelector, ListChangeMoveSelector, ListReverseMoveSelector, SwapMoveSelector,
    UnionMoveSelector,
};
use crate::phase::Phase;
use crate::realtime::{AddEntity, SolverHandle};
use crate::termination::StepCountTermination;
use crate::test_utils::{
    assignment, four_visits, lesson_room, nqueens, queen_row, routing, seeded_scope,
    vehicle_visits, NQueensSolution, RoutingSolution, Timetable,
};
use stratum_test::assignment::Lesson;

type QueenMove = ChangeMove<NQueensSolution, i64>;

#[derive(Debug, Default)]
struct StepScores(Mutex<Vec<SimpleScore>>);

impl StepLifecycleListener<NQueensSolution> for StepScores {
    fn on_step_started(&self, _step_index: u64) {}

    fn on_step_ended(&self, _step_index: u64, score: &SimpleScore) {
        if let Ok(mut scores) = self.0.lock() {
            scores.push(*score);
        }
    }
}

fn queen_phase(
    n: usize,
    steps: u64,
) -> LocalSearchPhase<
    NQueensSolution,
    QueenMove,
    ChangeMoveSelector<NQueensSolution, i64, QueenMove>,
    HillClimbingAcceptor,
> {
    LocalSearchPhase::new(
        ChangeMoveSelector::new(queen_row(n), SelectionOrder::Original),
        HillClimbingAcceptor::new(),
    )
    .with_termination(StepCountTermination::new(steps))
}

fn timetable(rooms: &[usize]) -> Timetable {
    let mut timetable = Timetable::small();
    for (lesson, &room) in timetable.lessons.iter_mut().zip(rooms) {
        lesson.room = Some(room);
    }
    timetable
}

#[test]
fn test_hill_climbing_never_worsens_a_step() {
    let scores = Arc::new(StepScores::default());
    let mut events = SolverEventSupport::<NQueensSolution>::new();
    events.add_step_listener(scores.clone());

    let director = nqueens::incremental_director(NQueensSolution::with_rows(&[0; 8])).unwrap();
    let mut scope = seeded_scope(director).with_events(&events);
    scope.start_solving();
    let initial = scope.calculate_score();
    queen_phase(8, 15).solve(&mut scope).unwrap();

    let steps = scores.0.lock().unwrap().clone();
    assert!(!steps.is_empty());
    assert!(steps[0] >= initial);
    assert!(steps.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(scope.best_score(), steps.last());
}

#[test]
fn test_first_accepted_move_with_count_limit_one() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 0, 0, 0])).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    let mut phase = queen_phase(4, 1).with_forager(AcceptedCountForager::new(1));
    phase.solve(&mut scope).unwrap();

    // Queen 0 to row 1 is the first move in selector order and improves -6 to -4.
    assert_eq!(scope.move_count(), 1);
    assert_eq!(
        scope.best_solution().unwrap().rows(),
        vec![Some(1), Some(0), Some(0), Some(0)]
    );
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(-4)));
}

#[test]
fn test_hill_climbing_repairs_room_conflict() {
    let director = assignment::incremental_director(timetable(&[0, 0, 1, 0])).unwrap();
    let mut scope = seeded_scope(director).with_environment_mode(EnvironmentMode::FullAssert);
    scope.start_solving();
    let selector: UnionMoveSelector<Timetable, BasicMove<Timetable, usize>> =
        UnionMoveSelector::new(Vec::new())
            .with(ChangeMoveSelector::new(lesson_room(), SelectionOrder::Original))
            .with(SwapMoveSelector::new(lesson_room(), SelectionOrder::Original));
    let mut phase = LocalSearchPhase::new(selector, HillClimbingAcceptor::new())
        .with_termination(StepCountTermination::new(5));
    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.best_score(), Some(&HardSoftScore::of(0, -2)));
    let best = scope.best_solution().unwrap();
    assert_eq!(assignment::calculate_score(best), HardSoftScore::of(0, -2));
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    let run = |threads: usize| {
        let director =
            nqueens::incremental_director(NQueensSolution::with_rows(&[0; 8])).unwrap();
        let mut scope = seeded_scope(director);
        scope.start_solving();
        let mut phase = queen_phase(8, 10).with_move_thread_count(threads);
        phase.solve(&mut scope).unwrap();
        let moves = scope.move_count();
        let score = scope.best_score().copied();
        (scope.take_best_or_working_solution().rows(), score, moves)
    };

    let sequential = run(1);
    let parallel = run(4);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_parallel_forks_follow_the_working_solution() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0; 6])).unwrap();
    let mut scope = seeded_scope(director).with_environment_mode(EnvironmentMode::FullAssert);
    scope.start_solving();
    let mut phase = queen_phase(6, 8).with_move_thread_count(3);
    phase.solve(&mut scope).unwrap();
    let best = scope.best_solution().unwrap();
    assert_eq!(scope.best_score().copied(), Some(nqueens::calculate_conflicts(best)));
}

#[test]
fn test_tabu_search_keeps_stepping() {
    let director = nqueens::incremental_director(NQueensSolution::with_rows(&[0; 8])).unwrap();
    let mut scope = seeded_scope(director).with_environment_mode(EnvironmentMode::FullAssert);
    scope.start_solving();
    let initial = scope.calculate_score();
    let mut phase = LocalSearchPhase::<_, QueenMove, _, _>::new(
        ChangeMoveSelector::new(queen_row(8), SelectionOrder::Random),
        TabuSearchAcceptor::new(2, 4),
    )
    .with_termination(StepCountTermination::new(20));
    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.step_count(), 20);
    assert!(*scope.best_score().unwrap() >= initial);
}

#[test]
fn test_empty_neighborhood_ends_phase() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0])).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    queen_phase(1, 10).solve(&mut scope).unwrap();
    assert_eq!(scope.step_count(), 0);
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
}

#[test]
fn test_problem_changes_apply_between_steps() {
    let (handle, receiver) = SolverHandle::new();
    handle.add_problem_change(AddEntity::new(
        0,
        Lesson::new(4, "Curie", 10, 2).in_room(0),
        |t: &mut Timetable| &mut t.lessons,
    ));
    let director = assignment::incremental_director(timetable(&[0, 1, 1, 0])).unwrap();
    let mut scope = seeded_scope(director).with_problem_changes(&receiver);
    scope.start_solving();
    let mut phase = LocalSearchPhase::<_, ChangeMove<_, _>, _, _>::new(
        ChangeMoveSelector::new(lesson_room(), SelectionOrder::Original),
        HillClimbingAcceptor::new(),
    )
    .with_termination(StepCountTermination::new(3));
    phase.solve(&mut scope).unwrap();

    let best = scope.best_solution().unwrap();
    assert_eq!(best.lessons.len(), 5);
    assert_eq!(scope.best_score().copied(), Some(assignment::calculate_score(best)));
}

#[test]
fn test_list_moves_under_full_assert() {
    type RouteMove = ListMove<RoutingSolution, usize>;
    let director =
        routing::incremental_director(four_visits().with_routes(&[&[3, 2, 1, 0], &[]])).unwrap();
    let mut scope = seeded_scope(director).with_environment_mode(EnvironmentMode::FullAssert);
    scope.score_director_mut().trigger_variable_listeners();
    scope.start_solving();
    let initial = scope.calculate_score();
    let selector: UnionMoveSelector<RoutingSolution, RouteMove> = UnionMoveSelector::new(Vec::new())
        .with(ListChangeMoveSelector::new(vehicle_visits(), SelectionOrder::Random))
        .with(ListReverseMoveSelector::new(vehicle_visits(), SelectionOrder::Random));
    let mut phase = LocalSearchPhase::new(selector, LateAcceptanceAcceptor::new(5))
        .with_forager(AcceptedCountForager::new(4))
        .with_termination(StepCountTermination::new(25));
    phase.solve(&mut scope).unwrap();

    let best = scope.best_solution().unwrap();
    assert!(*scope.best_score().unwrap() >= initial);
    assert_eq!(scope.best_score().copied(), Some(routing::calculate_score(best)));
}

#[test]
fn test_acceptor_from_config() {
    use stratum_config::{AcceptorConfig, LateAcceptanceConfig};
    let hill: Box<dyn Acceptor<NQueensSolution>> = acceptor_from_config(None);
    assert!(!hill.needs_signatures());
    let tabu: Box<dyn Acceptor<NQueensSolution>> =
        acceptor_from_config(Some(&AcceptorConfig::TabuSearch(Default::default())));
    assert!(tabu.needs_signatures());
    let late: Box<dyn Acceptor<NQueensSolution>> =
        acceptor_from_config(Some(&AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
            late_acceptance_size: Some(3),
        })));
    assert!(format!("{:?}", late).contains("late_acceptance_size: 3"));
}
