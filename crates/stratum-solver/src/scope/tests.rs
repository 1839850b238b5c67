use stratum_core::domain::PlanningSolution;
use stratum_core::score::{HardSoftScore, SimpleScore};
use stratum_scoring::ScoreDirector;

use super::*;
use crate::realtime::{ChangeVariable, SolverHandle};
use crate::termination::{StepCountTermination, Termination};
use crate::test_utils::{
    assignment, lesson_room, nqueens, queen_row, seeded_scope, NQueensSolution, Timetable,
};

#[test]
fn test_first_update_always_sets_best() {
    let director = nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    assert!(scope.best_solution().is_none());
    assert!(scope.update_best_solution());
    assert!(scope.best_solution().is_some());
}

#[test]
fn test_initialized_solution_beats_uninitialized() {
    // Two unassigned queens score better than a full but conflicting board.
    let director = nqueens::simple_director(NQueensSolution::with_optional_rows(&[
        Some(0),
        None,
        None,
        None,
    ]))
    .unwrap();
    let mut scope = seeded_scope(director);
    scope.update_best_solution();
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));

    for i in 1..4 {
        nqueens::set_queen_row(scope.score_director_mut().working_solution_mut(), i, Some(0));
    }
    scope.score_director_mut().reset();
    assert!(scope.update_best_solution());
    assert!(scope.best_solution().unwrap().is_initialized());

    // Back to partial: never replaces an initialized best.
    nqueens::set_queen_row(scope.score_director_mut().working_solution_mut(), 3, None);
    scope.score_director_mut().reset();
    assert!(!scope.update_best_solution());
}

#[test]
fn test_worse_score_keeps_best() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[1, 3, 0, 2])).unwrap();
    let mut scope = seeded_scope(director);
    scope.update_best_solution();
    nqueens::set_queen_row(scope.score_director_mut().working_solution_mut(), 0, Some(3));
    scope.score_director_mut().reset();
    assert!(!scope.update_best_solution());
    assert_eq!(scope.best_solution().unwrap().rows(), vec![Some(1), Some(3), Some(0), Some(2)]);
}

#[test]
fn test_best_solution_carries_its_own_score() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[1, 3, 0, 2])).unwrap();
    let mut scope = seeded_scope(director);
    // A stale score left on the working copy by an earlier evaluation.
    scope
        .score_director_mut()
        .working_solution_mut()
        .set_score(Some(SimpleScore::of(-7)));

    assert!(scope.update_best_solution_with(SimpleScore::of(0)));
    let best = scope.best_solution().unwrap();
    assert_eq!(best.score(), Some(SimpleScore::of(0)));
    assert_eq!(best.score(), Some(nqueens::calculate_conflicts(best)));
}

#[test]
fn test_phase_progress_counts_from_phase_start() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 0])).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    scope.start_phase(0, "ConstructionHeuristic");
    scope.record_move(true);
    scope.step_ended(SimpleScore::of(0));
    scope.end_phase();
    scope.start_phase(1, "LocalSearch");
    scope.record_move(false);
    scope.record_move(true);
    scope.step_ended(SimpleScore::of(0));

    let solver = scope.solver_progress();
    let phase = scope.phase_progress();
    assert_eq!((solver.step_count, solver.move_count), (2, 3));
    assert_eq!((phase.step_count, phase.move_count), (1, 2));
    assert_eq!(scope.phase_step_count(), 1);
    assert_eq!(scope.stats().phases.len(), 2);
}

#[test]
fn test_unimproved_steps_reset_on_improvement() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 0, 0, 0])).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    scope.update_best_solution();
    scope.step_ended(SimpleScore::of(0));
    scope.step_ended(SimpleScore::of(0));
    assert_eq!(scope.solver_progress().unimproved_step_count, 2);

    nqueens::set_queen_row(scope.score_director_mut().working_solution_mut(), 1, Some(2));
    scope.score_director_mut().reset();
    assert!(scope.update_best_solution());
    assert_eq!(scope.solver_progress().unimproved_step_count, 0);
}

#[test]
fn test_solver_and_phase_termination() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 0])).unwrap();
    let run_limit = StepCountTermination::new(3);
    let phase_limit = StepCountTermination::new(1);
    let mut scope = seeded_scope(director).with_termination(&run_limit);
    scope.start_solving();
    scope.start_phase(0, "LocalSearch");
    let phase_limit: &dyn Termination<NQueensSolution> = &phase_limit;

    assert!(!scope.is_phase_terminated(Some(phase_limit)));
    scope.step_ended(SimpleScore::of(0));
    assert!(scope.is_phase_terminated(Some(phase_limit)));
    assert!(!scope.is_solver_terminated());

    scope.start_phase(1, "LocalSearch");
    scope.step_ended(SimpleScore::of(0));
    scope.step_ended(SimpleScore::of(0));
    assert!(scope.is_solver_terminated());
    assert!(scope.is_phase_terminated(None));
}

#[test]
fn test_terminate_early_flag_is_shared() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 0])).unwrap();
    let scope = seeded_scope(director);
    let flag = scope.terminate_early_flag();
    assert!(!scope.is_solver_terminated());
    flag.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(scope.is_terminate_early());
    assert!(scope.is_solver_terminated());
}

#[test]
fn test_problem_changes_replace_best_solution() {
    let mut timetable = Timetable::small();
    for lesson in &mut timetable.lessons {
        lesson.room = Some(0);
    }
    let (handle, receiver) = SolverHandle::new();
    let director = assignment::incremental_director(timetable).unwrap();
    let mut scope = seeded_scope(director).with_problem_changes(&receiver);
    scope.start_solving();
    scope.update_best_solution();
    assert_eq!(scope.process_problem_changes(), 0);

    handle.add_problem_change(ChangeVariable::new(lesson_room(), 2, Some(1)));
    assert_eq!(scope.process_problem_changes(), 1);
    let best = scope.best_solution().unwrap();
    assert_eq!(best.lessons[2].room, Some(1));
    assert_eq!(
        scope.best_score().copied(),
        Some(assignment::calculate_score(best))
    );
    assert_eq!(best.score, scope.best_score().copied());
}

#[test]
fn test_rejected_problem_change_is_skipped() {
    let (handle, receiver) = SolverHandle::new();
    let director =
        nqueens::incremental_director(NQueensSolution::with_rows(&[1, 3, 0, 2])).unwrap();
    let mut scope = seeded_scope(director).with_problem_changes(&receiver);
    scope.start_solving();
    scope.update_best_solution();

    handle.add_problem_change(ChangeVariable::new(queen_row(4), 1, Some(99)));
    handle.add_problem_change(ChangeVariable::new(queen_row(4), 7, Some(0)));
    assert_eq!(scope.process_problem_changes(), 0);
    assert_eq!(scope.working_solution().rows(), vec![Some(1), Some(3), Some(0), Some(2)]);
    assert_eq!(scope.score_director_mut().calculate_score(), SimpleScore::of(0));

    // A valid change queued after a rejected one still applies.
    handle.add_problem_change(ChangeVariable::new(queen_row(4), 1, Some(99)));
    handle.add_problem_change(ChangeVariable::new(queen_row(4), 0, Some(0)));
    assert_eq!(scope.process_problem_changes(), 1);
    let best = scope.best_solution().unwrap();
    assert_eq!(best.rows(), vec![Some(0), Some(3), Some(0), Some(2)]);
    assert_eq!(best.score(), Some(nqueens::calculate_conflicts(best)));
}

#[test]
fn test_assert_step_passes_on_consistent_director() {
    let director = assignment::incremental_director(Timetable::small()).unwrap();
    let mut scope = seeded_scope(director)
        .with_environment_mode(stratum_config::EnvironmentMode::FullAssert);
    scope.calculate_score();
    assert!(scope.assert_step().is_ok());
}

#[test]
fn test_into_result_falls_back_to_working_solution() {
    let director = assignment::simple_director(Timetable::small()).unwrap();
    let scope = seeded_scope(director);
    let (solution, stats) = scope.into_result();
    assert_eq!(solution.lessons.len(), 4);
    assert_eq!(stats.step_count, 0);
    let _: Option<HardSoftScore> = solution.score;
}

#[test]
fn test_progress_hides_partial_best_score() {
    let director =
        nqueens::simple_director(NQueensSolution::with_optional_rows(&[Some(0), None])).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    scope.update_best_solution();
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
    assert_eq!(scope.solver_progress().best_score, None);

    nqueens::set_queen_row(scope.score_director_mut().working_solution_mut(), 1, Some(2));
    scope.score_director_mut().reset();
    scope.update_best_solution();
    assert_eq!(scope.solver_progress().best_score, Some(SimpleScore::of(0)));
}
