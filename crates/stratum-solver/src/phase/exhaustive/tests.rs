use stratum_config::EnvironmentMode;
use stratum_core::domain::PlanningSolution;
use stratum_core::score::{HardSoftScore, SimpleScore};
use stratum_scoring::ScoreDirector;

use super::*;
use crate::test_utils::{
    assignment, lesson_room, nqueens, queen_row, seeded_scope, NQueensSolution, Timetable,
};

fn solve_queens(
    phase: &mut ExhaustiveSearchPhase<NQueensSolution, i64>,
) -> (Vec<Option<i64>>, u64) {
    let director = nqueens::incremental_director(NQueensSolution::uninitialized(4)).unwrap();
    let mut scope = seeded_scope(director).with_environment_mode(EnvironmentMode::FullAssert);
    scope.start_solving();
    phase.solve(&mut scope).unwrap();
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
    let best = scope.best_solution().unwrap();
    assert_eq!(best.score(), Some(nqueens::calculate_conflicts(best)));
    assert_eq!(scope.working_solution().rows(), best.rows());
    (scope.working_solution().rows(), scope.step_count())
}

#[test]
fn test_branch_and_bound_finds_first_optimum() {
    let (rows, steps) = solve_queens(&mut ExhaustiveSearchPhase::new(queen_row(4)));
    assert_eq!(rows, vec![Some(1), Some(3), Some(0), Some(2)]);
    assert!(steps < 341);
}

#[test]
fn test_brute_force_visits_every_node() {
    let mut phase = ExhaustiveSearchPhase::new(queen_row(4))
        .with_search_type(ExhaustiveSearchType::BruteForce);
    let (rows, steps) = solve_queens(&mut phase);
    assert_eq!(rows, vec![Some(1), Some(3), Some(0), Some(2)]);
    // 1 + 4 + 16 + 64 + 256 nodes.
    assert_eq!(steps, 341);
}

#[test]
fn test_score_first_reaches_an_optimum() {
    let mut phase = ExhaustiveSearchPhase::new(queen_row(4))
        .with_exploration_type(ExplorationType::ScoreFirst);
    let (rows, _) = solve_queens(&mut phase);
    assert_eq!(
        nqueens::calculate_conflicts(&NQueensSolution::with_optional_rows(&rows)),
        SimpleScore::of(0)
    );
}

#[test]
fn test_timetable_optimum_is_unique() {
    let director = assignment::incremental_director(Timetable::small()).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    ExhaustiveSearchPhase::new(lesson_room()).solve(&mut scope).unwrap();

    let best = scope.best_solution().unwrap();
    let rooms: Vec<Option<usize>> = best.lessons.iter().map(|l| l.room).collect();
    assert_eq!(rooms, vec![Some(0), Some(1), Some(1), Some(0)]);
    assert_eq!(scope.best_score(), Some(&HardSoftScore::of(0, -2)));
    assert_eq!(assignment::calculate_score(best), HardSoftScore::of(0, -2));
    assert_eq!(best.score, Some(HardSoftScore::of(0, -2)));
}

#[test]
fn test_too_many_entities_skips_the_phase() {
    let director = nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    ExhaustiveSearchPhase::new(queen_row(4))
        .with_entity_limit(2)
        .solve(&mut scope)
        .unwrap();
    assert_eq!(scope.step_count(), 0);
    assert!(scope.best_solution().is_none());
    assert_eq!(scope.working_solution().rows(), vec![None; 4]);
}

#[test]
fn test_node_limit_without_leaf_restores_start() {
    let director = nqueens::incremental_director(NQueensSolution::uninitialized(4)).unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    ExhaustiveSearchPhase::new(queen_row(4))
        .with_node_limit(Some(3))
        .solve(&mut scope)
        .unwrap();
    assert_eq!(scope.step_count(), 3);
    assert!(scope.best_solution().is_none());
    assert_eq!(scope.working_solution().rows(), vec![None; 4]);
    assert_eq!(scope.score_director_mut().calculate_score(), SimpleScore::of(0));
}

#[test]
fn test_only_unassigned_entities_are_searched() {
    let director = nqueens::incremental_director(NQueensSolution::with_optional_rows(&[
        Some(1),
        None,
        Some(0),
        None,
    ]))
    .unwrap();
    let mut scope = seeded_scope(director);
    scope.start_solving();
    ExhaustiveSearchPhase::new(queen_row(4)).solve(&mut scope).unwrap();
    assert_eq!(
        scope.best_solution().unwrap().rows(),
        vec![Some(1), Some(3), Some(0), Some(2)]
    );
}
