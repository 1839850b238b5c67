//! Move application and undo against the fixture directors.

use stratum_core::{HardSoftScore, MoveApplicationError, Score, SimpleScore};
use stratum_scoring::{RecordingScoreDirector, ScoreDirector};

use super::*;
use crate::test_utils::{
    assignment, four_visits, lesson_room, nqueens, queen_row, routing, vehicle_visits,
    NQueensSolution, RoutingSolution, Timetable,
};

fn routing_state(s: &RoutingSolution) -> (Vec<routing::Vehicle>, Vec<routing::Visit>) {
    (s.vehicles.clone(), s.visits.clone())
}

// Applies `m` through a recording director, checks the incremental score
// against a full recalculation, then undoes and checks the state is back.
fn apply_and_undo_routing<M: Move<RoutingSolution>>(routes: &[&[usize]], m: M) -> Vec<Vec<usize>> {
    let mut director = routing::incremental_director(four_visits().with_routes(routes)).unwrap();
    let before = routing_state(director.working_solution());
    let score_before = director.calculate_score();

    let mut recording = RecordingScoreDirector::new(&mut director);
    assert!(m.is_doable(&recording));
    m.do_move(&mut recording).unwrap();
    let moved_score = recording.calculate_score();
    let moved: Vec<Vec<usize>> = recording
        .working_solution()
        .vehicles
        .iter()
        .map(|v| v.visits.clone())
        .collect();
    assert_eq!(moved_score, routing::calculate_score(recording.working_solution()));

    recording.undo_changes();
    assert_eq!(recording.calculate_score(), score_before);
    assert_eq!(routing_state(recording.working_solution()), before);
    moved
}

#[test]
fn test_change_move_apply_and_undo() {
    let mut director =
        nqueens::incremental_director(NQueensSolution::with_rows(&[0, 1, 2, 3])).unwrap();
    assert_eq!(director.calculate_score(), SimpleScore::of(-6));

    let m = ChangeMove::new(queen_row(4), 1, Some(3));
    let mut recording = RecordingScoreDirector::new(&mut director);
    assert!(m.is_doable(&recording));
    m.do_move(&mut recording).unwrap();
    assert_eq!(
        recording.calculate_score(),
        nqueens::calculate_conflicts(recording.working_solution())
    );

    recording.undo_changes();
    assert_eq!(
        recording.working_solution().rows(),
        NQueensSolution::with_rows(&[0, 1, 2, 3]).rows()
    );
    assert_eq!(recording.calculate_score(), SimpleScore::of(-6));
}

#[test]
fn test_change_move_to_current_value_is_not_doable() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 1])).unwrap();
    assert!(!ChangeMove::new(queen_row(2), 0, Some(0)).is_doable(&director));
    assert!(ChangeMove::new(queen_row(2), 0, Some(1)).is_doable(&director));
}

#[test]
fn test_change_move_out_of_range_is_rejected_before_mutation() {
    let mut director =
        nqueens::incremental_director(NQueensSolution::with_rows(&[0, 1, 2, 3])).unwrap();
    let mut recording = RecordingScoreDirector::new(&mut director);

    let err = ChangeMove::new(queen_row(4), 2, Some(9))
        .do_move(&mut recording)
        .unwrap_err();
    assert_eq!(
        err,
        MoveApplicationError::ValueOutOfRange {
            variable: "row",
            entity_index: 2,
            value: "Some(9)".to_string(),
        }
    );
    assert!(recording.is_empty());
    assert_eq!(recording.working_solution().queens[2].row, Some(2));

    let err = ChangeMove::new(queen_row(4), 2, None)
        .do_move(&mut recording)
        .unwrap_err();
    assert!(matches!(err, MoveApplicationError::ValueOutOfRange { .. }));
}

#[test]
fn test_change_move_unassign_when_allowed() {
    let var = std::sync::Arc::new(
        std::sync::Arc::try_unwrap(queen_row(2))
            .unwrap()
            .with_allows_unassigned(true),
    );
    let mut director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 0])).unwrap();
    ChangeMove::new(var, 1, None).do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().queens[1].row, None);
    assert_eq!(director.calculate_score(), SimpleScore::zero());
}

#[test]
fn test_change_move_entity_checks() {
    let mut director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 1])).unwrap();
    let err = ChangeMove::new(queen_row(2), 5, Some(0))
        .do_move(&mut director)
        .unwrap_err();
    assert_eq!(
        err,
        MoveApplicationError::EntityOutOfBounds {
            entity_index: 5,
            entity_count: 2
        }
    );

    let pinned = std::sync::Arc::new(
        std::sync::Arc::try_unwrap(queen_row(2))
            .unwrap()
            .with_pinned(|_, i| i == 0),
    );
    let m = ChangeMove::new(pinned, 0, Some(1));
    assert!(!m.is_doable(&director));
    assert_eq!(
        m.do_move(&mut director).unwrap_err(),
        MoveApplicationError::Pinned { entity_index: 0 }
    );
}

#[test]
fn test_swap_move_apply_and_undo() {
    let timetable = Timetable::small();
    let lessons = timetable.lessons.clone();
    let timetable = Timetable::new(
        timetable.rooms,
        lessons
            .into_iter()
            .enumerate()
            .map(|(i, l)| l.in_room(i % 2))
            .collect(),
    );
    let mut director = assignment::incremental_director(timetable).unwrap();
    let before = director.calculate_score();

    let m = SwapMove::new(lesson_room(), 0, 1);
    let mut recording = RecordingScoreDirector::new(&mut director);
    assert!(m.is_doable(&recording));
    m.do_move(&mut recording).unwrap();
    assert_eq!(recording.working_solution().lessons[0].room, Some(1));
    assert_eq!(recording.working_solution().lessons[1].room, Some(0));
    assert_eq!(
        recording.calculate_score(),
        assignment::calculate_score(recording.working_solution())
    );

    recording.undo_changes();
    assert_eq!(recording.working_solution().lessons[0].room, Some(0));
    assert_eq!(recording.calculate_score(), before);
}

#[test]
fn test_swap_of_equal_values_is_not_doable() {
    let timetable = Timetable::new(
        Timetable::small().rooms,
        Timetable::small().lessons.into_iter().map(|l| l.in_room(0)).collect(),
    );
    let director = assignment::simple_director(timetable).unwrap();
    assert!(!SwapMove::new(lesson_room(), 0, 1).is_doable(&director));
    assert!(!SwapMove::new(lesson_room(), 2, 2).is_doable(&director));
}

#[test]
fn test_list_change_across_vehicles() {
    let moved = apply_and_undo_routing(
        &[&[0, 1], &[2, 3]],
        ListChangeMove::new(vehicle_visits(), 0, 1, 1, 0),
    );
    assert_eq!(moved, vec![vec![0], vec![1, 2, 3]]);
}

#[test]
fn test_list_change_within_one_list_uses_post_removal_index() {
    let moved = apply_and_undo_routing(
        &[&[0, 1, 2], &[3]],
        ListChangeMove::new(vehicle_visits(), 0, 0, 0, 2),
    );
    assert_eq!(moved, vec![vec![1, 2, 0], vec![3]]);
}

#[test]
fn test_list_change_updates_shadows() {
    let mut director =
        routing::incremental_director(four_visits().with_routes(&[&[0, 1], &[2, 3]])).unwrap();
    ListChangeMove::new(vehicle_visits(), 1, 0, 0, 2)
        .do_move(&mut director)
        .unwrap();
    let s = director.working_solution();
    assert_eq!(s.visits[2].vehicle, Some(0));
    assert_eq!(s.visits[2].arrival_time, Some(11));
    assert_eq!(s.visits[3].arrival_time, Some(14));
    assert_eq!(director.calculate_score(), routing::calculate_score(director.working_solution()));
}

#[test]
fn test_list_change_stale_index() {
    let mut director =
        routing::incremental_director(four_visits().with_routes(&[&[0, 1], &[2, 3]])).unwrap();
    let var = vehicle_visits();

    let m = ListChangeMove::new(var.clone(), 0, 5, 1, 0);
    assert!(!m.is_doable(&director));
    assert_eq!(
        m.do_move(&mut director).unwrap_err(),
        MoveApplicationError::StaleIndex {
            entity_index: 0,
            index: 5,
            len: 2
        }
    );

    // Inside one list the last valid destination is len - 1.
    let m = ListChangeMove::new(var, 0, 0, 0, 2);
    assert!(matches!(
        m.do_move(&mut director).unwrap_err(),
        MoveApplicationError::StaleIndex { .. }
    ));
    assert_eq!(director.working_solution().vehicles[0].visits, vec![0, 1]);
}

#[test]
fn test_list_swap_across_and_within() {
    let moved = apply_and_undo_routing(
        &[&[0, 1], &[2, 3]],
        ListSwapMove::new(vehicle_visits(), 0, 0, 1, 1),
    );
    assert_eq!(moved, vec![vec![3, 1], vec![2, 0]]);

    let moved = apply_and_undo_routing(
        &[&[0, 1, 2], &[3]],
        ListSwapMove::new(vehicle_visits(), 0, 0, 0, 2),
    );
    assert_eq!(moved, vec![vec![2, 1, 0], vec![3]]);
}

#[test]
fn test_list_reverse() {
    let moved = apply_and_undo_routing(
        &[&[0, 1, 2, 3], &[]],
        ListReverseMove::new(vehicle_visits(), 0, 1, 4),
    );
    assert_eq!(moved, vec![vec![0, 3, 2, 1], vec![]]);

    let director =
        routing::simple_director(four_visits().with_routes(&[&[0, 1, 2, 3], &[]])).unwrap();
    assert!(!ListReverseMove::new(vehicle_visits(), 0, 2, 3).is_doable(&director));
    assert!(!ListReverseMove::new(vehicle_visits(), 0, 2, 5).is_doable(&director));
}

#[test]
fn test_sublist_change() {
    let moved = apply_and_undo_routing(
        &[&[0, 1, 2], &[3]],
        SubListChangeMove::new(vehicle_visits(), 0, 1, 3, 1, 1),
    );
    assert_eq!(moved, vec![vec![0], vec![3, 1, 2]]);

    let moved = apply_and_undo_routing(
        &[&[0, 1, 2, 3], &[]],
        SubListChangeMove::new(vehicle_visits(), 0, 0, 2, 0, 2),
    );
    assert_eq!(moved, vec![vec![2, 3, 0, 1], vec![]]);
}

#[test]
fn test_list_assign() {
    let mut director =
        routing::incremental_director(four_visits().with_routes(&[&[0], &[2]])).unwrap();
    let var = vehicle_visits();
    assert_eq!(var.unassigned_elements(director.working_solution()), vec![1, 3]);

    let already_assigned = ListAssignMove::new(var.clone(), 2, 0, 0);
    assert!(!already_assigned.is_doable(&director));

    let m = ListAssignMove::new(var.clone(), 1, 0, 1);
    let mut recording = RecordingScoreDirector::new(&mut director);
    m.do_move(&mut recording).unwrap();
    assert_eq!(recording.working_solution().vehicles[0].visits, vec![0, 1]);
    assert_eq!(recording.working_solution().visits[1].vehicle, Some(0));
    recording.undo_changes();
    assert_eq!(recording.working_solution().visits[1].vehicle, None);
    assert_eq!(recording.working_solution().visits[1].arrival_time, None);

    let out_of_range = ListAssignMove::new(var, 9, 0, 0);
    assert!(matches!(
        out_of_range.do_move(&mut director).unwrap_err(),
        MoveApplicationError::ValueOutOfRange { .. }
    ));
}

#[test]
fn test_signature_recognises_reverting_move() {
    let mut director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 1, 2])).unwrap();
    let forward = ChangeMove::new(queen_row(3), 1, Some(2));
    let forward_sig = forward.signature(&director);
    forward.do_move(&mut director).unwrap();

    let back = ChangeMove::new(queen_row(3), 1, Some(1));
    assert!(back.signature(&director).reverses(&forward_sig));
    let elsewhere = ChangeMove::new(queen_row(3), 1, Some(0));
    assert!(!elsewhere.signature(&director).reverses(&forward_sig));
}

#[test]
fn test_list_signature_recognises_reverting_move() {
    let mut director =
        routing::simple_director(four_visits().with_routes(&[&[0, 1], &[2, 3]])).unwrap();
    let forward = ListChangeMove::new(vehicle_visits(), 0, 1, 1, 0);
    let sig = forward.signature(&director);
    forward.do_move(&mut director).unwrap();
    let back = ListChangeMove::new(vehicle_visits(), 1, 0, 0, 1);
    assert!(back.signature(&director).reverses(&sig));
}

#[test]
fn test_move_unions_dispatch() {
    let mut director = assignment::simple_director(Timetable::small()).unwrap();
    let m: BasicMove<Timetable, usize> = ChangeMove::new(lesson_room(), 0, Some(1)).into();
    assert_eq!(m.entity_indices(), &[0]);
    assert_eq!(m.variable_name(), "room");
    m.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().lessons[0].room, Some(1));
    assert!(director.calculate_score() <= HardSoftScore::zero());

    let list: ListMove<RoutingSolution, usize> =
        ListReverseMove::new(vehicle_visits(), 0, 0, 2).into();
    assert_eq!(list.descriptor_index(), routing::VEHICLE_DESCRIPTOR);
    assert!(format!("{:?}", list).contains("ListReverseMove"));
}
