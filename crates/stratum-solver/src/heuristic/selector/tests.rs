use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stratum_scoring::ScoreDirector;

use super::*;
use crate::heuristic::r#move::{BasicMove, ChangeMove, ListMove, Move, MoveArena, SwapMove};
use crate::heuristic::BasicVariable;
use crate::test_utils::{
    assignment, four_visits, lesson_room, nqueens, queen_row, routing, vehicle_visits,
    NQueensSolution, Timetable,
};

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn rooms(rooms: &[usize]) -> Timetable {
    let small = Timetable::small();
    Timetable::new(
        small.rooms,
        small
            .lessons
            .into_iter()
            .zip(rooms)
            .map(|(l, &r)| l.in_room(r))
            .collect(),
    )
}

type RouteMove = ListMove<routing::RoutingSolution, usize>;

fn list_moves(
    routes: &[&[usize]],
    selector: &mut dyn MoveSelector<routing::RoutingSolution, RouteMove>,
) -> usize {
    let director = routing::simple_director(four_visits().with_routes(routes)).unwrap();
    let mut arena = MoveArena::new();
    selector.fill(&director, &mut rng(), &mut arena);
    assert!(arena.iter().all(|(_, m)| m.is_doable(&director)));
    arena.len()
}

#[test]
fn test_change_selector_original_order() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 1, 2, 3])).unwrap();
    let mut selector: ChangeMoveSelector<_, _, ChangeMove<_, _>> =
        ChangeMoveSelector::new(queen_row(4), SelectionOrder::Original);
    let mut arena = MoveArena::new();
    selector.fill(&director, &mut rng(), &mut arena);

    assert_eq!(arena.len(), 12);
    let first = arena.get(0).unwrap();
    assert_eq!(first.entity_index(), 0);
    assert_eq!(first.to_value(), Some(&1));
    assert!(arena.iter().all(|(_, m)| m.is_doable(&director)));
    assert_eq!(selector.size(&director), 16);
}

#[test]
fn test_random_order_is_a_seeded_permutation() {
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 1, 2, 3])).unwrap();
    let collect = |order, seed| {
        let mut selector: ChangeMoveSelector<_, _, ChangeMove<_, _>> =
            ChangeMoveSelector::new(queen_row(4), order);
        let mut arena = MoveArena::new();
        selector.fill(&director, &mut ChaCha8Rng::seed_from_u64(seed), &mut arena);
        arena
            .iter()
            .map(|(_, m)| (m.entity_index(), *m.to_value().unwrap()))
            .collect::<Vec<_>>()
    };

    let original = collect(SelectionOrder::Original, 1);
    let random_a = collect(SelectionOrder::Random, 1);
    let random_b = collect(SelectionOrder::Random, 1);
    assert_eq!(random_a, random_b);

    let mut sorted = random_a.clone();
    sorted.sort();
    assert_eq!(sorted, original);
}

#[test]
fn test_swap_selector_skips_equal_values() {
    let director = assignment::simple_director(rooms(&[0, 1, 0, 1])).unwrap();
    let mut selector: SwapMoveSelector<_, _, SwapMove<_, _>> =
        SwapMoveSelector::new(lesson_room(), SelectionOrder::Original);
    let mut arena = MoveArena::new();
    selector.fill(&director, &mut rng(), &mut arena);
    let pairs: Vec<Vec<usize>> = arena.iter().map(|(_, m)| m.entity_indices().to_vec()).collect();
    assert_eq!(pairs, vec![vec![0, 1], vec![0, 3], vec![1, 2], vec![2, 3]]);
}

#[test]
fn test_pinned_entities_are_not_selected() {
    let pinned = Arc::new(
        BasicVariable::new(
            0,
            "row",
            nqueens::queen_count,
            nqueens::get_queen_row,
            nqueens::set_queen_row,
            nqueens::row_range(3),
        )
        .with_pinned(|_, i| i != 1),
    );
    let director = nqueens::simple_director(NQueensSolution::with_rows(&[0, 0, 0])).unwrap();
    let mut selector: ChangeMoveSelector<_, _, ChangeMove<_, _>> =
        ChangeMoveSelector::new(pinned, SelectionOrder::Original);
    let mut arena = MoveArena::new();
    selector.fill(&director, &mut rng(), &mut arena);
    assert_eq!(arena.len(), 2);
    assert!(arena.iter().all(|(_, m)| m.entity_index() == 1));
}

#[test]
fn test_union_selector_concatenates_children() {
    let director = assignment::simple_director(rooms(&[0, 1, 0, 1])).unwrap();
    let mut union: UnionMoveSelector<Timetable, BasicMove<Timetable, usize>> =
        UnionMoveSelector::new(Vec::new())
            .with(ChangeMoveSelector::new(lesson_room(), SelectionOrder::Original))
            .with(SwapMoveSelector::new(lesson_room(), SelectionOrder::Original));
    let mut arena = MoveArena::new();
    union.fill(&director, &mut rng(), &mut arena);

    // One alternative room per lesson, then four swaps.
    assert_eq!(arena.len(), 8);
    assert!(matches!(arena.get(0), Some(BasicMove::Change(_))));
    assert!(matches!(arena.get(7), Some(BasicMove::Swap(_))));
    assert_eq!(union.len(), 2);
    assert_eq!(union.size(&director), 8 + 6);
}

#[test]
fn test_list_selector_neighborhood_sizes() {
    let routes: &[&[usize]] = &[&[0, 1], &[2]];
    let order = SelectionOrder::Original;
    let mut change = ListChangeMoveSelector::<_, _, RouteMove>::new(vehicle_visits(), order);
    let mut swap = ListSwapMoveSelector::<_, _, RouteMove>::new(vehicle_visits(), order);
    let mut reverse = ListReverseMoveSelector::<_, _, RouteMove>::new(vehicle_visits(), order);
    let mut sublist =
        SubListChangeMoveSelector::<_, _, RouteMove>::new(vehicle_visits(), 1, 2, order);

    assert_eq!(list_moves(routes, &mut change), 9);
    assert_eq!(list_moves(routes, &mut swap), 3);
    assert_eq!(list_moves(routes, &mut reverse), 1);
    assert_eq!(list_moves(routes, &mut sublist), 11);
}

#[test]
fn test_value_selector_strength_sorting() {
    let var = BasicVariable::new(
        0,
        "row",
        nqueens::queen_count,
        nqueens::get_queen_row,
        nqueens::set_queen_row,
        nqueens::row_range(3),
    )
    .with_strength(|_, row| -row)
    .with_allows_unassigned(true);
    let solution = NQueensSolution::uninitialized(3);

    let weakest =
        ValueSelector::sorted(ValueSorting::WeakestFirst).select(&var, &solution, 0, &mut rng());
    assert_eq!(weakest, vec![Some(2), Some(1), Some(0), None]);
    let strongest =
        ValueSelector::sorted(ValueSorting::StrongestFirst).select(&var, &solution, 0, &mut rng());
    assert_eq!(strongest, vec![Some(0), Some(1), Some(2), None]);
}

#[test]
fn test_entity_selector_decreasing_difficulty() {
    let var = BasicVariable::new(
        0,
        "room",
        assignment::lesson_count,
        assignment::get_lesson_room,
        assignment::set_lesson_room,
        stratum_core::domain::IndexRange::new(assignment::room_count),
    )
    .with_difficulty(|t: &Timetable, i| t.lessons[i].student_count);
    let timetable = Timetable::small();
    let selector = EntitySelector::new(SelectionOrder::Original);
    // Student counts are 25, 18, 20 and 22.
    assert_eq!(selector.select_unassigned(&var, &timetable, true), vec![0, 3, 2, 1]);
    assert_eq!(selector.select_unassigned(&var, &timetable, false), vec![0, 1, 2, 3]);
}

#[test]
fn test_selected_moves_apply() {
    let mut director = assignment::simple_director(rooms(&[0, 0, 0, 0])).unwrap();
    let mut selector: ChangeMoveSelector<_, _, BasicMove<_, _>> =
        ChangeMoveSelector::new(lesson_room(), SelectionOrder::Random);
    let mut arena = MoveArena::new();
    selector.fill(&director, &mut rng(), &mut arena);
    let m = arena.take(0).unwrap();
    m.do_move(&mut director).unwrap();
    let moved = (0..4)
        .filter(|&i| director.working_solution().lessons[i].room == Some(1))
        .count();
    assert_eq!(moved, 1);
}
