// End-to-end tests through the facade crate.
//
// Pigeons are placed into holes. Two pigeons sharing a hole cost one hard
// point; every pigeon outside hole 'A' costs one soft point.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use stratum::prelude::*;
use stratum::solver::{
    ChangeVariable, ExhaustiveSearchPhase, MoveCountTermination, SelectionOrder, SolverEventSupport,
    SolverHandle, StepLifecycleListener,
};
use stratum::{ConstraintSet, MoveApplicationError, ValidationError};

#[derive(Clone, Debug, PartialEq)]
struct Pigeon {
    id: usize,
    hole: Option<char>,
}

#[derive(Clone, Debug)]
struct Aviary {
    pigeons: Vec<Pigeon>,
    score: Option<HardSoftScore>,
}

impl Aviary {
    fn unassigned(count: usize) -> Self {
        Self {
            pigeons: (0..count).map(|id| Pigeon { id, hole: None }).collect(),
            score: None,
        }
    }

    fn with_holes(holes: &[char]) -> Self {
        Self {
            pigeons: holes
                .iter()
                .enumerate()
                .map(|(id, &hole)| Pigeon { id, hole: Some(hole) })
                .collect(),
            score: None,
        }
    }

    fn holes(&self) -> Vec<Option<char>> {
        self.pigeons.iter().map(|p| p.hole).collect()
    }
}

impl PlanningSolution for Aviary {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        self.pigeons.iter().all(|p| p.hole.is_some())
    }
}

impl SolvableSolution for Aviary {
    fn entity_count(solution: &Self, _descriptor_index: usize) -> usize {
        solution.pigeons.len()
    }
}

fn pigeons(a: &Aviary) -> &[Pigeon] {
    &a.pigeons
}

fn pigeon_count(a: &Aviary) -> usize {
    a.pigeons.len()
}

fn get_hole(a: &Aviary, idx: usize) -> Option<char> {
    a.pigeons.get(idx).and_then(|p| p.hole)
}

fn set_hole(a: &mut Aviary, idx: usize, hole: Option<char>) {
    if let Some(pigeon) = a.pigeons.get_mut(idx) {
        pigeon.hole = hole;
    }
}

fn hole_variable(holes: &[char]) -> Arc<BasicVariable<Aviary, char>> {
    Arc::new(BasicVariable::new(
        0,
        "hole",
        pigeon_count,
        get_hole,
        set_hole,
        StaticValueRange::new(holes.to_vec()),
    ))
}

fn constraints() -> impl ConstraintSet<Aviary, HardSoftScore> {
    let factory = ConstraintFactory::<Aviary, HardSoftScore>::new();

    let shared_hole = factory
        .for_each_unique_pair(entities(0, pigeons), equal(|p: &Pigeon| p.hole))
        .filter(|a: &Pigeon, _: &Pigeon| a.hole.is_some())
        .penalize(HardSoftScore::ONE_HARD)
        .as_constraint("Shared hole");

    let outside_a = factory
        .for_each(entities(0, pigeons))
        .filter(|p: &Pigeon| p.hole.is_some() && p.hole != Some('A'))
        .penalize(HardSoftScore::ONE_SOFT)
        .as_constraint("Outside hole A");

    (shared_hole, outside_a)
}

fn director(
    aviary: Aviary,
) -> Result<
    IncrementalScoreDirector<Aviary, impl ConstraintSet<Aviary, HardSoftScore>>,
    ValidationError,
> {
    let descriptor = SolutionDescriptor::new("Aviary")
        .with_value_range("holes")
        .with_entity(
            EntityDescriptor::new("Pigeon", "pigeons")
                .with_variable(VariableDescriptor::genuine("hole").with_value_range("holes")),
        )
        .with_score_field("score")
        .validate()?;
    Ok(IncrementalScoreDirector::new(aviary, descriptor, constraints()))
}

#[derive(Debug, Default)]
struct StepScores(Mutex<Vec<HardSoftScore>>);

impl StepLifecycleListener<Aviary> for StepScores {
    fn on_step_started(&self, _step_index: u64) {}

    fn on_step_ended(&self, _step_index: u64, score: &HardSoftScore) {
        if let Ok(mut scores) = self.0.lock() {
            scores.push(*score);
        }
    }
}

#[test]
fn test_construction_then_hill_climbing_on_two_holes() {
    let holes = ['A', 'B'];
    let mut construction = Solver::new((ConstructionHeuristicPhase::new(
        hole_variable(&holes),
        stratum::solver::ConstructionHeuristicType::FirstFit,
    ),));
    let constructed = construction
        .solve(director(Aviary::unassigned(3)).unwrap())
        .unwrap();
    assert_eq!(constructed.holes(), vec![Some('A'), Some('B'), Some('A')]);
    assert_eq!(constructed.score, Some(HardSoftScore::of(-1, -1)));

    let variable = hole_variable(&holes);
    let selector = UnionMoveSelector::<Aviary, BasicMove<Aviary, char>>::new(Vec::new())
        .with(ChangeMoveSelector::<Aviary, char, BasicMove<Aviary, char>>::new(
            Arc::clone(&variable),
            SelectionOrder::Original,
        ))
        .with(SwapMoveSelector::<Aviary, char, BasicMove<Aviary, char>>::new(
            variable,
            SelectionOrder::Original,
        ));
    let steps = Arc::new(StepScores::default());
    let mut events = SolverEventSupport::new();
    events.add_step_listener(steps.clone());

    let mut local_search = Solver::new((LocalSearchPhase::new(
        selector,
        stratum::solver::HillClimbingAcceptor::new(),
    ),))
    .with_termination(MoveCountTermination::new(200))
    .with_events(events);
    let improved = local_search.solve(director(constructed).unwrap()).unwrap();

    // Three pigeons cannot fit in two holes.
    let score = improved.score.unwrap();
    assert_eq!(score.hard(), -1);
    assert_eq!(score, HardSoftScore::of(-1, -1));

    let scores = steps.0.lock().unwrap();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    assert!(scores.iter().all(|s| s.hard() == -1));
}

#[test]
fn test_construction_finds_feasible_assignment_with_three_holes() {
    let mut solver = Solver::new((ConstructionHeuristicPhase::new(
        hole_variable(&['A', 'B', 'C']),
        stratum::solver::ConstructionHeuristicType::FirstFit,
    ),));
    let solution = solver.solve(director(Aviary::unassigned(3)).unwrap()).unwrap();

    assert!(solution.is_initialized());
    assert_eq!(solution.score, Some(HardSoftScore::of(0, -2)));
}

#[test]
fn test_move_outside_value_range_is_rejected() {
    let mut director = director(Aviary::with_holes(&['A', 'B'])).unwrap();
    let before = director.calculate_score();

    let change = ChangeMove::new(hole_variable(&['A', 'B']), 0, Some('Z'));
    let err = change.do_move(&mut director).unwrap_err();

    assert!(matches!(err, MoveApplicationError::ValueOutOfRange { entity_index: 0, .. }));
    assert_eq!(director.working_solution().holes(), vec![Some('A'), Some('B')]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_factory_from_toml_stops_when_feasible() {
    let config = SolverConfig::from_toml_str(
        r#"
        random_seed = 7

        [termination]
        best_score_feasible = true
        unimproved_seconds_spent_limit = 60

        [[phases]]
        type = "local_search"
        "#,
    )
    .unwrap();
    let factory = SolverFactory::new(
        config,
        VariableBinding::Basic(hole_variable(&['A', 'B', 'C'])),
        |a: Aviary| Ok(director(a)?),
    )
    .unwrap();

    let steps = Arc::new(StepScores::default());
    let mut events = SolverEventSupport::new();
    events.add_step_listener(steps.clone());
    let mut solver = factory.create_solver().unwrap().with_events(events);

    let started = Instant::now();
    let solution = solver
        .solve(factory.build_director(Aviary::with_holes(&['A', 'A', 'A'])).unwrap())
        .unwrap();

    assert_eq!(solution.score.map(|s| s.hard()), Some(0));
    assert_eq!(solution.pigeons.len(), 3);
    assert!(started.elapsed() < Duration::from_secs(30));

    // At least two pigeons had to leave the shared hole, and the run
    // stopped on the first feasible step.
    let stats = solver.last_stats().unwrap();
    assert!(stats.step_count >= 2);
    let scores = steps.0.lock().unwrap();
    assert_eq!(scores.last().map(|s| s.hard()), Some(0));
    assert_eq!(scores.iter().filter(|s| s.hard() == 0).count(), 1);
}

#[test]
fn test_factory_solve_matches_full_recalculation() {
    let config = SolverConfig::new()
        .with_random_seed(3)
        .with_termination(TerminationConfig::default().with_step_count_limit(20));
    let factory = SolverFactory::new(
        config,
        VariableBinding::Basic(hole_variable(&['A', 'B', 'C', 'D'])),
        |a: Aviary| Ok(director(a)?),
    )
    .unwrap();

    let solution = factory.solve(Aviary::unassigned(4)).unwrap();
    let mut check = director(solution.clone()).unwrap();
    assert_eq!(solution.score, Some(check.calculate_score()));
    assert_eq!(solution.score.map(|s| s.hard()), Some(0));
}

#[test]
fn test_exhaustive_search_stores_the_recalculated_score() {
    let mut solver = Solver::new((ExhaustiveSearchPhase::new(hole_variable(&['A', 'B', 'C'])),));
    let solution = solver.solve(director(Aviary::unassigned(3)).unwrap()).unwrap();

    let mut check = director(solution.clone()).unwrap();
    assert_eq!(solution.score, Some(check.calculate_score()));
    assert_eq!(solution.score, Some(HardSoftScore::of(0, -2)));
}

#[test]
fn test_invalid_problem_change_leaves_solution_alone() {
    let (handle, receiver) = SolverHandle::new();
    handle.add_problem_change(ChangeVariable::new(hole_variable(&['A', 'B']), 0, Some('Z')));
    handle.add_problem_change(ChangeVariable::new(hole_variable(&['A', 'B']), 5, Some('A')));

    let mut solver = Solver::new((LocalSearchPhase::new(
        ChangeMoveSelector::<Aviary, char, BasicMove<Aviary, char>>::new(
            hole_variable(&['A', 'B']),
            SelectionOrder::Original,
        ),
        stratum::solver::HillClimbingAcceptor::new(),
    ),))
    .with_termination(MoveCountTermination::new(50))
    .with_problem_changes(receiver);
    let solution = solver.solve(director(Aviary::with_holes(&['A', 'A'])).unwrap()).unwrap();

    assert_eq!(solution.pigeons.len(), 2);
    assert!(solution.holes().iter().all(|h| matches!(h, Some('A') | Some('B'))));
    let mut check = director(solution.clone()).unwrap();
    assert_eq!(solution.score, Some(check.calculate_score()));
    assert_eq!(solution.score, Some(HardSoftScore::of(0, -1)));
}
