use stratum_core::score::HardSoftScore;

use super::{ConstraintSet, IncrementalConstraint};
use crate::graph::{SourceClass, SourceEvent};
use crate::stream::joiner::equal_bi;
use crate::stream::{entities, facts, ConstraintFactory};

#[derive(Clone, Debug)]
struct Worker {
    id: usize,
    budget: i64,
}

#[derive(Clone, Debug)]
struct Task {
    worker: Option<usize>,
    cost: i64,
}

#[derive(Clone, Debug)]
struct Plan {
    workers: Vec<Worker>,
    tasks: Vec<Task>,
}

fn workers(p: &Plan) -> &[Worker] {
    &p.workers
}

fn tasks(p: &Plan) -> &[Task] {
    &p.tasks
}

fn plan() -> Plan {
    Plan {
        workers: vec![Worker { id: 0, budget: 5 }, Worker { id: 1, budget: 2 }],
        tasks: vec![
            Task {
                worker: None,
                cost: 3,
            },
            Task {
                worker: Some(0),
                cost: 4,
            },
            Task {
                worker: Some(1),
                cost: 6,
            },
        ],
    }
}

fn factory() -> ConstraintFactory<Plan, HardSoftScore> {
    ConstraintFactory::new()
}

fn unassigned() -> impl IncrementalConstraint<Plan, HardSoftScore> + Clone {
    factory()
        .for_each(entities(0, tasks))
        .filter(|t: &Task| t.worker.is_none())
        .penalize(HardSoftScore::ONE_HARD)
        .as_constraint("Unassigned task")
}

fn cost() -> impl IncrementalConstraint<Plan, HardSoftScore> + Clone {
    factory()
        .for_each(entities(0, tasks))
        .filter(|t: &Task| t.worker.is_some())
        .penalize_with(HardSoftScore::ONE_SOFT, |t: &Task| t.cost)
        .as_constraint("Task cost")
}

fn over_budget() -> impl IncrementalConstraint<Plan, HardSoftScore> + Clone {
    factory()
        .for_each(entities(0, tasks))
        .join(
            facts(0, workers),
            equal_bi(|t: &Task| t.worker, |w: &Worker| Some(w.id)),
        )
        .filter(|t: &Task, w: &Worker| t.cost > w.budget)
        .penalize_with(HardSoftScore::ONE_HARD, |t: &Task, w: &Worker| t.cost - w.budget)
        .as_constraint("Over budget")
}

// Assigns task 0 to worker 0.
fn assign_first(p: &mut Plan) -> SourceEvent {
    p.tasks[0].worker = Some(0);
    SourceEvent::Update {
        class: SourceClass::Entity(0),
        index: 0,
    }
}

#[test]
fn test_tuple_set_scores() {
    let mut p = plan();
    let mut set = (unassigned(), cost(), over_budget());
    // unassigned -1 hard, cost -(4+6) soft, worker 1 over budget by 4
    assert_eq!(set.initialize_all(&p), HardSoftScore::of(-5, -10));
    assert_eq!(set.constraint_count(), 3);

    let event = assign_first(&mut p);
    // -1 hard gone, cost 3 added, task 0 fits worker 0's budget
    assert_eq!(set.on_event_all(&p, &event), HardSoftScore::of(1, -3));
    assert_eq!(set.score(), HardSoftScore::of(-4, -13));
}

#[test]
fn test_boxed_set_matches_tuple_set() {
    let mut p = plan();
    let mut tuple = (unassigned(), cost(), over_budget());
    let mut boxed: Vec<Box<dyn IncrementalConstraint<Plan, HardSoftScore>>> =
        vec![Box::new(unassigned()), Box::new(cost()), Box::new(over_budget())];

    assert_eq!(tuple.initialize_all(&p), boxed.initialize_all(&p));
    assert_eq!(boxed.constraint_count(), 3);

    let event = assign_first(&mut p);
    assert_eq!(tuple.on_event_all(&p, &event), boxed.on_event_all(&p, &event));

    p.workers[1].budget = 10;
    let event = SourceEvent::Update {
        class: SourceClass::Fact(0),
        index: 1,
    };
    assert_eq!(boxed.on_event_all(&p, &event), HardSoftScore::of(4, 0));
    tuple.on_event_all(&p, &event);
    assert_eq!(tuple.score(), boxed.score());
    assert_eq!(boxed.score(), HardSoftScore::of(0, -13));
}

#[test]
fn test_cloned_set_is_independent() {
    let mut p = plan();
    let mut set: Vec<Box<dyn IncrementalConstraint<Plan, HardSoftScore>>> =
        vec![Box::new(unassigned()), Box::new(cost())];
    set.initialize_all(&p);
    let snapshot = set.clone();

    let event = assign_first(&mut p);
    set.on_event_all(&p, &event);

    assert_eq!(set.score(), HardSoftScore::of(0, -13));
    assert_eq!(snapshot.score(), HardSoftScore::of(-1, -10));
}

#[test]
fn test_evaluate_each() {
    let p = plan();
    let mut set = (unassigned(), cost(), over_budget());
    set.initialize_all(&p);

    let results = set.evaluate_each();
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Unassigned task", "Task cost", "Over budget"]);
    assert_eq!(results[0].score, HardSoftScore::of(-1, 0));
    assert_eq!(results[1].match_count, 2);
    assert!(results[2].is_hard);
    assert!(!results[1].is_hard);
}

#[test]
fn test_analyze() {
    let p = plan();
    let mut set = (unassigned(), cost());
    set.initialize_all(&p);

    let analyses = set.analyze();
    assert_eq!(analyses.len(), 2);
    let cost = &analyses[1];
    assert_eq!(cost.name(), "Task cost");
    assert_eq!(cost.weight, HardSoftScore::ONE_SOFT);
    assert_eq!(cost.match_count(), 2);
    let mut impacts: Vec<_> = cost.matches.iter().map(|m| m.score).collect();
    impacts.sort();
    assert_eq!(impacts, [HardSoftScore::of(0, -6), HardSoftScore::of(0, -4)]);
}

#[test]
fn test_fact_events_skip_entity_only_constraints() {
    let mut p = plan();
    let mut set = (unassigned(), over_budget());
    set.initialize_all(&p);
    assert!(!set.0.listens_to(SourceClass::Fact(0)));
    assert!(set.1.listens_to(SourceClass::Fact(0)));

    p.workers.push(Worker { id: 2, budget: 0 });
    let event = SourceEvent::Insert {
        class: SourceClass::Fact(0),
        index: 2,
    };
    assert_eq!(set.on_event_all(&p, &event), HardSoftScore::ZERO);

    p.tasks[0].worker = Some(2);
    let event = SourceEvent::Update {
        class: SourceClass::Entity(0),
        index: 0,
    };
    // unassigned +1 hard, over budget by 3
    assert_eq!(set.on_event_all(&p, &event), HardSoftScore::of(-2, 0));
}

#[test]
fn test_reset_all() {
    let p = plan();
    let mut set = (unassigned(), cost());
    set.initialize_all(&p);
    set.reset_all();
    assert_eq!(set.score(), HardSoftScore::ZERO);
    assert_eq!(set.initialize_all(&p), HardSoftScore::of(-1, -10));
}

#[test]
fn test_empty_set() {
    assert_eq!(
        ConstraintSet::<Plan, HardSoftScore>::initialize_all(&mut (), &plan()),
        HardSoftScore::ZERO
    );
    assert_eq!(ConstraintSet::<Plan, HardSoftScore>::constraint_count(&()), 0);
}
