use std::collections::BTreeSet;

use super::*;

fn run<A, C: UniCollector<A>>(collector: &C, items: &[A]) -> C::Accumulator {
    let mut acc = collector.create_accumulator();
    for item in items {
        acc.accumulate(&collector.extract(item));
    }
    acc
}

#[test]
fn count_distinct_tracks_multiplicity() {
    let collector = count_distinct(|x: &i32| x % 3);
    let mut acc = run(&collector, &[1, 4, 2]);
    assert_eq!(acc.finish(), 2);

    acc.retract(&collector.extract(&1));
    assert_eq!(acc.finish(), 2);
    acc.retract(&collector.extract(&4));
    assert_eq!(acc.finish(), 1);
}

#[test]
fn average_of_empty_group_is_none() {
    let collector = average(|x: &i64| *x);
    let mut acc = run(&collector, &[2, 4, 9]);
    assert_eq!(acc.finish(), Some(5.0));

    for x in [2, 4, 9] {
        acc.retract(&collector.extract(&x));
    }
    assert_eq!(acc.finish(), None);
}

#[test]
fn min_and_max_survive_retraction_of_the_extreme() {
    let lo = min(|x: &i32| *x);
    let hi = max(|x: &i32| *x);
    let mut lo_acc = run(&lo, &[5, 1, 1, 7]);
    let mut hi_acc = run(&hi, &[5, 1, 1, 7]);
    assert_eq!(lo_acc.finish(), Some(1));
    assert_eq!(hi_acc.finish(), Some(7));

    lo_acc.retract(&1);
    assert_eq!(lo_acc.finish(), Some(1));
    lo_acc.retract(&1);
    assert_eq!(lo_acc.finish(), Some(5));

    hi_acc.retract(&7);
    assert_eq!(hi_acc.finish(), Some(5));
}

#[test]
fn to_list_keeps_insertion_order() {
    let collector = to_list(|x: &&str| x.to_string());
    let mut acc = run(&collector, &["b", "a", "b"]);
    assert_eq!(acc.finish(), vec!["b", "a", "b"]);

    acc.retract(&"b".to_string());
    assert_eq!(acc.finish(), vec!["a", "b"]);
}

#[test]
fn to_set_removes_value_after_last_duplicate() {
    let collector = to_set(|x: &u8| *x);
    let mut acc = run(&collector, &[3, 1, 3]);
    assert_eq!(acc.finish(), BTreeSet::from([1, 3]));

    acc.retract(&3);
    assert_eq!(acc.finish(), BTreeSet::from([1, 3]));
    acc.retract(&3);
    assert_eq!(acc.finish(), BTreeSet::from([1]));
}

#[test]
fn compose_pairs_results() {
    let collector = compose(count::<i64>(), sum(|x: &i64| *x));
    let acc = run(&collector, &[3, 4]);
    assert_eq!(acc.finish(), (2, 7));
}

#[test]
fn conditionally_skips_rejected_tuples() {
    let collector = conditionally(|x: &i32| *x > 0, count::<i32>());
    let mut acc = run(&collector, &[-1, 2, 3]);
    assert_eq!(acc.finish(), 2);

    acc.retract(&collector.extract(&-1));
    assert_eq!(acc.finish(), 2);
    acc.retract(&collector.extract(&2));
    assert_eq!(acc.finish(), 1);
}

#[test]
fn collect_and_then_maps_result() {
    let collector = collect_and_then(count::<i32>(), |n: &usize| *n > 1);
    let mut acc = run(&collector, &[1, 2]);
    assert!(acc.finish());
    acc.retract(&());
    assert!(!acc.finish());
}

#[test]
fn load_balance_perfectly_balanced() {
    let collector = load_balance(|x: &i32| *x, |_| 1i64);
    let acc = run(&collector, &[0, 1]);
    assert_eq!(acc.finish().unfairness(), 0);
}

#[test]
fn load_balance_incremental_matches_fresh() {
    let collector = load_balance(|x: &(char, i64)| x.0, |x: &(char, i64)| x.1);
    let mut acc = collector.create_accumulator();
    assert_eq!(acc.finish().unfairness(), 0);

    let a = ('A', 2);
    let b = ('B', 1);
    acc.accumulate(&collector.extract(&a));
    assert_eq!(acc.finish().unfairness(), 0);

    acc.accumulate(&collector.extract(&b));
    assert_eq!(acc.finish().unfairness(), 1);

    acc.accumulate(&collector.extract(&b));
    assert_eq!(acc.finish().unfairness(), 0);
    assert_eq!(acc.finish().loads().get(&'B'), Some(&2));

    acc.retract(&collector.extract(&b));
    assert_eq!(acc.finish().unfairness(), 1);

    acc.retract(&collector.extract(&b));
    assert_eq!(acc.finish().unfairness(), 0);
    assert!(acc.finish().loads().get(&'B').is_none());

    acc.retract(&collector.extract(&a));
    assert!(acc.finish().loads().is_empty());
}

#[test]
fn load_balance_wide_spread() {
    // Loads 4, 0 and 2 around mean 2: sqrt(4 + 4 + 0) rounds to 3.
    let collector = load_balance(|x: &(u8, i64)| x.0, |x: &(u8, i64)| x.1);
    let acc = run(&collector, &[(0, 4), (1, 0), (2, 2)]);
    assert_eq!(acc.finish().unfairness(), 3);
}

#[test]
fn reset_clears_state() {
    let collector = sum(|x: &i64| *x);
    let mut acc = run(&collector, &[1, 2, 3]);
    acc.reset();
    assert_eq!(acc.finish(), 0);
}
