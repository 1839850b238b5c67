use super::*;

#[derive(Clone)]
struct Shift {
    employee: usize,
    start: i64,
    end: i64,
}

fn shift(employee: usize, start: i64, end: i64) -> Shift {
    Shift {
        employee,
        start,
        end,
    }
}

#[test]
fn test_equal_keys_and_relation() {
    let j = equal(|s: &Shift| s.employee);
    assert_eq!(Joiner::<Shift, Shift>::relation(&j), JoinRelation::Equal);
    assert_eq!(Joiner::<Shift, Shift>::left_key(&j, &shift(4, 0, 1)), 4);
    assert!(j.matches(&shift(4, 0, 1), &shift(4, 5, 6)));
    assert!(!j.matches(&shift(4, 0, 1), &shift(5, 0, 1)));
}

#[test]
fn test_comparisons() {
    let a = shift(0, 1, 2);
    let b = shift(0, 3, 4);
    let start = |s: &Shift| s.start;
    assert!(less_than(start, start).matches(&a, &b));
    assert!(less_than_or_equal(start, start).matches(&a, &a));
    assert!(greater_than(start, start).matches(&b, &a));
    assert!(!greater_than(start, start).matches(&a, &a));
    assert!(greater_than_or_equal(start, start).matches(&a, &a));
}

#[test]
fn test_overlapping_is_half_open() {
    let j = overlapping(|s: &Shift| s.start, |s: &Shift| s.end);
    assert!(j.matches(&shift(0, 0, 8), &shift(1, 7, 9)));
    assert!(j.matches(&shift(0, 2, 3), &shift(1, 0, 9)));
    assert!(!j.matches(&shift(0, 0, 8), &shift(1, 8, 9)));
    assert_eq!(
        Joiner::<Shift, Shift>::overlap_bound(&j, &(0, 8)),
        Some((8, 8))
    );
}

#[test]
fn test_and_indexes_on_first() {
    let j = equal(|s: &Shift| s.employee).and(overlapping(|s: &Shift| s.start, |s: &Shift| s.end));
    assert_eq!(Joiner::<Shift, Shift>::relation(&j), JoinRelation::Equal);
    assert!(j.matches(&shift(1, 0, 5), &shift(1, 4, 6)));
    assert!(!j.matches(&shift(1, 0, 5), &shift(2, 4, 6)));
    assert!(!j.matches(&shift(1, 0, 5), &shift(1, 5, 6)));
}

#[test]
fn test_filtering_is_unindexed() {
    let j = filtering(|a: &Shift, b: &Shift| a.end - a.start > b.end - b.start);
    assert!(!Joiner::<Shift, Shift>::relation(&j).is_indexed());
    assert!(j.matches(&shift(0, 0, 9), &shift(0, 0, 1)));
}
