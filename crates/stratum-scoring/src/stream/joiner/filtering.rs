//! Unindexed predicate joiner.

use super::{JoinRelation, Joiner};

/// Matches when `predicate(a, b)` holds.
///
/// Has no key, so a join using only this joiner compares against every tuple
/// on the opposite side. Combine it with an indexed joiner via `and` when
/// possible.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::joiner::{equal, filtering, Joiner};
///
/// #[derive(Clone)]
/// struct Shift { day: u32, hours: u32 }
///
/// let too_long = filtering(|a: &Shift, b: &Shift| a.hours + b.hours > 12);
/// assert!(too_long.matches(&Shift { day: 1, hours: 8 }, &Shift { day: 2, hours: 6 }));
///
/// let same_day_too_long = equal(|s: &Shift| s.day).and(too_long);
/// assert!(!same_day_too_long.matches(&Shift { day: 1, hours: 8 }, &Shift { day: 2, hours: 6 }));
/// ```
pub fn filtering<A, B, F>(predicate: F) -> FilteringJoiner<F>
where
    F: Fn(&A, &B) -> bool + Clone + Send + Sync,
{
    FilteringJoiner { predicate }
}

#[derive(Clone)]
pub struct FilteringJoiner<F> {
    predicate: F,
}

impl<A, B, F> Joiner<A, B> for FilteringJoiner<F>
where
    F: Fn(&A, &B) -> bool + Clone + Send + Sync,
{
    type Key = ();

    fn relation(&self) -> JoinRelation {
        JoinRelation::Unindexed
    }

    fn left_key(&self, _a: &A) {}

    fn right_key(&self, _b: &B) {}

    #[inline]
    fn matches(&self, a: &A, b: &B) -> bool {
        (self.predicate)(a, b)
    }
}
