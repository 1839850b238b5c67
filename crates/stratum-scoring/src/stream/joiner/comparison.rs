//! Ordering joiners: less-than, greater-than and their inclusive forms.

use std::marker::PhantomData;

use super::{JoinRelation, Joiner};

/// Compares `left(a)` with `right(b)` under a fixed relation.
pub struct ComparisonJoiner<Fa, Fb, T> {
    left: Fa,
    right: Fb,
    relation: JoinRelation,
    _phantom: PhantomData<fn() -> T>,
}

impl<Fa: Clone, Fb: Clone, T> Clone for ComparisonJoiner<Fa, Fb, T> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            relation: self.relation,
            _phantom: PhantomData,
        }
    }
}

fn comparison<Fa, Fb, T>(
    left: Fa,
    right: Fb,
    relation: JoinRelation,
) -> ComparisonJoiner<Fa, Fb, T> {
    ComparisonJoiner {
        left,
        right,
        relation,
        _phantom: PhantomData,
    }
}

/// Matches when `left(a) < right(b)`.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::joiner::{less_than, Joiner};
///
/// let earlier = less_than(|a: &i64| *a, |b: &i64| *b);
/// assert!(earlier.matches(&1, &2));
/// assert!(!earlier.matches(&2, &2));
/// ```
pub fn less_than<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> ComparisonJoiner<Fa, Fb, T>
where
    T: Ord,
    Fa: Fn(&A) -> T + Clone + Send + Sync,
    Fb: Fn(&B) -> T + Clone + Send + Sync,
{
    comparison(left, right, JoinRelation::LessThan)
}

/// Matches when `left(a) <= right(b)`.
pub fn less_than_or_equal<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> ComparisonJoiner<Fa, Fb, T>
where
    T: Ord,
    Fa: Fn(&A) -> T + Clone + Send + Sync,
    Fb: Fn(&B) -> T + Clone + Send + Sync,
{
    comparison(left, right, JoinRelation::LessThanOrEqual)
}

/// Matches when `left(a) > right(b)`.
pub fn greater_than<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> ComparisonJoiner<Fa, Fb, T>
where
    T: Ord,
    Fa: Fn(&A) -> T + Clone + Send + Sync,
    Fb: Fn(&B) -> T + Clone + Send + Sync,
{
    comparison(left, right, JoinRelation::GreaterThan)
}

/// Matches when `left(a) >= right(b)`.
pub fn greater_than_or_equal<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> ComparisonJoiner<Fa, Fb, T>
where
    T: Ord,
    Fa: Fn(&A) -> T + Clone + Send + Sync,
    Fb: Fn(&B) -> T + Clone + Send + Sync,
{
    comparison(left, right, JoinRelation::GreaterThanOrEqual)
}

impl<A, B, T, Fa, Fb> Joiner<A, B> for ComparisonJoiner<Fa, Fb, T>
where
    T: Clone + Eq + std::hash::Hash + Ord + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Clone + Send + Sync,
    Fb: Fn(&B) -> T + Clone + Send + Sync,
{
    type Key = T;

    fn relation(&self) -> JoinRelation {
        self.relation
    }

    #[inline]
    fn left_key(&self, a: &A) -> T {
        (self.left)(a)
    }

    #[inline]
    fn right_key(&self, b: &B) -> T {
        (self.right)(b)
    }

    fn matches(&self, a: &A, b: &B) -> bool {
        let (l, r) = ((self.left)(a), (self.right)(b));
        match self.relation {
            JoinRelation::LessThan => l < r,
            JoinRelation::LessThanOrEqual => l <= r,
            JoinRelation::GreaterThan => l > r,
            JoinRelation::GreaterThanOrEqual => l >= r,
            _ => l == r,
        }
    }
}
