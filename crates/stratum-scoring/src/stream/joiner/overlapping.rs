//! Interval overlap joiner.

use std::marker::PhantomData;

use super::{JoinRelation, Joiner};

/// Matches when the half-open intervals `[start(a), end(a))` and
/// `[start(b), end(b))` overlap. Touching intervals do not overlap.
pub struct OverlappingJoiner<Fsa, Fea, Fsb, Feb, T> {
    start_a: Fsa,
    end_a: Fea,
    start_b: Fsb,
    end_b: Feb,
    _phantom: PhantomData<fn() -> T>,
}

impl<Fsa: Clone, Fea: Clone, Fsb: Clone, Feb: Clone, T> Clone
    for OverlappingJoiner<Fsa, Fea, Fsb, Feb, T>
{
    fn clone(&self) -> Self {
        Self {
            start_a: self.start_a.clone(),
            end_a: self.end_a.clone(),
            start_b: self.start_b.clone(),
            end_b: self.end_b.clone(),
            _phantom: PhantomData,
        }
    }
}

/// Overlap between two tuples of the same type.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::joiner::{overlapping, Joiner};
///
/// struct Shift { start: i64, end: i64 }
///
/// let overlap = overlapping(|s: &Shift| s.start, |s: &Shift| s.end);
/// assert!(overlap.matches(&Shift { start: 0, end: 8 }, &Shift { start: 7, end: 9 }));
/// assert!(!overlap.matches(&Shift { start: 0, end: 8 }, &Shift { start: 8, end: 9 }));
/// ```
pub fn overlapping<A, T, Fs, Fe>(start: Fs, end: Fe) -> OverlappingJoiner<Fs, Fe, Fs, Fe, T>
where
    T: Ord,
    Fs: Fn(&A) -> T + Clone + Send + Sync,
    Fe: Fn(&A) -> T + Clone + Send + Sync,
{
    OverlappingJoiner {
        start_a: start.clone(),
        end_a: end.clone(),
        start_b: start,
        end_b: end,
        _phantom: PhantomData,
    }
}

/// Overlap between tuples of different types.
pub fn overlapping_bi<A, B, T, Fsa, Fea, Fsb, Feb>(
    start_a: Fsa,
    end_a: Fea,
    start_b: Fsb,
    end_b: Feb,
) -> OverlappingJoiner<Fsa, Fea, Fsb, Feb, T>
where
    T: Ord,
    Fsa: Fn(&A) -> T + Clone + Send + Sync,
    Fea: Fn(&A) -> T + Clone + Send + Sync,
    Fsb: Fn(&B) -> T + Clone + Send + Sync,
    Feb: Fn(&B) -> T + Clone + Send + Sync,
{
    OverlappingJoiner {
        start_a,
        end_a,
        start_b,
        end_b,
        _phantom: PhantomData,
    }
}

impl<A, B, T, Fsa, Fea, Fsb, Feb> Joiner<A, B> for OverlappingJoiner<Fsa, Fea, Fsb, Feb, T>
where
    T: Clone + Eq + std::hash::Hash + Ord + Send + Sync + 'static,
    Fsa: Fn(&A) -> T + Clone + Send + Sync,
    Fea: Fn(&A) -> T + Clone + Send + Sync,
    Fsb: Fn(&B) -> T + Clone + Send + Sync,
    Feb: Fn(&B) -> T + Clone + Send + Sync,
{
    type Key = (T, T);

    fn relation(&self) -> JoinRelation {
        JoinRelation::Overlapping
    }

    fn left_key(&self, a: &A) -> (T, T) {
        ((self.start_a)(a), (self.end_a)(a))
    }

    fn right_key(&self, b: &B) -> (T, T) {
        ((self.start_b)(b), (self.end_b)(b))
    }

    fn matches(&self, a: &A, b: &B) -> bool {
        (self.start_a)(a) < (self.end_b)(b) && (self.start_b)(b) < (self.end_a)(a)
    }

    fn overlap_bound(&self, key: &(T, T)) -> Option<(T, T)> {
        Some((key.1.clone(), key.1.clone()))
    }
}
