//! Equality joiner.

use std::hash::Hash;
use std::marker::PhantomData;

use super::{JoinRelation, Joiner};

/// Joins tuples whose keys are equal; the same extractor serves both sides.
pub fn equal<A, T, F>(key: F) -> EqualJoiner<F, F, T>
where
    T: Clone + Eq + Hash + Ord,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    EqualJoiner {
        left: key.clone(),
        right: key,
        _phantom: PhantomData,
    }
}

/// Joins tuples of different types whose keys are equal.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::joiner::{equal_bi, Joiner};
///
/// struct Lesson { room: Option<usize> }
/// struct Room { id: usize }
///
/// let in_room = equal_bi(|l: &Lesson| l.room, |r: &Room| Some(r.id));
/// assert!(in_room.matches(&Lesson { room: Some(2) }, &Room { id: 2 }));
/// assert!(!in_room.matches(&Lesson { room: None }, &Room { id: 2 }));
/// ```
pub fn equal_bi<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> EqualJoiner<Fa, Fb, T>
where
    T: Clone + Eq + Hash + Ord,
    Fa: Fn(&A) -> T + Clone + Send + Sync,
    Fb: Fn(&B) -> T + Clone + Send + Sync,
{
    EqualJoiner {
        left,
        right,
        _phantom: PhantomData,
    }
}

/// Created by [`equal`] and [`equal_bi`]. Indexed by key equality.
pub struct EqualJoiner<Fa, Fb, T> {
    left: Fa,
    right: Fb,
    _phantom: PhantomData<fn() -> T>,
}

impl<Fa: Clone, Fb: Clone, T> Clone for EqualJoiner<Fa, Fb, T> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<A, B, T, Fa, Fb> Joiner<A, B> for EqualJoiner<Fa, Fb, T>
where
    T: Clone + Eq + Hash + Ord + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Clone + Send + Sync,
    Fb: Fn(&B) -> T + Clone + Send + Sync,
{
    type Key = T;

    fn relation(&self) -> JoinRelation {
        JoinRelation::Equal
    }

    #[inline]
    fn left_key(&self, a: &A) -> T {
        (self.left)(a)
    }

    #[inline]
    fn right_key(&self, b: &B) -> T {
        (self.right)(b)
    }

    #[inline]
    fn matches(&self, a: &A, b: &B) -> bool {
        (self.left)(a) == (self.right)(b)
    }
}
