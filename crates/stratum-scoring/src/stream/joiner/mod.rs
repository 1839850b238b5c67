//! Joiner functions for constraint stream joins.
//!
//! A joiner is a matching condition between a left and a right tuple. Every
//! joiner exposes a key per side and a relation between the keys, so the
//! join node can index each side and look up the opposite index instead of
//! scanning it.
//!
//! # Self-joins
//!
//! ```
//! use stratum_scoring::stream::joiner::{equal, Joiner};
//!
//! #[derive(Clone)]
//! struct Shift { employee_id: usize }
//!
//! let same_employee = equal(|s: &Shift| s.employee_id);
//! assert!(same_employee.matches(&Shift { employee_id: 1 }, &Shift { employee_id: 1 }));
//! ```
//!
//! # Cross-joins
//!
//! ```
//! use stratum_scoring::stream::joiner::{equal_bi, Joiner};
//!
//! struct Employee { id: usize }
//! struct Shift { employee_id: Option<usize> }
//!
//! let by_id = equal_bi(|s: &Shift| s.employee_id, |e: &Employee| Some(e.id));
//! assert!(by_id.matches(&Shift { employee_id: Some(3) }, &Employee { id: 3 }));
//! ```

mod comparison;
mod equal;
mod filtering;
mod overlapping;

pub use comparison::{
    greater_than, greater_than_or_equal, less_than, less_than_or_equal, ComparisonJoiner,
};
pub use equal::{equal, equal_bi, EqualJoiner};
pub use filtering::{filtering, FilteringJoiner};
pub use overlapping::{overlapping, overlapping_bi, OverlappingJoiner};

use std::hash::Hash;

/// How the left and right keys of an indexable joiner relate.
///
/// Relations read left-to-right: `LessThan` matches when `left < right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinRelation {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    /// Keys are half-open `(start, end)` intervals.
    Overlapping,
    /// No usable key; the join scans the opposite side.
    Unindexed,
}

impl JoinRelation {
    pub fn is_indexed(&self) -> bool {
        !matches!(self, JoinRelation::Unindexed)
    }
}

/// A joiner defines matching conditions between two tuples.
///
/// `matches` is the full predicate and is the source of truth: the join node
/// uses keys to narrow candidates, then re-checks every candidate with
/// `matches`.
pub trait Joiner<A, B>: Clone + Send + Sync {
    type Key: Clone + Eq + Hash + Ord + Send + Sync + 'static;

    fn relation(&self) -> JoinRelation;

    fn left_key(&self, a: &A) -> Self::Key;

    fn right_key(&self, b: &B) -> Self::Key;

    /// Returns true if the two tuples should be joined.
    fn matches(&self, a: &A, b: &B) -> bool;

    /// Exclusive upper bound on stored keys that may overlap `key`.
    ///
    /// Only overlap joiners return `Some`.
    fn overlap_bound(&self, _key: &Self::Key) -> Option<Self::Key> {
        None
    }

    /// Combines this joiner with another using AND semantics.
    ///
    /// The combined joiner indexes on `self` and checks `other` per candidate.
    fn and<J>(self, other: J) -> AndJoiner<Self, J>
    where
        Self: Sized,
        J: Joiner<A, B>,
    {
        AndJoiner {
            first: self,
            second: other,
        }
    }
}

#[derive(Clone)]
pub struct AndJoiner<J1, J2> {
    first: J1,
    second: J2,
}

impl<A, B, J1, J2> Joiner<A, B> for AndJoiner<J1, J2>
where
    J1: Joiner<A, B>,
    J2: Joiner<A, B>,
{
    type Key = J1::Key;

    fn relation(&self) -> JoinRelation {
        self.first.relation()
    }

    #[inline]
    fn left_key(&self, a: &A) -> J1::Key {
        self.first.left_key(a)
    }

    #[inline]
    fn right_key(&self, b: &B) -> J1::Key {
        self.first.right_key(b)
    }

    #[inline]
    fn matches(&self, a: &A, b: &B) -> bool {
        self.first.matches(a, b) && self.second.matches(a, b)
    }

    fn overlap_bound(&self, key: &J1::Key) -> Option<J1::Key> {
        self.first.overlap_bound(key)
    }
}

/// Matches every pair. Used when a join or existence check has no condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossJoiner;

impl<A, B> Joiner<A, B> for CrossJoiner {
    type Key = ();

    fn relation(&self) -> JoinRelation {
        JoinRelation::Unindexed
    }

    fn left_key(&self, _a: &A) {}

    fn right_key(&self, _b: &B) {}

    fn matches(&self, _a: &A, _b: &B) -> bool {
        true
    }
}

#[cfg(test)]
mod tests;
