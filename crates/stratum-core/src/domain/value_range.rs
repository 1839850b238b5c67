//! Value ranges for planning variables.
//!
//! A value range is the set of candidate values a genuine variable may hold.
//! Ranges are read from the working solution on demand, so a range backed by
//! a problem fact collection stays current after real-time problem changes.

use std::fmt;
use std::marker::PhantomData;

/// Candidate values for one planning variable.
///
/// `entity_index` lets a range depend on the entity being assigned;
/// solution-wide ranges ignore it.
pub trait ValueRange<S, V>: Send + Sync {
    fn size(&self, solution: &S, entity_index: usize) -> usize;

    /// Returns the value at `index`, or `None` when out of bounds.
    fn get(&self, solution: &S, entity_index: usize, index: usize) -> Option<V>;

    fn contains(&self, solution: &S, entity_index: usize, value: &V) -> bool;

    fn is_empty(&self, solution: &S, entity_index: usize) -> bool {
        self.size(solution, entity_index) == 0
    }

    /// Collects every value in range order.
    fn values(&self, solution: &S, entity_index: usize) -> Vec<V> {
        (0..self.size(solution, entity_index))
            .filter_map(|i| self.get(solution, entity_index, i))
            .collect()
    }
}

/// Indices `0..count(solution)` into a solution collection.
///
/// The usual range for variables that reference a fact or entity by index.
pub struct IndexRange<S, F>
where
    F: Fn(&S) -> usize + Send + Sync,
{
    count: F,
    _marker: PhantomData<fn(&S)>,
}

impl<S, F> IndexRange<S, F>
where
    F: Fn(&S) -> usize + Send + Sync,
{
    pub fn new(count: F) -> Self {
        Self {
            count,
            _marker: PhantomData,
        }
    }
}

impl<S, F> ValueRange<S, usize> for IndexRange<S, F>
where
    F: Fn(&S) -> usize + Send + Sync,
{
    fn size(&self, solution: &S, _entity_index: usize) -> usize {
        (self.count)(solution)
    }

    fn get(&self, solution: &S, _entity_index: usize, index: usize) -> Option<usize> {
        (index < (self.count)(solution)).then_some(index)
    }

    fn contains(&self, solution: &S, _entity_index: usize, value: &usize) -> bool {
        *value < (self.count)(solution)
    }
}

impl<S, F> fmt::Debug for IndexRange<S, F>
where
    F: Fn(&S) -> usize + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexRange").finish_non_exhaustive()
    }
}

/// Values read from a slice field on the solution.
pub struct FieldValueRange<S, V, F>
where
    F: Fn(&S) -> &[V] + Send + Sync,
{
    getter: F,
    _marker: PhantomData<fn(&S) -> V>,
}

impl<S, V, F> FieldValueRange<S, V, F>
where
    F: Fn(&S) -> &[V] + Send + Sync,
{
    pub fn new(getter: F) -> Self {
        Self {
            getter,
            _marker: PhantomData,
        }
    }
}

impl<S, V, F> ValueRange<S, V> for FieldValueRange<S, V, F>
where
    V: Clone + PartialEq,
    F: Fn(&S) -> &[V] + Send + Sync,
{
    fn size(&self, solution: &S, _entity_index: usize) -> usize {
        (self.getter)(solution).len()
    }

    fn get(&self, solution: &S, _entity_index: usize, index: usize) -> Option<V> {
        (self.getter)(solution).get(index).cloned()
    }

    fn contains(&self, solution: &S, _entity_index: usize, value: &V) -> bool {
        (self.getter)(solution).contains(value)
    }
}

/// A fixed list of values independent of the solution.
#[derive(Debug, Clone)]
pub struct StaticValueRange<V> {
    values: Vec<V>,
}

impl<V> StaticValueRange<V> {
    pub fn new(values: Vec<V>) -> Self {
        Self { values }
    }
}

impl<S, V> ValueRange<S, V> for StaticValueRange<V>
where
    V: Clone + PartialEq + Send + Sync,
{
    fn size(&self, _solution: &S, _entity_index: usize) -> usize {
        self.values.len()
    }

    fn get(&self, _solution: &S, _entity_index: usize, index: usize) -> Option<V> {
        self.values.get(index).cloned()
    }

    fn contains(&self, _solution: &S, _entity_index: usize, value: &V) -> bool {
        self.values.contains(value)
    }
}

/// Half-open integer range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerRange {
    start: i64,
    end: i64,
}

impl IntegerRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn from_zero(n: i64) -> Self {
        Self::new(0, n)
    }
}

impl<S> ValueRange<S, i64> for IntegerRange {
    fn size(&self, _solution: &S, _entity_index: usize) -> usize {
        (self.end - self.start).max(0) as usize
    }

    fn get(&self, _solution: &S, _entity_index: usize, index: usize) -> Option<i64> {
        let value = self.start.checked_add(i64::try_from(index).ok()?)?;
        (value < self.end).then_some(value)
    }

    fn contains(&self, _solution: &S, _entity_index: usize, value: &i64) -> bool {
        (self.start..self.end).contains(value)
    }
}
