//! `min` and `max` collectors.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Creates a collector for the smallest value of `mapper` in a group.
pub fn min<A, T, F>(mapper: F) -> ExtremumCollector<A, T, F>
where
    T: Clone + Ord + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    ExtremumCollector {
        mapper,
        largest: false,
        _phantom: PhantomData,
    }
}

/// Creates a collector for the largest value of `mapper` in a group.
pub fn max<A, T, F>(mapper: F) -> ExtremumCollector<A, T, F>
where
    T: Clone + Ord + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    ExtremumCollector {
        mapper,
        largest: true,
        _phantom: PhantomData,
    }
}

pub struct ExtremumCollector<A, T, F> {
    mapper: F,
    largest: bool,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F: Clone> Clone for ExtremumCollector<A, T, F> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper.clone(),
            largest: self.largest,
            _phantom: PhantomData,
        }
    }
}

impl<A, T, F> UniCollector<A> for ExtremumCollector<A, T, F>
where
    T: Clone + Ord + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    type Value = T;
    type Result = Option<T>;
    type Accumulator = ExtremumAccumulator<T>;

    #[inline]
    fn extract(&self, tuple: &A) -> T {
        (self.mapper)(tuple)
    }

    fn create_accumulator(&self) -> ExtremumAccumulator<T> {
        ExtremumAccumulator {
            values: BTreeMap::new(),
            largest: self.largest,
        }
    }
}

/// Ordered multiset of the group's values; retraction is `O(log n)`.
#[derive(Debug, Clone)]
pub struct ExtremumAccumulator<T> {
    values: BTreeMap<T, usize>,
    largest: bool,
}

impl<T: Clone + Ord> Accumulator<T, Option<T>> for ExtremumAccumulator<T> {
    fn accumulate(&mut self, value: &T) {
        *self.values.entry(value.clone()).or_insert(0) += 1;
    }

    fn retract(&mut self, value: &T) {
        if let Some(count) = self.values.get_mut(value) {
            *count -= 1;
            if *count == 0 {
                self.values.remove(value);
            }
        }
    }

    fn finish(&self) -> Option<T> {
        let entry = if self.largest {
            self.values.last_key_value()
        } else {
            self.values.first_key_value()
        };
        entry.map(|(value, _)| value.clone())
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}
