//! `to_list` and `to_set` collectors.

use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Collects the mapped values of a group in insertion order.
pub fn to_list<A, T, F>(mapper: F) -> ToListCollector<A, T, F>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    ToListCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct ToListCollector<A, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F: Clone> Clone for ToListCollector<A, T, F> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<A, T, F> UniCollector<A> for ToListCollector<A, T, F>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    type Value = T;
    type Result = Vec<T>;
    type Accumulator = ToListAccumulator<T>;

    #[inline]
    fn extract(&self, tuple: &A) -> T {
        (self.mapper)(tuple)
    }

    fn create_accumulator(&self) -> ToListAccumulator<T> {
        ToListAccumulator { items: Vec::new() }
    }
}

#[derive(Debug, Clone)]
pub struct ToListAccumulator<T> {
    items: Vec<T>,
}

impl<T: Clone + PartialEq> Accumulator<T, Vec<T>> for ToListAccumulator<T> {
    fn accumulate(&mut self, value: &T) {
        self.items.push(value.clone());
    }

    // Removes the first equal item; the order of the rest is kept.
    fn retract(&mut self, value: &T) {
        if let Some(pos) = self.items.iter().position(|item| item == value) {
            self.items.remove(pos);
        }
    }

    fn finish(&self) -> Vec<T> {
        self.items.clone()
    }

    fn reset(&mut self) {
        self.items.clear();
    }
}

/// Collects the distinct mapped values of a group, ordered.
pub fn to_set<A, T, F>(mapper: F) -> ToSetCollector<A, T, F>
where
    T: Clone + Ord + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    ToSetCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct ToSetCollector<A, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F: Clone> Clone for ToSetCollector<A, T, F> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<A, T, F> UniCollector<A> for ToSetCollector<A, T, F>
where
    T: Clone + Ord + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    type Value = T;
    type Result = BTreeSet<T>;
    type Accumulator = ToSetAccumulator<T>;

    #[inline]
    fn extract(&self, tuple: &A) -> T {
        (self.mapper)(tuple)
    }

    fn create_accumulator(&self) -> ToSetAccumulator<T> {
        ToSetAccumulator {
            counts: BTreeMap::new(),
        }
    }
}

/// Multiplicity per value, so retracting a duplicate keeps the value.
#[derive(Debug, Clone)]
pub struct ToSetAccumulator<T> {
    counts: BTreeMap<T, usize>,
}

impl<T: Clone + Ord> Accumulator<T, BTreeSet<T>> for ToSetAccumulator<T> {
    fn accumulate(&mut self, value: &T) {
        *self.counts.entry(value.clone()).or_insert(0) += 1;
    }

    fn retract(&mut self, value: &T) {
        if let Some(count) = self.counts.get_mut(value) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(value);
            }
        }
    }

    fn finish(&self) -> BTreeSet<T> {
        self.counts.keys().cloned().collect()
    }

    fn reset(&mut self) {
        self.counts.clear();
    }
}
