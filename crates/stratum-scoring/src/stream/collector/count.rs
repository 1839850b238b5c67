//! Counting collectors.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Creates a collector that counts tuples.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::collector::{count, Accumulator, UniCollector};
///
/// let collector = count::<i32>();
/// let mut acc = collector.create_accumulator();
///
/// acc.accumulate(&collector.extract(&1));
/// acc.accumulate(&collector.extract(&2));
/// assert_eq!(acc.finish(), 2);
///
/// acc.retract(&collector.extract(&2));
/// assert_eq!(acc.finish(), 1);
/// ```
pub fn count<A>() -> CountCollector<A> {
    CountCollector {
        _phantom: PhantomData,
    }
}

/// A collector that counts tuples.
///
/// Created by the [`count()`] function.
pub struct CountCollector<A> {
    _phantom: PhantomData<fn(&A)>,
}

impl<A> Clone for CountCollector<A> {
    fn clone(&self) -> Self {
        count()
    }
}

impl<A> UniCollector<A> for CountCollector<A> {
    type Value = ();
    type Result = usize;
    type Accumulator = CountAccumulator;

    #[inline]
    fn extract(&self, _tuple: &A) {}

    fn create_accumulator(&self) -> CountAccumulator {
        CountAccumulator { count: 0 }
    }
}

#[derive(Debug, Clone)]
pub struct CountAccumulator {
    count: usize,
}

impl Accumulator<(), usize> for CountAccumulator {
    #[inline]
    fn accumulate(&mut self, _: &()) {
        self.count += 1;
    }

    #[inline]
    fn retract(&mut self, _: &()) {
        self.count = self.count.saturating_sub(1);
    }

    #[inline]
    fn finish(&self) -> usize {
        self.count
    }

    #[inline]
    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Creates a collector that counts distinct values of `mapper`.
pub fn count_distinct<A, K, F>(mapper: F) -> CountDistinctCollector<A, K, F>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    F: Fn(&A) -> K + Clone + Send + Sync,
{
    CountDistinctCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct CountDistinctCollector<A, K, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A) -> K>,
}

impl<A, K, F: Clone> Clone for CountDistinctCollector<A, K, F> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<A, K, F> UniCollector<A> for CountDistinctCollector<A, K, F>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    F: Fn(&A) -> K + Clone + Send + Sync,
{
    type Value = K;
    type Result = usize;
    type Accumulator = CountDistinctAccumulator<K>;

    #[inline]
    fn extract(&self, tuple: &A) -> K {
        (self.mapper)(tuple)
    }

    fn create_accumulator(&self) -> CountDistinctAccumulator<K> {
        CountDistinctAccumulator {
            counts: HashMap::new(),
        }
    }
}

/// Keeps a multiplicity per value; the result is the number of keys.
#[derive(Debug, Clone)]
pub struct CountDistinctAccumulator<K> {
    counts: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash> Accumulator<K, usize> for CountDistinctAccumulator<K> {
    fn accumulate(&mut self, value: &K) {
        *self.counts.entry(value.clone()).or_insert(0) += 1;
    }

    fn retract(&mut self, value: &K) {
        if let Some(count) = self.counts.get_mut(value) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(value);
            }
        }
    }

    fn finish(&self) -> usize {
        self.counts.len()
    }

    fn reset(&mut self) {
        self.counts.clear();
    }
}
