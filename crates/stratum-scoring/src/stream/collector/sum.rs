//! Sum and average collectors.

use std::marker::PhantomData;
use std::ops::{AddAssign, SubAssign};

use super::{Accumulator, UniCollector};

/// Creates a collector that sums values extracted from tuples.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::collector::{sum, Accumulator, UniCollector};
///
/// struct Item { value: i64 }
///
/// let collector = sum(|item: &Item| item.value);
/// let mut acc = collector.create_accumulator();
///
/// acc.accumulate(&collector.extract(&Item { value: 5 }));
/// acc.accumulate(&collector.extract(&Item { value: 7 }));
/// assert_eq!(acc.finish(), 12);
/// ```
pub fn sum<A, T, F>(mapper: F) -> SumCollector<A, T, F>
where
    T: Default + Copy + PartialEq + AddAssign + SubAssign + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    SumCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Created by the [`sum()`] function.
pub struct SumCollector<A, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F: Clone> Clone for SumCollector<A, T, F> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<A, T, F> UniCollector<A> for SumCollector<A, T, F>
where
    T: Default + Copy + PartialEq + AddAssign + SubAssign + Send + Sync + 'static,
    F: Fn(&A) -> T + Clone + Send + Sync,
{
    type Value = T;
    type Result = T;
    type Accumulator = SumAccumulator<T>;

    #[inline]
    fn extract(&self, tuple: &A) -> T {
        (self.mapper)(tuple)
    }

    fn create_accumulator(&self) -> SumAccumulator<T> {
        SumAccumulator { sum: T::default() }
    }
}

/// Works with pre-extracted values, not tuples.
#[derive(Debug, Clone)]
pub struct SumAccumulator<T> {
    sum: T,
}

impl<T> Accumulator<T, T> for SumAccumulator<T>
where
    T: Default + Copy + AddAssign + SubAssign,
{
    #[inline]
    fn accumulate(&mut self, value: &T) {
        self.sum += *value;
    }

    #[inline]
    fn retract(&mut self, value: &T) {
        self.sum -= *value;
    }

    #[inline]
    fn finish(&self) -> T {
        self.sum
    }

    #[inline]
    fn reset(&mut self) {
        self.sum = T::default();
    }
}

/// Creates a collector for the arithmetic mean of `mapper`.
///
/// The result is `None` for an empty group.
pub fn average<A, F>(mapper: F) -> AverageCollector<A, F>
where
    F: Fn(&A) -> i64 + Clone + Send + Sync,
{
    AverageCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct AverageCollector<A, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A)>,
}

impl<A, F: Clone> Clone for AverageCollector<A, F> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<A, F> UniCollector<A> for AverageCollector<A, F>
where
    F: Fn(&A) -> i64 + Clone + Send + Sync,
{
    type Value = i64;
    type Result = Option<f64>;
    type Accumulator = AverageAccumulator;

    #[inline]
    fn extract(&self, tuple: &A) -> i64 {
        (self.mapper)(tuple)
    }

    fn create_accumulator(&self) -> AverageAccumulator {
        AverageAccumulator::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AverageAccumulator {
    sum: i64,
    count: usize,
}

impl Accumulator<i64, Option<f64>> for AverageAccumulator {
    fn accumulate(&mut self, value: &i64) {
        self.sum += value;
        self.count += 1;
    }

    fn retract(&mut self, value: &i64) {
        self.sum -= value;
        self.count = self.count.saturating_sub(1);
    }

    fn finish(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }

    fn reset(&mut self) {
        self.sum = 0;
        self.count = 0;
    }
}
