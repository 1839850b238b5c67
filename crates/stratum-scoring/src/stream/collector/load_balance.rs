//! LoadBalance collector for measuring unfairness of a workload split.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Loads per balanced item and the resulting unfairness.
///
/// Unfairness is the square root of the sum of squared deviations from the
/// mean load, rounded to an integer. Zero means perfectly balanced.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalance<K: Eq + Hash> {
    loads: HashMap<K, i64>,
    unfairness: i64,
}

impl<K: Eq + Hash> LoadBalance<K> {
    pub fn loads(&self) -> &HashMap<K, i64> {
        &self.loads
    }

    #[inline]
    pub fn unfairness(&self) -> i64 {
        self.unfairness
    }
}

/// Creates a load balance collector.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::collector::{load_balance, Accumulator, UniCollector};
///
/// struct Shift { employee_id: usize }
///
/// let collector = load_balance(|s: &Shift| s.employee_id, |_s: &Shift| 1i64);
///
/// let mut acc = collector.create_accumulator();
/// acc.accumulate(&collector.extract(&Shift { employee_id: 0 }));
/// acc.accumulate(&collector.extract(&Shift { employee_id: 0 }));
/// acc.accumulate(&collector.extract(&Shift { employee_id: 1 }));
///
/// // Loads 2 and 1: sqrt(0.25 + 0.25) rounds to 1.
/// assert_eq!(acc.finish().unfairness(), 1);
/// ```
pub fn load_balance<A, K, F, M>(key_fn: F, metric_fn: M) -> LoadBalanceCollector<A, K, F, M>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    F: Fn(&A) -> K + Clone + Send + Sync,
    M: Fn(&A) -> i64 + Clone + Send + Sync,
{
    LoadBalanceCollector {
        key_fn,
        metric_fn,
        _phantom: PhantomData,
    }
}

pub struct LoadBalanceCollector<A, K, F, M> {
    key_fn: F,
    metric_fn: M,
    _phantom: PhantomData<fn(&A) -> K>,
}

impl<A, K, F: Clone, M: Clone> Clone for LoadBalanceCollector<A, K, F, M> {
    fn clone(&self) -> Self {
        Self {
            key_fn: self.key_fn.clone(),
            metric_fn: self.metric_fn.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<A, K, F, M> UniCollector<A> for LoadBalanceCollector<A, K, F, M>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    F: Fn(&A) -> K + Clone + Send + Sync,
    M: Fn(&A) -> i64 + Clone + Send + Sync,
{
    type Value = (K, i64);
    type Result = LoadBalance<K>;
    type Accumulator = LoadBalanceAccumulator<K>;

    #[inline]
    fn extract(&self, tuple: &A) -> (K, i64) {
        ((self.key_fn)(tuple), (self.metric_fn)(tuple))
    }

    fn create_accumulator(&self) -> LoadBalanceAccumulator<K> {
        LoadBalanceAccumulator::new()
    }
}

/// Keeps the sum and the sum of squares of the loads, so every accumulate
/// or retract updates the variance in constant time.
#[derive(Debug, Clone)]
pub struct LoadBalanceAccumulator<K> {
    item_counts: HashMap<K, usize>,
    loads: HashMap<K, i64>,
    sum: i64,
    sum_of_squares: i128,
}

impl<K: Clone + Eq + Hash> LoadBalanceAccumulator<K> {
    fn new() -> Self {
        Self {
            item_counts: HashMap::new(),
            loads: HashMap::new(),
            sum: 0,
            sum_of_squares: 0,
        }
    }

    fn shift_load(&mut self, key: &K, diff: i64) {
        let old = self.loads.get(key).copied().unwrap_or(0);
        let new = old + diff;
        self.sum += diff;
        self.sum_of_squares +=
            i128::from(new) * i128::from(new) - i128::from(old) * i128::from(old);
        self.loads.insert(key.clone(), new);
    }

    fn unfairness(&self) -> i64 {
        let n = self.loads.len();
        if n == 0 {
            return 0;
        }
        let mean_square = (self.sum as f64) * (self.sum as f64) / n as f64;
        let deviation = (self.sum_of_squares as f64 - mean_square).max(0.0);
        deviation.sqrt().round() as i64
    }
}

impl<K: Clone + Eq + Hash> Accumulator<(K, i64), LoadBalance<K>> for LoadBalanceAccumulator<K> {
    fn accumulate(&mut self, value: &(K, i64)) {
        let (key, metric) = value;
        *self.item_counts.entry(key.clone()).or_insert(0) += 1;
        self.shift_load(key, *metric);
    }

    fn retract(&mut self, value: &(K, i64)) {
        let (key, metric) = value;
        let remaining = match self.item_counts.get_mut(key) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => return,
        };
        self.shift_load(key, -*metric);
        if remaining == 0 {
            self.item_counts.remove(key);
            if let Some(rest) = self.loads.remove(key) {
                self.sum -= rest;
                self.sum_of_squares -= i128::from(rest) * i128::from(rest);
            }
        }
    }

    fn finish(&self) -> LoadBalance<K> {
        LoadBalance {
            loads: self.loads.clone(),
            unfairness: self.unfairness(),
        }
    }

    fn reset(&mut self) {
        self.item_counts.clear();
        self.loads.clear();
        self.sum = 0;
        self.sum_of_squares = 0;
    }
}
