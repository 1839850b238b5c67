/// Aggregates the tuples of one group into a single result.
///
/// The collector itself is stateless; all per-group state lives in the
/// [`Accumulator`] it creates. `extract` runs once per inserted tuple and the
/// extracted value is kept by the group-by node so the same value can be
/// retracted later.
pub trait UniCollector<A>: Clone + Send + Sync {
    type Value: Clone + Send + Sync + 'static;
    type Result: Clone + PartialEq + Send + Sync + 'static;
    type Accumulator: Accumulator<Self::Value, Self::Result> + Clone + Send + Sync;

    fn extract(&self, tuple: &A) -> Self::Value;

    fn create_accumulator(&self) -> Self::Accumulator;
}

/// Running state of one group.
///
/// `retract` is only ever called with a value previously passed to
/// `accumulate`.
pub trait Accumulator<V, R> {
    fn accumulate(&mut self, value: &V);

    fn retract(&mut self, value: &V);

    fn finish(&self) -> R;

    fn reset(&mut self);
}
