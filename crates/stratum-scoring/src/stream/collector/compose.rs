//! Collectors built from other collectors.

use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Runs two collectors over the same group and pairs their results.
pub fn compose<C1, C2>(first: C1, second: C2) -> ComposeCollector<C1, C2> {
    ComposeCollector { first, second }
}

#[derive(Clone)]
pub struct ComposeCollector<C1, C2> {
    first: C1,
    second: C2,
}

impl<A, C1, C2> UniCollector<A> for ComposeCollector<C1, C2>
where
    C1: UniCollector<A>,
    C2: UniCollector<A>,
{
    type Value = (C1::Value, C2::Value);
    type Result = (C1::Result, C2::Result);
    type Accumulator = ComposeAccumulator<C1::Accumulator, C2::Accumulator>;

    fn extract(&self, tuple: &A) -> Self::Value {
        (self.first.extract(tuple), self.second.extract(tuple))
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        ComposeAccumulator {
            first: self.first.create_accumulator(),
            second: self.second.create_accumulator(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComposeAccumulator<X1, X2> {
    first: X1,
    second: X2,
}

impl<V1, V2, R1, R2, X1, X2> Accumulator<(V1, V2), (R1, R2)> for ComposeAccumulator<X1, X2>
where
    X1: Accumulator<V1, R1>,
    X2: Accumulator<V2, R2>,
{
    fn accumulate(&mut self, value: &(V1, V2)) {
        self.first.accumulate(&value.0);
        self.second.accumulate(&value.1);
    }

    fn retract(&mut self, value: &(V1, V2)) {
        self.first.retract(&value.0);
        self.second.retract(&value.1);
    }

    fn finish(&self) -> (R1, R2) {
        (self.first.finish(), self.second.finish())
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

/// Feeds `inner` only the tuples that satisfy `predicate`.
pub fn conditionally<P, C>(predicate: P, inner: C) -> ConditionalCollector<P, C> {
    ConditionalCollector { predicate, inner }
}

#[derive(Clone)]
pub struct ConditionalCollector<P, C> {
    predicate: P,
    inner: C,
}

impl<A, P, C> UniCollector<A> for ConditionalCollector<P, C>
where
    P: Fn(&A) -> bool + Clone + Send + Sync,
    C: UniCollector<A>,
{
    type Value = Option<C::Value>;
    type Result = C::Result;
    type Accumulator = ConditionalAccumulator<C::Accumulator>;

    fn extract(&self, tuple: &A) -> Self::Value {
        if (self.predicate)(tuple) {
            Some(self.inner.extract(tuple))
        } else {
            None
        }
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        ConditionalAccumulator {
            inner: self.inner.create_accumulator(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionalAccumulator<X> {
    inner: X,
}

impl<V, R, X> Accumulator<Option<V>, R> for ConditionalAccumulator<X>
where
    X: Accumulator<V, R>,
{
    fn accumulate(&mut self, value: &Option<V>) {
        if let Some(value) = value {
            self.inner.accumulate(value);
        }
    }

    fn retract(&mut self, value: &Option<V>) {
        if let Some(value) = value {
            self.inner.retract(value);
        }
    }

    fn finish(&self) -> R {
        self.inner.finish()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Maps the result of `inner` through `finisher`.
pub fn collect_and_then<C, F>(inner: C, finisher: F) -> AndThenCollector<C, F> {
    AndThenCollector { inner, finisher }
}

#[derive(Clone)]
pub struct AndThenCollector<C, F> {
    inner: C,
    finisher: F,
}

impl<A, C, F, R> UniCollector<A> for AndThenCollector<C, F>
where
    C: UniCollector<A>,
    F: Fn(&C::Result) -> R + Clone + Send + Sync,
    R: Clone + PartialEq + Send + Sync + 'static,
{
    type Value = C::Value;
    type Result = R;
    type Accumulator = AndThenAccumulator<C::Accumulator, F, C::Result>;

    fn extract(&self, tuple: &A) -> C::Value {
        self.inner.extract(tuple)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        AndThenAccumulator {
            inner: self.inner.create_accumulator(),
            finisher: self.finisher.clone(),
            _phantom: PhantomData,
        }
    }
}

pub struct AndThenAccumulator<X, F, R> {
    inner: X,
    finisher: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<X: Clone, F: Clone, R> Clone for AndThenAccumulator<X, F, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            finisher: self.finisher.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<V, R, R2, X, F> Accumulator<V, R2> for AndThenAccumulator<X, F, R>
where
    X: Accumulator<V, R>,
    F: Fn(&R) -> R2,
{
    fn accumulate(&mut self, value: &V) {
        self.inner.accumulate(value);
    }

    fn retract(&mut self, value: &V) {
        self.inner.retract(value);
    }

    fn finish(&self) -> R2 {
        (self.finisher)(&self.inner.finish())
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}
