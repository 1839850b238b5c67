//! Flatten node: one upstream tuple expands into zero or more tuples.

use std::collections::HashMap;

use super::{Delta, IdSequence, SourceClass, SourceEvent, TupleId, TupleNode};

/// Expands one tuple into many.
pub trait Expander<T>: Clone + Send + Sync {
    type Output: Clone + Send + Sync + 'static;

    fn expand(&self, tuple: &T, out: &mut Vec<Self::Output>);
}

/// Expands a single value with `f(&a)`.
#[derive(Clone)]
pub struct FlattenUni<F>(pub F);

impl<A, B, I, F> Expander<A> for FlattenUni<F>
where
    F: Fn(&A) -> I + Clone + Send + Sync,
    I: IntoIterator<Item = B>,
    B: Clone + Send + Sync + 'static,
{
    type Output = B;

    fn expand(&self, tuple: &A, out: &mut Vec<B>) {
        out.extend((self.0)(tuple));
    }
}

/// Replaces the last element of a pair with each item of `f(&b)`.
#[derive(Clone)]
pub struct FlattenLast<F>(pub F);

impl<A, B, C, I, F> Expander<(A, B)> for FlattenLast<F>
where
    A: Clone + Send + Sync + 'static,
    F: Fn(&B) -> I + Clone + Send + Sync,
    I: IntoIterator<Item = C>,
    C: Clone + Send + Sync + 'static,
{
    type Output = (A, C);

    fn expand(&self, tuple: &(A, B), out: &mut Vec<(A, C)>) {
        out.extend((self.0)(&tuple.1).into_iter().map(|c| (tuple.0.clone(), c)));
    }
}

/// Emits one tuple per expanded item.
///
/// An upstream update retracts the previous expansion and inserts the new one.
#[derive(Clone)]
pub struct FlattenNode<N, X> {
    upstream: N,
    expander: X,
    outputs: HashMap<TupleId, Vec<TupleId>>,
    ids: IdSequence,
}

impl<N, X> FlattenNode<N, X> {
    pub fn new(upstream: N, expander: X) -> Self {
        Self {
            upstream,
            expander,
            outputs: HashMap::new(),
            ids: IdSequence::default(),
        }
    }

    fn retract<U>(&mut self, id: TupleId, out: &mut Vec<Delta<U>>) {
        if let Some(children) = self.outputs.remove(&id) {
            out.extend(children.into_iter().map(Delta::Retract));
        }
    }

    fn insert<T>(&mut self, id: TupleId, tuple: &T, out: &mut Vec<Delta<X::Output>>)
    where
        X: Expander<T>,
    {
        let mut items = Vec::new();
        self.expander.expand(tuple, &mut items);
        if items.is_empty() {
            return;
        }
        let mut children = Vec::with_capacity(items.len());
        for item in items {
            let child = self.ids.next();
            children.push(child);
            out.push(Delta::Insert(child, item));
        }
        self.outputs.insert(id, children);
    }

    fn apply<T>(&mut self, input: Vec<Delta<T>>, out: &mut Vec<Delta<X::Output>>)
    where
        X: Expander<T>,
    {
        for delta in input {
            match delta {
                Delta::Insert(id, t) => self.insert(id, &t, out),
                Delta::Update(id, t) => {
                    self.retract(id, out);
                    self.insert(id, &t, out);
                }
                Delta::Retract(id) => self.retract(id, out),
            }
        }
    }
}

impl<S, N, X> TupleNode<S> for FlattenNode<N, X>
where
    N: TupleNode<S>,
    X: Expander<N::Tuple>,
{
    type Tuple = X::Output;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<X::Output>>) {
        let mut input = Vec::new();
        self.upstream.initialize(solution, &mut input);
        self.apply(input, out);
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<X::Output>>) {
        let mut input = Vec::new();
        self.upstream.propagate(solution, event, &mut input);
        self.apply(input, out);
    }

    fn reset(&mut self) {
        self.upstream.reset();
        self.outputs.clear();
        self.ids.reset();
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.upstream.listens_to(class)
    }
}
