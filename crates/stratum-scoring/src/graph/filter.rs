//! Filter node.

use std::collections::HashSet;

use super::{Delta, SourceClass, SourceEvent, TupleId, TupleNode};

/// Passes through the upstream tuples that satisfy a predicate.
///
/// Tuple ids are preserved. An update that flips the predicate result
/// becomes an insert or a retract.
#[derive(Clone)]
pub struct FilterNode<N, P> {
    upstream: N,
    predicate: P,
    passing: HashSet<TupleId>,
}

impl<N, P> FilterNode<N, P> {
    pub fn new(upstream: N, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
            passing: HashSet::new(),
        }
    }

    fn apply<T>(&mut self, input: Vec<Delta<T>>, out: &mut Vec<Delta<T>>)
    where
        P: Fn(&T) -> bool,
    {
        for delta in input {
            match delta {
                Delta::Insert(id, t) => {
                    if (self.predicate)(&t) {
                        self.passing.insert(id);
                        out.push(Delta::Insert(id, t));
                    }
                }
                Delta::Update(id, t) => {
                    let was = self.passing.contains(&id);
                    let now = (self.predicate)(&t);
                    match (was, now) {
                        (true, true) => out.push(Delta::Update(id, t)),
                        (false, true) => {
                            self.passing.insert(id);
                            out.push(Delta::Insert(id, t));
                        }
                        (true, false) => {
                            self.passing.remove(&id);
                            out.push(Delta::Retract(id));
                        }
                        (false, false) => {}
                    }
                }
                Delta::Retract(id) => {
                    if self.passing.remove(&id) {
                        out.push(Delta::Retract(id));
                    }
                }
            }
        }
    }
}

impl<S, N, P> TupleNode<S> for FilterNode<N, P>
where
    N: TupleNode<S>,
    P: Fn(&N::Tuple) -> bool + Clone + Send + Sync,
{
    type Tuple = N::Tuple;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<N::Tuple>>) {
        let mut input = Vec::new();
        self.upstream.initialize(solution, &mut input);
        self.apply(input, out);
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<N::Tuple>>) {
        let mut input = Vec::new();
        self.upstream.propagate(solution, event, &mut input);
        self.apply(input, out);
    }

    fn reset(&mut self) {
        self.upstream.reset();
        self.passing.clear();
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.upstream.listens_to(class)
    }
}
