//! Map node.

use super::{Delta, SourceClass, SourceEvent, TupleNode};

/// Transforms every upstream tuple; ids and update events are preserved.
#[derive(Clone)]
pub struct MapNode<N, F> {
    upstream: N,
    mapper: F,
}

impl<N, F> MapNode<N, F> {
    pub fn new(upstream: N, mapper: F) -> Self {
        Self { upstream, mapper }
    }

    fn apply<T, U>(&self, input: Vec<Delta<T>>, out: &mut Vec<Delta<U>>)
    where
        F: Fn(&T) -> U,
    {
        out.extend(input.into_iter().map(|delta| match delta {
            Delta::Insert(id, t) => Delta::Insert(id, (self.mapper)(&t)),
            Delta::Update(id, t) => Delta::Update(id, (self.mapper)(&t)),
            Delta::Retract(id) => Delta::Retract(id),
        }));
    }
}

impl<S, N, F, U> TupleNode<S> for MapNode<N, F>
where
    N: TupleNode<S>,
    F: Fn(&N::Tuple) -> U + Clone + Send + Sync,
    U: Clone + Send + Sync + 'static,
{
    type Tuple = U;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<U>>) {
        let mut input = Vec::new();
        self.upstream.initialize(solution, &mut input);
        self.apply(input, out);
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<U>>) {
        let mut input = Vec::new();
        self.upstream.propagate(solution, event, &mut input);
        self.apply(input, out);
    }

    fn reset(&mut self) {
        self.upstream.reset();
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.upstream.listens_to(class)
    }
}
