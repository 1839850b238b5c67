//! Source node: one per entity or fact collection.

use std::marker::PhantomData;

use super::{Delta, SourceClass, SourceEvent, TupleNode};

/// Reads a collection from the solution and emits one tuple per element.
///
/// The element index is the tuple id. Elements are cloned into the graph so
/// downstream nodes can compare old and new contents.
pub struct SourceNode<S, E, F> {
    class: SourceClass,
    extractor: F,
    _phantom: PhantomData<fn(&S) -> E>,
}

impl<S, E, F> SourceNode<S, E, F>
where
    F: Fn(&S) -> &[E],
{
    pub fn new(class: SourceClass, extractor: F) -> Self {
        Self {
            class,
            extractor,
            _phantom: PhantomData,
        }
    }

    pub fn class(&self) -> SourceClass {
        self.class
    }
}

impl<S, E, F: Clone> Clone for SourceNode<S, E, F> {
    fn clone(&self) -> Self {
        Self {
            class: self.class,
            extractor: self.extractor.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<S, E, F> TupleNode<S> for SourceNode<S, E, F>
where
    E: Clone + Send + Sync + 'static,
    F: Fn(&S) -> &[E] + Clone + Send + Sync,
{
    type Tuple = E;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<E>>) {
        let items = (self.extractor)(solution);
        out.extend(
            items
                .iter()
                .enumerate()
                .map(|(i, e)| Delta::Insert(i as u64, e.clone())),
        );
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<E>>) {
        if event.class() != self.class {
            return;
        }
        let index = event.index();
        let id = index as u64;
        match event {
            SourceEvent::Retract { .. } => out.push(Delta::Retract(id)),
            SourceEvent::Insert { .. } => {
                if let Some(e) = (self.extractor)(solution).get(index) {
                    out.push(Delta::Insert(id, e.clone()));
                }
            }
            SourceEvent::Update { .. } => {
                if let Some(e) = (self.extractor)(solution).get(index) {
                    out.push(Delta::Update(id, e.clone()));
                }
            }
        }
    }

    fn reset(&mut self) {}

    fn listens_to(&self, class: SourceClass) -> bool {
        class == self.class
    }
}
