//! Incremental constraint graph.
//!
//! A constraint is compiled into a tree of typed nodes. Each node owns its
//! upstream node(s), so the tree is rooted at the terminal node and its leaves
//! are [`SourceNode`]s reading entity or fact collections from the solution.
//!
//! A change to the solution enters as a [`SourceEvent`]. The terminal node
//! pulls the event through its upstream nodes; every node turns the deltas it
//! receives into deltas on its own tuples and hands them downstream. Work is
//! proportional to the number of tuples the change touches.
//!
//! Tuple ids are unique per node. Source nodes use the collection index as the
//! id; every other node assigns its own ids.

mod complement;
mod exists;
mod filter;
mod flatten;
mod group;
mod index;
mod join;
mod map;
mod source;
mod terminal;


pub use complement::ComplementNode;
pub use exists::ExistsNode;
pub use filter::FilterNode;
pub use flatten::{Expander, FlattenLast, FlattenNode, FlattenUni};
pub use group::GroupByNode;
pub use index::{JoinIndex, Side};
pub use join::JoinNode;
pub use map::MapNode;
pub use source::SourceNode;
pub use terminal::TerminalNode;

/// Identifier of a tuple within one node.
pub type TupleId = u64;

/// A change to the tuple set of one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta<T> {
    Insert(TupleId, T),
    /// The tuple with this id still exists but its contents changed.
    Update(TupleId, T),
    Retract(TupleId),
}

impl<T> Delta<T> {
    pub fn id(&self) -> TupleId {
        match self {
            Delta::Insert(id, _) | Delta::Update(id, _) | Delta::Retract(id) => *id,
        }
    }
}

/// A collection on the solution that feeds source nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceClass {
    /// Planning entity collection, by entity descriptor index.
    Entity(usize),
    /// Problem fact collection, by fact descriptor index.
    Fact(usize),
}

/// An elementary change to one element of a source collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEvent {
    Insert { class: SourceClass, index: usize },
    Update { class: SourceClass, index: usize },
    Retract { class: SourceClass, index: usize },
}

impl SourceEvent {
    pub fn class(&self) -> SourceClass {
        match self {
            SourceEvent::Insert { class, .. }
            | SourceEvent::Update { class, .. }
            | SourceEvent::Retract { class, .. } => *class,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SourceEvent::Insert { index, .. }
            | SourceEvent::Update { index, .. }
            | SourceEvent::Retract { index, .. } => *index,
        }
    }
}

/// A node of the constraint graph producing tuples of type `Self::Tuple`.
///
/// `initialize` and `propagate` append the node's output deltas to `out`;
/// callers own the buffer and clear it between uses.
pub trait TupleNode<S>: Clone + Send + Sync {
    type Tuple: Clone + Send + Sync + 'static;

    /// Emits an insert for every tuple derived from the current solution.
    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<Self::Tuple>>);

    /// Applies one source event and emits the resulting deltas.
    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<Self::Tuple>>);

    /// Drops all incremental state.
    fn reset(&mut self);

    /// Returns true when events for `class` can change this node's tuples.
    fn listens_to(&self, class: SourceClass) -> bool;
}

/// Allocates fresh tuple ids for a node.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdSequence {
    next: TupleId,
}

impl IdSequence {
    pub(crate) fn next(&mut self) -> TupleId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub(crate) fn reset(&mut self) {
        self.next = 0;
    }
}
