//! Entry points of the constraint stream API.

use std::marker::PhantomData;

use stratum_core::score::Score;

use super::joiner::Joiner;
use super::tuple::pair;
use super::uni_stream::UniConstraintStream;
use super::bi_stream::BiConstraintStream;
use crate::graph::{JoinNode, SourceClass, SourceNode, TupleNode};

/// Source over the entity collection with descriptor index `descriptor_index`.
///
/// # Example
///
/// ```
/// use stratum_scoring::stream::entities;
///
/// struct Schedule { shifts: Vec<u32> }
///
/// let shifts = entities(0, |s: &Schedule| s.shifts.as_slice());
/// ```
pub fn entities<S, E, F>(descriptor_index: usize, extractor: F) -> SourceNode<S, E, F>
where
    F: Fn(&S) -> &[E],
{
    SourceNode::new(SourceClass::Entity(descriptor_index), extractor)
}

/// Source over the problem fact collection with descriptor index `descriptor_index`.
pub fn facts<S, E, F>(descriptor_index: usize, extractor: F) -> SourceNode<S, E, F>
where
    F: Fn(&S) -> &[E],
{
    SourceNode::new(SourceClass::Fact(descriptor_index), extractor)
}

/// Anything that can be the right-hand side of a join or existence check: a
/// bare source, or a uni stream built from one.
pub trait IntoUniNode<S> {
    type Tuple: Clone + Send + Sync + 'static;
    type Node: TupleNode<S, Tuple = Self::Tuple>;

    fn into_node(self) -> Self::Node;
}

impl<S, E, F> IntoUniNode<S> for SourceNode<S, E, F>
where
    E: Clone + Send + Sync + 'static,
    F: Fn(&S) -> &[E] + Clone + Send + Sync,
{
    type Tuple = E;
    type Node = Self;

    fn into_node(self) -> Self {
        self
    }
}

impl<S, Sc, N> IntoUniNode<S> for UniConstraintStream<S, Sc, N>
where
    N: TupleNode<S>,
{
    type Tuple = N::Tuple;
    type Node = N;

    fn into_node(self) -> N {
        self.into_inner()
    }
}

/// Creates constraint streams for one solution and score type.
pub struct ConstraintFactory<S, Sc> {
    _phantom: PhantomData<fn(&S) -> Sc>,
}

impl<S, Sc: Score> ConstraintFactory<S, Sc> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    /// Starts a stream with one tuple per element of `source`.
    pub fn for_each<E, F>(
        &self,
        source: SourceNode<S, E, F>,
    ) -> UniConstraintStream<S, Sc, SourceNode<S, E, F>>
    where
        E: Clone + Send + Sync + 'static,
        F: Fn(&S) -> &[E] + Clone + Send + Sync,
    {
        UniConstraintStream::new(source)
    }

    /// Starts a stream of every unordered pair `(a, b)` of distinct elements
    /// of `source` that satisfy `joiner`. `a` precedes `b` in the collection.
    pub fn for_each_unique_pair<E, F, J>(
        &self,
        source: SourceNode<S, E, F>,
        joiner: J,
    ) -> BiConstraintStream<
        S,
        Sc,
        JoinNode<SourceNode<S, E, F>, SourceNode<S, E, F>, J, E, E, J::Key, (E, E)>,
    >
    where
        E: Clone + Send + Sync + 'static,
        F: Fn(&S) -> &[E] + Clone + Send + Sync,
        J: Joiner<E, E>,
    {
        let node = JoinNode::new(source.clone(), source, joiner, pair::<E, E>).unique_pairs();
        BiConstraintStream::new(node)
    }
}

impl<S, Sc: Score> Default for ConstraintFactory<S, Sc> {
    fn default() -> Self {
        Self::new()
    }
}
