//! Constraint stream over single tuples.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use stratum_core::score::Score;
use stratum_core::ImpactType;

use super::bi_stream::BiConstraintStream;
use super::builder::ConstraintBuilder;
use super::collector::{count, CountCollector, UniCollector};
use super::factory::IntoUniNode;
use super::joiner::Joiner;
use super::tuple::{
    identity, key_alone, key_only, keyed, pair, result_only, unit_fill, unit_key, unit_weight,
};
use crate::graph::{
    ComplementNode, ExistsNode, FilterNode, FlattenNode, FlattenUni, GroupByNode, JoinNode, MapNode,
    SourceNode, TupleNode,
};

/// A stream of single tuples.
///
/// Every operation wraps the current node in a new graph node, so the final
/// constraint type spells out the whole pipeline and nothing is boxed.
///
/// # Example
///
/// ```
/// use stratum_core::score::SimpleScore;
/// use stratum_scoring::stream::{entities, ConstraintFactory};
/// use stratum_scoring::IncrementalConstraint;
///
/// #[derive(Clone, Debug)]
/// struct Task { worker: Option<usize> }
/// struct Plan { tasks: Vec<Task> }
///
/// let factory = ConstraintFactory::<Plan, SimpleScore>::new();
/// let mut unassigned = factory
///     .for_each(entities(0, |p: &Plan| p.tasks.as_slice()))
///     .filter(|t: &Task| t.worker.is_none())
///     .penalize(SimpleScore::of(1))
///     .as_constraint("Unassigned task");
///
/// let plan = Plan { tasks: vec![Task { worker: None }, Task { worker: Some(0) }] };
/// assert_eq!(unassigned.initialize(&plan), SimpleScore::of(-1));
/// ```
pub struct UniConstraintStream<S, Sc, N> {
    node: N,
    _phantom: PhantomData<fn(&S) -> Sc>,
}

impl<S, Sc, N> UniConstraintStream<S, Sc, N> {
    pub(crate) fn new(node: N) -> Self {
        Self {
            node,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn into_inner(self) -> N {
        self.node
    }
}

impl<S, Sc, N, A> UniConstraintStream<S, Sc, N>
where
    Sc: Score,
    N: TupleNode<S, Tuple = A>,
    A: Clone + Send + Sync + 'static,
{
    /// Keeps the tuples that satisfy `predicate`.
    pub fn filter<P>(self, predicate: P) -> UniConstraintStream<S, Sc, FilterNode<N, P>>
    where
        P: Fn(&A) -> bool + Clone + Send + Sync,
    {
        UniConstraintStream::new(FilterNode::new(self.node, predicate))
    }

    /// Pairs every tuple with every right tuple that satisfies `joiner`.
    pub fn join<R, J>(
        self,
        other: R,
        joiner: J,
    ) -> BiConstraintStream<S, Sc, JoinNode<N, R::Node, J, A, R::Tuple, J::Key, (A, R::Tuple)>>
    where
        R: IntoUniNode<S>,
        J: Joiner<A, R::Tuple>,
    {
        let node = JoinNode::new(self.node, other.into_node(), joiner, pair::<A, R::Tuple>);
        BiConstraintStream::new(node)
    }

    /// Keeps the tuples for which at least one right tuple satisfies `joiner`.
    pub fn if_exists<R, J>(
        self,
        other: R,
        joiner: J,
    ) -> UniConstraintStream<S, Sc, ExistsNode<N, R::Node, J, A, R::Tuple, J::Key>>
    where
        R: IntoUniNode<S>,
        J: Joiner<A, R::Tuple>,
    {
        UniConstraintStream::new(ExistsNode::new(self.node, other.into_node(), joiner, true))
    }

    /// Keeps the tuples for which no right tuple satisfies `joiner`.
    pub fn if_not_exists<R, J>(
        self,
        other: R,
        joiner: J,
    ) -> UniConstraintStream<S, Sc, ExistsNode<N, R::Node, J, A, R::Tuple, J::Key>>
    where
        R: IntoUniNode<S>,
        J: Joiner<A, R::Tuple>,
    {
        UniConstraintStream::new(ExistsNode::new(self.node, other.into_node(), joiner, false))
    }

    /// Groups by `key_fn` and emits `(key, collected)` per non-empty group.
    pub fn group_by<K, KF, C>(
        self,
        key_fn: KF,
        collector: C,
    ) -> BiConstraintStream<S, Sc, GroupByNode<N, A, KF, C, K, (K, C::Result)>>
    where
        K: Clone + Eq + Hash + Send + Sync + 'static,
        KF: Fn(&A) -> K + Clone + Send + Sync,
        C: UniCollector<A>,
    {
        let node = GroupByNode::new(self.node, key_fn, collector, keyed::<K, C::Result>);
        BiConstraintStream::new(node)
    }

    /// Emits each distinct key once.
    pub fn group_by_key<K, KF>(
        self,
        key_fn: KF,
    ) -> UniConstraintStream<S, Sc, GroupByNode<N, A, KF, CountCollector<A>, K, K>>
    where
        K: Clone + Eq + Hash + Send + Sync + 'static,
        KF: Fn(&A) -> K + Clone + Send + Sync,
    {
        let node = GroupByNode::new(self.node, key_fn, count(), key_only::<K, usize>);
        UniConstraintStream::new(node)
    }

    /// Folds the whole stream into one tuple. An empty stream has no tuple.
    pub fn collect<C>(
        self,
        collector: C,
    ) -> UniConstraintStream<S, Sc, GroupByNode<N, A, fn(&A), C, (), C::Result>>
    where
        C: UniCollector<A>,
    {
        let node = GroupByNode::new(
            self.node,
            unit_key::<A> as fn(&A),
            collector,
            result_only::<C::Result>,
        );
        UniConstraintStream::new(node)
    }

    pub fn map<B, F>(self, mapper: F) -> UniConstraintStream<S, Sc, MapNode<N, F>>
    where
        F: Fn(&A) -> B + Clone + Send + Sync,
        B: Clone + Send + Sync + 'static,
    {
        UniConstraintStream::new(MapNode::new(self.node, mapper))
    }

    /// Replaces each tuple with the items of `expander(tuple)`.
    pub fn flatten<B, I, F>(
        self,
        expander: F,
    ) -> UniConstraintStream<S, Sc, FlattenNode<N, FlattenUni<F>>>
    where
        F: Fn(&A) -> I + Clone + Send + Sync,
        I: IntoIterator<Item = B>,
        B: Clone + Send + Sync + 'static,
    {
        UniConstraintStream::new(FlattenNode::new(self.node, FlattenUni(expander)))
    }

    /// Adds the key of every `source` element that no tuple of this stream
    /// carries. Used after `group_by_key` to recover the empty groups.
    #[allow(clippy::type_complexity)]
    pub fn complement<E, F, KF>(
        self,
        source: SourceNode<S, E, F>,
        key_fn: KF,
    ) -> UniConstraintStream<S, Sc, ComplementNode<N, SourceNode<S, E, F>, A, A, (), KF, fn(&E)>>
    where
        A: Eq + Hash,
        E: Clone + Send + Sync + 'static,
        F: Fn(&S) -> &[E] + Clone + Send + Sync,
        KF: Fn(&E) -> A + Clone + Send + Sync,
    {
        let node = ComplementNode::new(
            self.node,
            source,
            identity::<A>,
            key_fn,
            unit_fill::<E> as fn(&E),
            key_alone::<A>,
        );
        UniConstraintStream::new(node)
    }

    /// Subtracts `weight` per tuple.
    pub fn penalize(self, weight: Sc) -> ConstraintBuilder<S, Sc, N, fn(&A) -> i64>
    where
        A: Debug,
    {
        let weigher = unit_weight::<A> as fn(&A) -> i64;
        ConstraintBuilder::new(self.node, ImpactType::Penalty, weight, weigher)
    }

    /// Subtracts `weight * weigher(tuple)` per tuple.
    pub fn penalize_with<W>(self, weight: Sc, weigher: W) -> ConstraintBuilder<S, Sc, N, W>
    where
        A: Debug,
        W: Fn(&A) -> i64 + Clone + Send + Sync,
    {
        ConstraintBuilder::new(self.node, ImpactType::Penalty, weight, weigher)
    }

    /// Adds `weight` per tuple.
    pub fn reward(self, weight: Sc) -> ConstraintBuilder<S, Sc, N, fn(&A) -> i64>
    where
        A: Debug,
    {
        let weigher = unit_weight::<A> as fn(&A) -> i64;
        ConstraintBuilder::new(self.node, ImpactType::Reward, weight, weigher)
    }

    /// Adds `weight * weigher(tuple)` per tuple.
    pub fn reward_with<W>(self, weight: Sc, weigher: W) -> ConstraintBuilder<S, Sc, N, W>
    where
        A: Debug,
        W: Fn(&A) -> i64 + Clone + Send + Sync,
    {
        ConstraintBuilder::new(self.node, ImpactType::Reward, weight, weigher)
    }
}
