// Constraint stream over pairs.

use std::hash::Hash;

use stratum_core::score::Score;

use super::factory::IntoUniNode;
use super::joiner::Joiner;
use super::tri_stream::TriConstraintStream;
use super::tuple::{append, first, key_and};
use crate::graph::{ComplementNode, FlattenLast, FlattenNode, JoinNode, SourceNode, TupleNode};

impl_tuple_stream!(
    /// A stream of `(A, B)` tuples, produced by a join, a unique-pair source
    /// or a `group_by`.
    ///
    /// Closures passed to `filter`, `map`, the weighers and the group keys
    /// take both elements as separate arguments.
    BiConstraintStream, (A, B), (0, 1)
);

impl<S, Sc, N, A, B> BiConstraintStream<S, Sc, N>
where
    Sc: Score,
    N: TupleNode<S, Tuple = (A, B)>,
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    /// Extends every pair with each right tuple that satisfies `joiner`.
    ///
    /// The joiner sees the pair as its left side.
    #[allow(clippy::type_complexity)]
    pub fn join<R, J>(
        self,
        other: R,
        joiner: J,
    ) -> TriConstraintStream<
        S,
        Sc,
        JoinNode<N, R::Node, J, (A, B), R::Tuple, J::Key, (A, B, R::Tuple)>,
    >
    where
        R: IntoUniNode<S>,
        J: Joiner<(A, B), R::Tuple>,
    {
        let node = JoinNode::new(self.node, other.into_node(), joiner, append::<A, B, R::Tuple>);
        TriConstraintStream::new(node)
    }

    /// Replaces `(a, b)` with `(a, c)` for every `c` in `expander(&b)`.
    pub fn flatten_last<C, I, F>(
        self,
        expander: F,
    ) -> BiConstraintStream<S, Sc, FlattenNode<N, FlattenLast<F>>>
    where
        F: Fn(&B) -> I + Clone + Send + Sync,
        I: IntoIterator<Item = C>,
        C: Clone + Send + Sync + 'static,
    {
        BiConstraintStream::new(FlattenNode::new(self.node, FlattenLast(expander)))
    }

    /// Adds `(key_fn(e), fill(e))` for every `source` element whose key no
    /// pair of this stream carries.
    ///
    /// Typically follows `group_by`: the added rows stand for the groups that
    /// would have been empty, e.g. employees with no shifts.
    #[allow(clippy::type_complexity)]
    pub fn complement<E, F, KF, DF>(
        self,
        source: SourceNode<S, E, F>,
        key_fn: KF,
        fill: DF,
    ) -> BiConstraintStream<S, Sc, ComplementNode<N, SourceNode<S, E, F>, (A, B), A, B, KF, DF>>
    where
        A: Eq + Hash,
        E: Clone + Send + Sync + 'static,
        F: Fn(&S) -> &[E] + Clone + Send + Sync,
        KF: Fn(&E) -> A + Clone + Send + Sync,
        DF: Fn(&E) -> B + Clone + Send + Sync,
    {
        let node = ComplementNode::new(
            self.node,
            source,
            first::<A, B>,
            key_fn,
            fill,
            key_and::<A, B>,
        );
        BiConstraintStream::new(node)
    }
}
