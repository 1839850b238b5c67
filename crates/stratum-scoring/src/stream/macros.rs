//! Macros for the multi-element streams.
//!
//! Bi and tri streams share every operation except the ones that change the
//! arity, and differ only in how a user closure taking `(&A, &B, ..)` is
//! adapted to a closure over the tuple. The macro generates the struct and
//! those shared operations; arity-changing operations are written out in
//! the individual stream files.

macro_rules! impl_tuple_stream {
    (
        $(#[$meta:meta])*
        $stream:ident, ($($T:ident),+), ($($idx:tt),+)
    ) => {
        $(#[$meta])*
        pub struct $stream<S, Sc, N> {
            node: N,
            _phantom: std::marker::PhantomData<fn(&S) -> Sc>,
        }

        impl<S, Sc, N> $stream<S, Sc, N> {
            pub(crate) fn new(node: N) -> Self {
                Self {
                    node,
                    _phantom: std::marker::PhantomData,
                }
            }
        }

        impl<S, Sc, N, $($T),+> $stream<S, Sc, N>
        where
            Sc: stratum_core::score::Score,
            N: $crate::graph::TupleNode<S, Tuple = ($($T,)+)>,
            $($T: Clone + Send + Sync + 'static,)+
        {
            /// Keeps the tuples that satisfy `predicate`.
            pub fn filter<P>(
                self,
                predicate: P,
            ) -> $stream<
                S,
                Sc,
                $crate::graph::FilterNode<N, impl Fn(&($($T,)+)) -> bool + Clone + Send + Sync>,
            >
            where
                P: Fn($(&$T),+) -> bool + Clone + Send + Sync,
            {
                let adapted = move |t: &($($T,)+)| predicate($(&t.$idx),+);
                $stream::new($crate::graph::FilterNode::new(self.node, adapted))
            }

            /// Keeps the tuples for which at least one right tuple satisfies `joiner`.
            #[allow(clippy::type_complexity)]
            pub fn if_exists<R, J>(
                self,
                other: R,
                joiner: J,
            ) -> $stream<
                S,
                Sc,
                $crate::graph::ExistsNode<N, R::Node, J, ($($T,)+), R::Tuple, J::Key>,
            >
            where
                R: $crate::stream::IntoUniNode<S>,
                J: $crate::stream::joiner::Joiner<($($T,)+), R::Tuple>,
            {
                let node =
                    $crate::graph::ExistsNode::new(self.node, other.into_node(), joiner, true);
                $stream::new(node)
            }

            /// Keeps the tuples for which no right tuple satisfies `joiner`.
            #[allow(clippy::type_complexity)]
            pub fn if_not_exists<R, J>(
                self,
                other: R,
                joiner: J,
            ) -> $stream<
                S,
                Sc,
                $crate::graph::ExistsNode<N, R::Node, J, ($($T,)+), R::Tuple, J::Key>,
            >
            where
                R: $crate::stream::IntoUniNode<S>,
                J: $crate::stream::joiner::Joiner<($($T,)+), R::Tuple>,
            {
                let node =
                    $crate::graph::ExistsNode::new(self.node, other.into_node(), joiner, false);
                $stream::new(node)
            }

            /// Groups by `key_fn` and emits `(key, collected)` per non-empty group.
            #[allow(clippy::type_complexity)]
            pub fn group_by<K, KF, Col>(
                self,
                key_fn: KF,
                collector: Col,
            ) -> $crate::stream::BiConstraintStream<
                S,
                Sc,
                $crate::graph::GroupByNode<
                    N,
                    ($($T,)+),
                    impl Fn(&($($T,)+)) -> K + Clone + Send + Sync,
                    Col,
                    K,
                    (K, Col::Result),
                >,
            >
            where
                K: Clone + Eq + std::hash::Hash + Send + Sync + 'static,
                KF: Fn($(&$T),+) -> K + Clone + Send + Sync,
                Col: $crate::stream::collector::UniCollector<($($T,)+)>,
            {
                let adapted = move |t: &($($T,)+)| key_fn($(&t.$idx),+);
                let node = $crate::graph::GroupByNode::new(
                    self.node,
                    adapted,
                    collector,
                    $crate::stream::tuple::keyed::<K, Col::Result>,
                );
                $crate::stream::BiConstraintStream::new(node)
            }

            /// Emits each distinct key once.
            #[allow(clippy::type_complexity)]
            pub fn group_by_key<K, KF>(
                self,
                key_fn: KF,
            ) -> $crate::stream::UniConstraintStream<
                S,
                Sc,
                $crate::graph::GroupByNode<
                    N,
                    ($($T,)+),
                    impl Fn(&($($T,)+)) -> K + Clone + Send + Sync,
                    $crate::stream::collector::CountCollector<($($T,)+)>,
                    K,
                    K,
                >,
            >
            where
                K: Clone + Eq + std::hash::Hash + Send + Sync + 'static,
                KF: Fn($(&$T),+) -> K + Clone + Send + Sync,
            {
                let adapted = move |t: &($($T,)+)| key_fn($(&t.$idx),+);
                let node = $crate::graph::GroupByNode::new(
                    self.node,
                    adapted,
                    $crate::stream::collector::count(),
                    $crate::stream::tuple::key_only::<K, usize>,
                );
                $crate::stream::UniConstraintStream::new(node)
            }

            /// Folds the whole stream into one tuple. An empty stream has no tuple.
            #[allow(clippy::type_complexity)]
            pub fn collect<Col>(
                self,
                collector: Col,
            ) -> $crate::stream::UniConstraintStream<
                S,
                Sc,
                $crate::graph::GroupByNode<N, ($($T,)+), fn(&($($T,)+)), Col, (), Col::Result>,
            >
            where
                Col: $crate::stream::collector::UniCollector<($($T,)+)>,
            {
                let node = $crate::graph::GroupByNode::new(
                    self.node,
                    $crate::stream::tuple::unit_key::<($($T,)+)> as fn(&($($T,)+)),
                    collector,
                    $crate::stream::tuple::result_only::<Col::Result>,
                );
                $crate::stream::UniConstraintStream::new(node)
            }

            /// Maps every tuple to a single value.
            #[allow(clippy::type_complexity)]
            pub fn map<O, F>(
                self,
                mapper: F,
            ) -> $crate::stream::UniConstraintStream<
                S,
                Sc,
                $crate::graph::MapNode<N, impl Fn(&($($T,)+)) -> O + Clone + Send + Sync>,
            >
            where
                F: Fn($(&$T),+) -> O + Clone + Send + Sync,
                O: Clone + Send + Sync + 'static,
            {
                let adapted = move |t: &($($T,)+)| mapper($(&t.$idx),+);
                let node = $crate::graph::MapNode::new(self.node, adapted);
                $crate::stream::UniConstraintStream::new(node)
            }

            /// Subtracts `weight` per tuple.
            pub fn penalize(
                self,
                weight: Sc,
            ) -> $crate::stream::ConstraintBuilder<S, Sc, N, fn(&($($T,)+)) -> i64>
            where
                ($($T,)+): std::fmt::Debug,
            {
                $crate::stream::ConstraintBuilder::new(
                    self.node,
                    stratum_core::ImpactType::Penalty,
                    weight,
                    $crate::stream::tuple::unit_weight::<($($T,)+)> as fn(&($($T,)+)) -> i64,
                )
            }

            /// Subtracts `weight * weigher(..)` per tuple.
            pub fn penalize_with<W>(
                self,
                weight: Sc,
                weigher: W,
            ) -> $crate::stream::ConstraintBuilder<
                S,
                Sc,
                N,
                impl Fn(&($($T,)+)) -> i64 + Clone + Send + Sync,
            >
            where
                ($($T,)+): std::fmt::Debug,
                W: Fn($(&$T),+) -> i64 + Clone + Send + Sync,
            {
                let adapted = move |t: &($($T,)+)| weigher($(&t.$idx),+);
                $crate::stream::ConstraintBuilder::new(
                    self.node,
                    stratum_core::ImpactType::Penalty,
                    weight,
                    adapted,
                )
            }

            /// Adds `weight` per tuple.
            pub fn reward(
                self,
                weight: Sc,
            ) -> $crate::stream::ConstraintBuilder<S, Sc, N, fn(&($($T,)+)) -> i64>
            where
                ($($T,)+): std::fmt::Debug,
            {
                $crate::stream::ConstraintBuilder::new(
                    self.node,
                    stratum_core::ImpactType::Reward,
                    weight,
                    $crate::stream::tuple::unit_weight::<($($T,)+)> as fn(&($($T,)+)) -> i64,
                )
            }

            /// Adds `weight * weigher(..)` per tuple.
            pub fn reward_with<W>(
                self,
                weight: Sc,
                weigher: W,
            ) -> $crate::stream::ConstraintBuilder<
                S,
                Sc,
                N,
                impl Fn(&($($T,)+)) -> i64 + Clone + Send + Sync,
            >
            where
                ($($T,)+): std::fmt::Debug,
                W: Fn($(&$T),+) -> i64 + Clone + Send + Sync,
            {
                let adapted = move |t: &($($T,)+)| weigher($(&t.$idx),+);
                $crate::stream::ConstraintBuilder::new(
                    self.node,
                    stratum_core::ImpactType::Reward,
                    weight,
                    adapted,
                )
            }
        }
    };
}
