//! Closed move unions.
//!
//! Union selectors and config-built phases need one concrete move type per
//! variable kind. These enums dispatch statically to the wrapped move.

use std::fmt::Debug;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::{
    ChangeMove, ListAssignMove, ListChangeMove, ListReverseMove, ListSwapMove, Move, MoveSignature,
    SubListChangeMove, SwapMove,
};
use crate::heuristic::variable::PlanningValue;

macro_rules! move_union {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($ty:ident)),+ $(,)? }) => {
        $(#[$meta])*
        pub enum $name<S, V> {
            $($variant($ty<S, V>)),+
        }

        impl<S, V> Clone for $name<S, V>
        where
            V: Clone,
        {
            fn clone(&self) -> Self {
                match self {
                    $($name::$variant(m) => $name::$variant(m.clone())),+
                }
            }
        }

        impl<S, V> Debug for $name<S, V>
        where
            V: Debug,
        {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant(m) => m.fmt(f)),+
                }
            }
        }

        $(
            impl<S, V> From<$ty<S, V>> for $name<S, V> {
                fn from(m: $ty<S, V>) -> Self {
                    $name::$variant(m)
                }
            }
        )+

        impl<S, V> Move<S> for $name<S, V>
        where
            S: PlanningSolution,
            V: PlanningValue,
        {
            fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
                match self {
                    $($name::$variant(m) => m.is_doable(score_director)),+
                }
            }

            fn do_move(
                &self,
                score_director: &mut dyn ScoreDirector<S>,
            ) -> Result<(), MoveApplicationError> {
                match self {
                    $($name::$variant(m) => m.do_move(score_director)),+
                }
            }

            fn descriptor_index(&self) -> usize {
                match self {
                    $($name::$variant(m) => m.descriptor_index()),+
                }
            }

            fn entity_indices(&self) -> &[usize] {
                match self {
                    $($name::$variant(m) => m.entity_indices()),+
                }
            }

            fn variable_name(&self) -> &str {
                match self {
                    $($name::$variant(m) => m.variable_name()),+
                }
            }

            fn signature(&self, score_director: &dyn ScoreDirector<S>) -> MoveSignature {
                match self {
                    $($name::$variant(m) => m.signature(score_director)),+
                }
            }
        }
    };
}

move_union! {
    /// A change or swap on a basic variable.
    BasicMove {
        Change(ChangeMove),
        Swap(SwapMove),
    }
}

move_union! {
    /// Any move on a list variable.
    ListMove {
        Change(ListChangeMove),
        Swap(ListSwapMove),
        Reverse(ListReverseMove),
        SubListChange(SubListChangeMove),
        Assign(ListAssignMove),
    }
}
