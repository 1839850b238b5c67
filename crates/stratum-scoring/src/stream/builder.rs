//! Final step of a stream: weight and name a constraint.

use std::fmt::Debug;
use std::marker::PhantomData;

use stratum_core::score::Score;
use stratum_core::{ConstraintRef, ImpactType};

use crate::graph::{TerminalNode, TupleNode};

/// A stream with its impact and weight decided, waiting for a name.
pub struct ConstraintBuilder<S, Sc, N, W> {
    node: N,
    impact: ImpactType,
    weight: Sc,
    weigher: W,
    _phantom: PhantomData<fn(&S)>,
}

impl<S, Sc, N, W> ConstraintBuilder<S, Sc, N, W>
where
    Sc: Score,
    N: TupleNode<S>,
    N::Tuple: Debug,
    W: Fn(&N::Tuple) -> i64 + Clone + Send + Sync,
{
    pub(crate) fn new(node: N, impact: ImpactType, weight: Sc, weigher: W) -> Self {
        Self {
            node,
            impact,
            weight,
            weigher,
            _phantom: PhantomData,
        }
    }

    /// Finalizes the constraint under `name`.
    pub fn as_constraint(self, name: &str) -> TerminalNode<N, W, N::Tuple, Sc> {
        self.as_constraint_in("", name)
    }

    /// Finalizes the constraint under `package/name`.
    ///
    /// ```
    /// use stratum_core::score::HardSoftScore;
    /// use stratum_scoring::stream::{entities, ConstraintFactory};
    /// use stratum_scoring::IncrementalConstraint;
    ///
    /// struct Plan { rooms: Vec<Option<u32>> }
    ///
    /// let unassigned = ConstraintFactory::<Plan, HardSoftScore>::new()
    ///     .for_each(entities(0, |p: &Plan| p.rooms.as_slice()))
    ///     .filter(|room: &Option<u32>| room.is_none())
    ///     .penalize(HardSoftScore::ONE_HARD)
    ///     .as_constraint_in("timetable", "Unassigned lesson");
    /// assert_eq!(unassigned.constraint_ref().package, "timetable");
    /// assert!(unassigned.is_hard());
    /// ```
    pub fn as_constraint_in(self, package: &str, name: &str) -> TerminalNode<N, W, N::Tuple, Sc> {
        TerminalNode::new(
            self.node,
            ConstraintRef::new(package, name),
            self.impact,
            self.weight,
            self.weigher,
        )
    }
}
