//! Terminal node: turns live tuples into weighted constraint matches.

use std::collections::HashMap;
use std::fmt::Debug;

use stratum_core::score::Score;
use stratum_core::{ConstraintRef, ImpactType};

use super::{Delta, SourceClass, SourceEvent, TupleId, TupleNode};
use crate::api::analysis::ConstraintMatch;
use crate::api::constraint_set::IncrementalConstraint;

/// Root of a compiled constraint.
///
/// Every live upstream tuple is a match with impact
/// `weight * sign * weigher(tuple)`. The node keeps each match's impact, so
/// a retract subtracts exactly what the insert added and `score()` always
/// equals the sum of the live matches.
#[derive(Clone)]
pub struct TerminalNode<N, W, T, Sc> {
    upstream: N,
    weigher: W,
    weight: Sc,
    impact: ImpactType,
    constraint_ref: ConstraintRef,
    is_hard: bool,
    matches: HashMap<TupleId, (T, Sc)>,
    total: Sc,
}

impl<N, W, T, Sc> TerminalNode<N, W, T, Sc>
where
    W: Fn(&T) -> i64,
    Sc: Score,
{
    pub fn new(
        upstream: N,
        constraint_ref: ConstraintRef,
        impact: ImpactType,
        weight: Sc,
        weigher: W,
    ) -> Self {
        Self {
            upstream,
            weigher,
            weight,
            impact,
            is_hard: weight.has_hard_impact(),
            constraint_ref,
            matches: HashMap::new(),
            total: Sc::zero(),
        }
    }

    pub fn impact_type(&self) -> ImpactType {
        self.impact
    }

    fn impact_of(&self, tuple: &T) -> Sc {
        self.weight.scale(self.impact.sign() * (self.weigher)(tuple))
    }

    fn apply(&mut self, deltas: Vec<Delta<T>>) -> Sc {
        let mut delta = Sc::zero();
        for d in deltas {
            match d {
                Delta::Insert(id, t) | Delta::Update(id, t) => {
                    let impact = self.impact_of(&t);
                    if let Some((_, old)) = self.matches.insert(id, (t, impact)) {
                        delta = delta - old;
                    }
                    delta = delta + impact;
                }
                Delta::Retract(id) => {
                    if let Some((_, old)) = self.matches.remove(&id) {
                        delta = delta - old;
                    }
                }
            }
        }
        self.total = self.total + delta;
        delta
    }
}

impl<S, N, W, T, Sc> IncrementalConstraint<S, Sc> for TerminalNode<N, W, T, Sc>
where
    S: 'static,
    N: TupleNode<S, Tuple = T> + 'static,
    W: Fn(&T) -> i64 + Clone + Send + Sync + 'static,
    T: Debug + Clone + Send + Sync + 'static,
    Sc: Score,
{
    fn initialize(&mut self, solution: &S) -> Sc {
        let mut out = Vec::new();
        self.upstream.initialize(solution, &mut out);
        self.apply(out);
        self.total
    }

    fn on_event(&mut self, solution: &S, event: &SourceEvent) -> Sc {
        let mut out = Vec::new();
        self.upstream.propagate(solution, event, &mut out);
        if out.is_empty() {
            return Sc::zero();
        }
        self.apply(out)
    }

    fn score(&self) -> Sc {
        self.total
    }

    fn match_count(&self) -> usize {
        self.matches.len()
    }

    fn reset(&mut self) {
        self.upstream.reset();
        self.matches.clear();
        self.total = Sc::zero();
    }

    fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    fn is_hard(&self) -> bool {
        self.is_hard
    }

    fn weight(&self) -> Sc {
        self.weight
    }

    fn matches(&self) -> Vec<ConstraintMatch<Sc>> {
        let mut ids: Vec<_> = self.matches.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.matches.get(&id))
            .map(|(t, impact)| ConstraintMatch::of(self.constraint_ref.clone(), *impact, t))
            .collect()
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.upstream.listens_to(class)
    }

    fn boxed_clone(&self) -> Box<dyn IncrementalConstraint<S, Sc>> {
        Box::new(self.clone())
    }
}
