//! Constraint sets for incremental scoring.
//!
//! `ConstraintSet` is implemented for tuples of concrete constraints, so the
//! common case is fully monomorphized, and for `Vec<Box<dyn ...>>` when the
//! constraint list is assembled at runtime.

use stratum_core::score::Score;
use stratum_core::ConstraintRef;

use crate::api::analysis::{ConstraintAnalysis, ConstraintMatch};
use crate::graph::{SourceClass, SourceEvent};

/// A compiled constraint holding its running score.
///
/// # Incremental protocol
///
/// 1. `initialize` populates the graph from the solution and returns the
///    constraint's total score.
/// 2. Every elementary change to the solution is reported through `on_event`
///    after the change has been made; the return value is the score delta.
/// 3. `score()` is the sum of the live matches at every quiescent point.
/// 4. `reset` drops all state; `initialize` must run again before the next
///    event.
pub trait IncrementalConstraint<S, Sc: Score>: Send + Sync {
    fn initialize(&mut self, solution: &S) -> Sc;

    fn on_event(&mut self, solution: &S, event: &SourceEvent) -> Sc;

    /// Current total impact of this constraint.
    fn score(&self) -> Sc;

    fn match_count(&self) -> usize;

    fn reset(&mut self);

    fn constraint_ref(&self) -> &ConstraintRef;

    fn name(&self) -> &str {
        &self.constraint_ref().name
    }

    /// True if the weight has a non-zero hard level.
    fn is_hard(&self) -> bool;

    fn weight(&self) -> Sc;

    /// Live matches with their justifications.
    fn matches(&self) -> Vec<ConstraintMatch<Sc>>;

    /// True when events on `class` can change this constraint's score.
    fn listens_to(&self, class: SourceClass) -> bool;

    fn boxed_clone(&self) -> Box<dyn IncrementalConstraint<S, Sc>>;
}

impl<S, Sc: Score> Clone for Box<dyn IncrementalConstraint<S, Sc>> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Result of evaluating a single constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintResult<Sc> {
    pub name: String,
    pub score: Sc,
    pub match_count: usize,
    pub is_hard: bool,
}

/// A set of constraints that are evaluated together.
///
/// Cloning a set clones the incremental state of every constraint, which is
/// how score directors fork.
///
/// # Example
///
/// ```
/// use stratum_core::score::SimpleScore;
/// use stratum_scoring::stream::{entities, ConstraintFactory};
/// use stratum_scoring::ConstraintSet;
///
/// struct Plan { loads: Vec<i64> }
///
/// let factory = ConstraintFactory::<Plan, SimpleScore>::new();
/// let overloaded = factory
///     .for_each(entities(0, |p: &Plan| p.loads.as_slice()))
///     .filter(|load: &i64| *load > 10)
///     .penalize(SimpleScore::of(1))
///     .as_constraint("Overloaded");
/// let idle = factory
///     .for_each(entities(0, |p: &Plan| p.loads.as_slice()))
///     .filter(|load: &i64| *load == 0)
///     .penalize(SimpleScore::of(2))
///     .as_constraint("Idle");
///
/// let mut set = (overloaded, idle);
/// assert_eq!(set.initialize_all(&Plan { loads: vec![12, 0, 5] }), SimpleScore::of(-3));
/// let names: Vec<String> = set.evaluate_each().into_iter().map(|r| r.name).collect();
/// assert_eq!(names, vec!["Overloaded", "Idle"]);
/// ```
pub trait ConstraintSet<S, Sc: Score>: Clone + Send + Sync {
    /// Initializes every constraint and returns the total score.
    fn initialize_all(&mut self, solution: &S) -> Sc;

    /// Propagates one event through every listening constraint.
    ///
    /// Returns the summed score delta.
    fn on_event_all(&mut self, solution: &S, event: &SourceEvent) -> Sc;

    fn score(&self) -> Sc;

    fn reset_all(&mut self);

    fn constraint_count(&self) -> usize;

    /// Per-constraint results read from the incremental state.
    fn evaluate_each(&self) -> Vec<ConstraintResult<Sc>>;

    /// Per-constraint analysis including every live match.
    fn analyze(&self) -> Vec<ConstraintAnalysis<Sc>>;
}

fn result_of<S, Sc: Score, C: IncrementalConstraint<S, Sc> + ?Sized>(
    c: &C,
) -> ConstraintResult<Sc> {
    ConstraintResult {
        name: c.name().to_string(),
        score: c.score(),
        match_count: c.match_count(),
        is_hard: c.is_hard(),
    }
}

fn analysis_of<S, Sc: Score, C: IncrementalConstraint<S, Sc> + ?Sized>(
    c: &C,
) -> ConstraintAnalysis<Sc> {
    ConstraintAnalysis::new(
        c.constraint_ref().clone(),
        c.weight(),
        c.score(),
        c.matches(),
        c.is_hard(),
    )
}

impl<S, Sc: Score> ConstraintSet<S, Sc> for () {
    #[inline]
    fn initialize_all(&mut self, _solution: &S) -> Sc {
        Sc::zero()
    }

    #[inline]
    fn on_event_all(&mut self, _solution: &S, _event: &SourceEvent) -> Sc {
        Sc::zero()
    }

    #[inline]
    fn score(&self) -> Sc {
        Sc::zero()
    }

    #[inline]
    fn reset_all(&mut self) {}

    #[inline]
    fn constraint_count(&self) -> usize {
        0
    }

    fn evaluate_each(&self) -> Vec<ConstraintResult<Sc>> {
        Vec::new()
    }

    fn analyze(&self) -> Vec<ConstraintAnalysis<Sc>> {
        Vec::new()
    }
}

macro_rules! impl_constraint_set_for_tuple {
    ($($idx:tt: $T:ident),+) => {
        impl<S, Sc, $($T),+> ConstraintSet<S, Sc> for ($($T,)+)
        where
            Sc: Score,
            $($T: IncrementalConstraint<S, Sc> + Clone,)+
        {
            #[inline]
            fn initialize_all(&mut self, solution: &S) -> Sc {
                let mut total = Sc::zero();
                $(total = total + self.$idx.initialize(solution);)+
                total
            }

            #[inline]
            fn on_event_all(&mut self, solution: &S, event: &SourceEvent) -> Sc {
                let class = event.class();
                let mut total = Sc::zero();
                $(
                    if self.$idx.listens_to(class) {
                        total = total + self.$idx.on_event(solution, event);
                    }
                )+
                total
            }

            #[inline]
            fn score(&self) -> Sc {
                let mut total = Sc::zero();
                $(total = total + self.$idx.score();)+
                total
            }

            #[inline]
            fn reset_all(&mut self) {
                $(self.$idx.reset();)+
            }

            #[inline]
            fn constraint_count(&self) -> usize {
                [$(stringify!($T)),+].len()
            }

            fn evaluate_each(&self) -> Vec<ConstraintResult<Sc>> {
                vec![$(result_of(&self.$idx)),+]
            }

            fn analyze(&self) -> Vec<ConstraintAnalysis<Sc>> {
                vec![$(analysis_of(&self.$idx)),+]
            }
        }
    };
}

impl_constraint_set_for_tuple!(0: C0);
impl_constraint_set_for_tuple!(0: C0, 1: C1);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8);
impl_constraint_set_for_tuple!(
    0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9
);
impl_constraint_set_for_tuple!(
    0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10
);
impl_constraint_set_for_tuple!(
    0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10, 11: C11
);

// Runtime-assembled constraint lists.
impl<S, Sc: Score> ConstraintSet<S, Sc> for Vec<Box<dyn IncrementalConstraint<S, Sc>>> {
    fn initialize_all(&mut self, solution: &S) -> Sc {
        self.iter_mut()
            .fold(Sc::zero(), |total, c| total + c.initialize(solution))
    }

    fn on_event_all(&mut self, solution: &S, event: &SourceEvent) -> Sc {
        let class = event.class();
        self.iter_mut()
            .filter(|c| c.listens_to(class))
            .fold(Sc::zero(), |total, c| total + c.on_event(solution, event))
    }

    fn score(&self) -> Sc {
        self.iter().fold(Sc::zero(), |total, c| total + c.score())
    }

    fn reset_all(&mut self) {
        for c in self.iter_mut() {
            c.reset();
        }
    }

    fn constraint_count(&self) -> usize {
        self.len()
    }

    fn evaluate_each(&self) -> Vec<ConstraintResult<Sc>> {
        self.iter().map(|c| result_of(c.as_ref())).collect()
    }

    fn analyze(&self) -> Vec<ConstraintAnalysis<Sc>> {
        self.iter().map(|c| analysis_of(c.as_ref())).collect()
    }
}
