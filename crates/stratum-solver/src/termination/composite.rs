//! Composite termination conditions (AND/OR).
//!
//! Tuples of terminations keep their concrete types; a `Vec` of boxed
//! terminations covers combinations assembled from configuration.

use stratum_core::domain::PlanningSolution;

use super::Termination;
use crate::scope::Progress;

/// Combines multiple terminations with OR logic (any must terminate).
///
/// # Examples
///
/// ```
/// use stratum_solver::termination::{OrTermination, StepCountTermination, TimeTermination};
///
/// // Terminate after 30 seconds OR 1000 steps
/// let termination = OrTermination::new((
///     TimeTermination::seconds(30),
///     StepCountTermination::new(1000),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Combines multiple terminations with AND logic (all must terminate).
///
/// An empty `Vec` never terminates.
#[derive(Debug)]
pub struct AndTermination<T>(pub T);

impl<T> AndTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_composite_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<S, $($T),+> Termination<S> for OrTermination<($($T,)+)>
        where
            S: PlanningSolution,
            $($T: Termination<S>,)+
        {
            fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
                $((self.0).$idx.is_terminated(progress))||+
            }
        }

        impl<S, $($T),+> Termination<S> for AndTermination<($($T,)+)>
        where
            S: PlanningSolution,
            $($T: Termination<S>,)+
        {
            fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
                $((self.0).$idx.is_terminated(progress))&&+
            }
        }
    };
}

impl_composite_termination!(0: T0);
impl_composite_termination!(0: T0, 1: T1);
impl_composite_termination!(0: T0, 1: T1, 2: T2);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);

impl<S: PlanningSolution> Termination<S> for OrTermination<Vec<Box<dyn Termination<S>>>> {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        self.0.iter().any(|t| t.is_terminated(progress))
    }
}

impl<S: PlanningSolution> Termination<S> for AndTermination<Vec<Box<dyn Termination<S>>>> {
    fn is_terminated(&self, progress: &Progress<S::Score>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_terminated(progress))
    }
}
