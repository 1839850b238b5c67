//! Solver phases for different solving strategies
//!
//! Phases are the main building blocks of solving:
//! - ConstructionHeuristicPhase: Builds an initial solution
//! - ListConstructionPhase: Inserts unassigned list elements
//! - LocalSearchPhase: Improves an existing solution
//! - ExhaustiveSearchPhase: Explores the entire solution space

pub mod construction;
pub mod exhaustive;
pub mod localsearch;

use std::fmt::Debug;

use stratum_core::domain::PlanningSolution;
use stratum_core::SolverError;
use stratum_scoring::{RecordingScoreDirector, ScoreDirector};
use tracing::trace;

use crate::heuristic::r#move::Move;
use crate::scope::SolverScope;

/// A phase of the solving process.
///
/// Phases are executed in sequence by the solver. Each phase has its own
/// strategy for exploring or constructing solutions, checks termination
/// between its steps and keeps the scope's best solution current.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Phase<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Executes this phase.
    ///
    /// An error aborts the run; the working solution may then be
    /// inconsistent and only the best solution is trusted.
    fn solve(&mut self, solver_scope: &mut SolverScope<'_, S, D>) -> Result<(), SolverError>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

impl<S, D> Phase<S, D> for Box<dyn Phase<S, D>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<'_, S, D>) -> Result<(), SolverError> {
        (**self).solve(solver_scope)
    }

    fn phase_type_name(&self) -> &'static str {
        (**self).phase_type_name()
    }
}

/// An ordered sequence of phases.
///
/// Implemented for tuples of phases, which dispatch statically, and for
/// `Vec<Box<dyn Phase>>`, which config-built solvers use.
pub trait PhaseList<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn phase_mut(&mut self, index: usize) -> Option<&mut dyn Phase<S, D>>;
}

impl<S, D> PhaseList<S, D> for ()
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn len(&self) -> usize {
        0
    }

    fn phase_mut(&mut self, _index: usize) -> Option<&mut dyn Phase<S, D>> {
        None
    }
}

impl<S, D> PhaseList<S, D> for Vec<Box<dyn Phase<S, D>>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn len(&self) -> usize {
        <[_]>::len(self)
    }

    fn phase_mut(&mut self, index: usize) -> Option<&mut dyn Phase<S, D>> {
        match self.get_mut(index) {
            Some(phase) => Some(phase.as_mut() as &mut dyn Phase<S, D>),
            None => None,
        }
    }
}

macro_rules! impl_phase_list {
    ($len:expr; $($idx:tt: $P:ident),+) => {
        impl<S, D, $($P),+> PhaseList<S, D> for ($($P,)+)
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($P: Phase<S, D>,)+
        {
            fn len(&self) -> usize {
                $len
            }

            fn phase_mut(&mut self, index: usize) -> Option<&mut dyn Phase<S, D>> {
                match index {
                    $($idx => Some(&mut self.$idx as &mut dyn Phase<S, D>),)+
                    _ => None,
                }
            }
        }
    };
}

impl_phase_list!(1; 0: P0);
impl_phase_list!(2; 0: P0, 1: P1);
impl_phase_list!(3; 0: P0, 1: P1, 2: P2);
impl_phase_list!(4; 0: P0, 1: P1, 2: P2, 3: P3);
impl_phase_list!(5; 0: P0, 1: P1, 2: P2, 3: P3, 4: P4);

/// Scores `m` as if applied, then restores the working solution.
///
/// Under `assert_moves` the move's score and the restored score are both
/// checked against a full recalculation.
pub(crate) fn evaluate_move<S, M>(
    score_director: &mut dyn ScoreDirector<S>,
    m: &M,
    assert_moves: bool,
) -> Result<S::Score, SolverError>
where
    S: PlanningSolution,
    M: Move<S> + ?Sized,
{
    let mut recording = RecordingScoreDirector::new(score_director);
    if let Err(e) = m.do_move(&mut recording) {
        recording.undo_changes();
        return Err(e.into());
    }
    let score = if assert_moves {
        recording.assert_score_from_scratch()?
    } else {
        recording.calculate_score()
    };
    recording.undo_changes();
    if assert_moves {
        recording.assert_score_from_scratch()?;
    }
    trace!(event = "move_evaluated", candidate = ?m, score = %score);
    Ok(score)
}

/// Picks the best of `(candidate, score)` pairs; the first one wins ties.
pub(crate) fn first_best<T, Sc: Ord + Copy>(
    candidates: impl IntoIterator<Item = (T, Sc)>,
) -> Option<(T, Sc)> {
    let mut best: Option<(T, Sc)> = None;
    for (candidate, score) in candidates {
        if best.as_ref().map_or(true, |(_, b)| score > *b) {
            best = Some((candidate, score));
        }
    }
    best
}
