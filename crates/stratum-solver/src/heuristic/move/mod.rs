//! Move system for modifying planning solutions.
//!
//! Moves are the fundamental operations that modify planning variables during
//! solving. The solver explores the solution space by applying different moves
//! and evaluating their impact on the score.
//!
//! # Architecture
//!
//! - `ChangeMove<S, V>` - assigns a value to a variable
//! - `SwapMove<S, V>` - swaps values between two entities
//! - `ListChangeMove<S, V>` - relocates an element in a list variable
//! - `ListAssignMove<S, V>` - inserts an unassigned element into a list
//! - `ListSwapMove<S, V>` - swaps two elements in list variables
//! - `ListReverseMove<S, V>` - reverses a segment (2-opt)
//! - `SubListChangeMove<S, V>` - relocates a contiguous sublist
//!
//! Every move validates its indices and values before touching the working
//! solution and fails with [`MoveApplicationError`] instead. Undo is handled
//! by `RecordingScoreDirector`: a move registers one closure that restores
//! the genuine variables it changed.
//!
//! # Arena Allocation
//!
//! Use `MoveArena<M>` for per-step reuse. Call `reset()` at each step
//! instead of allocating a new Vec.

mod arena;
mod change;
mod either;
mod list_assign;
mod list_change;
mod list_reverse;
mod list_swap;
mod signature;
mod sublist_change;
mod swap;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

pub use arena::MoveArena;
pub use change::ChangeMove;
pub use either::{BasicMove, ListMove};
pub use list_assign::ListAssignMove;
pub use list_change::ListChangeMove;
pub use list_reverse::ListReverseMove;
pub use list_swap::ListSwapMove;
pub use signature::MoveSignature;
pub use sublist_change::SubListChangeMove;
pub use swap::SwapMove;

/// A move that modifies one or more planning variables.
///
/// Moves are object safe so phases can drive them through
/// `&mut dyn ScoreDirector<S>`, which covers both the working director and
/// the `RecordingScoreDirector` used for evaluation.
pub trait Move<S: PlanningSolution>: Send + Sync + Debug {
    /// Returns true if this move changes the current state.
    ///
    /// A move is not doable if:
    /// - The source value equals the destination value (no change)
    /// - Required entities are pinned
    /// - Its indices no longer fit the working solution
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool;

    /// Executes this move, modifying the working solution.
    ///
    /// Validation happens before the first mutation, so on error the working
    /// solution is untouched and no undo has been registered.
    fn do_move(
        &self,
        score_director: &mut dyn ScoreDirector<S>,
    ) -> Result<(), MoveApplicationError>;

    /// Returns the descriptor index of the entity type this move affects.
    fn descriptor_index(&self) -> usize;

    /// Returns the entity indices involved in this move.
    fn entity_indices(&self) -> &[usize];

    /// Returns the variable name this move affects.
    fn variable_name(&self) -> &str;

    /// Fingerprint of the change this move would make from the current state.
    ///
    /// Must be taken before `do_move`. Tabu search compares signatures to
    /// recognise a move that reverts a recent step.
    fn signature(&self, score_director: &dyn ScoreDirector<S>) -> MoveSignature;
}
