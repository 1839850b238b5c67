//! Heuristic components for solving
//!
//! This module contains:
//! - Variables: typed bindings of planning variables to a solution
//! - Moves: Operations that modify planning variables
//! - Selectors: Components that enumerate entities, values, and moves

pub mod r#move;
pub mod selector;
pub mod variable;

pub use r#move::{
    BasicMove, ChangeMove, ListAssignMove, ListChangeMove, ListMove, ListReverseMove,
    ListSwapMove, Move, MoveArena, MoveSignature, SubListChangeMove, SwapMove,
};
pub use selector::{
    ChangeMoveSelector, EntitySelector, ListChangeMoveSelector, ListReverseMoveSelector,
    ListSwapMoveSelector, MoveSelector, SelectionOrder, SubListChangeMoveSelector,
    SwapMoveSelector, UnionMoveSelector, ValueSelector, ValueSorting,
};
pub use variable::{BasicVariable, ListVariable, PlanningValue};
