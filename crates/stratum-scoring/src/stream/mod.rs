//! Fluent constraint stream API.
//!
//! A stream describes a pipeline of graph nodes. Streams start at a
//! [`ConstraintFactory`] from a source collection, are transformed by
//! `filter`, `join`, `if_exists`, `group_by` and friends, and end with
//! `penalize`/`reward` followed by `as_constraint`.
//!
//! ```
//! use stratum_core::score::HardSoftScore;
//! use stratum_scoring::stream::joiner::equal;
//! use stratum_scoring::stream::{entities, ConstraintFactory};
//! use stratum_scoring::IncrementalConstraint;
//!
//! #[derive(Clone, Debug)]
//! struct Queen { row: Option<i64> }
//! struct Board { queens: Vec<Queen> }
//!
//! let factory = ConstraintFactory::<Board, HardSoftScore>::new();
//! let mut conflicts = factory
//!     .for_each_unique_pair(
//!         entities(0, |b: &Board| b.queens.as_slice()),
//!         equal(|q: &Queen| q.row),
//!     )
//!     .filter(|a: &Queen, _b: &Queen| a.row.is_some())
//!     .penalize(HardSoftScore::ONE_HARD)
//!     .as_constraint("Row conflict");
//!
//! let board = Board {
//!     queens: vec![Queen { row: Some(0) }, Queen { row: Some(0) }, Queen { row: Some(1) }],
//! };
//! assert_eq!(conflicts.initialize(&board), HardSoftScore::of(-1, 0));
//! ```

#[macro_use]
mod macros;

mod bi_stream;
mod builder;
pub mod collector;
mod factory;
pub mod joiner;
mod tri_stream;
mod tuple;
mod uni_stream;

#[cfg(test)]
mod tests;

pub use bi_stream::BiConstraintStream;
pub use builder::ConstraintBuilder;
pub use factory::{entities, facts, ConstraintFactory, IntoUniNode};
pub use tri_stream::TriConstraintStream;
pub use uni_stream::UniConstraintStream;
