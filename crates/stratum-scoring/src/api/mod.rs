//! Constraint API.
//!
//! This module provides:
//! - `IncrementalConstraint`, one compiled constraint with its running score
//! - `ConstraintSet` for evaluating many constraints together
//! - Analysis types for score explanation

pub mod analysis;
pub mod constraint_set;

pub use analysis::{ConstraintAnalysis, ConstraintMatch, ScoreExplanation};
pub use constraint_set::{ConstraintResult, ConstraintSet, IncrementalConstraint};
