//! Stratum Core - scores, domain metadata and errors
//!
//! This crate provides the fundamental abstractions shared by every other
//! stratum crate:
//! - Score types with lexicographic hard/medium/soft levels
//! - Domain traits and validated descriptors for planning problems
//! - Value ranges for planning variables
//! - The error taxonomy

pub mod constraint;
pub mod domain;
pub mod error;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use domain::{PlanningEntity, PlanningId, PlanningSolution, ProblemFact};
pub use error::{
    ConfigurationError, MoveApplicationError, ScoreCorruptionError, SolveFailure, SolverError,
    ValidationError,
};
pub use score::{
    BendableScore, HardMediumSoftScore, HardSoftScore, ParseableScore, Score, ScoreLevel,
    ScoreParseError, SimpleScore,
};
