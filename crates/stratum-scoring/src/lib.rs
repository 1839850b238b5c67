//! Incremental constraint scoring for stratum.
//!
//! Constraints are written with the fluent [`stream`] API and compile into a
//! graph of [`graph`] nodes. Every elementary change to the working solution
//! becomes one [`graph::SourceEvent`]; each node turns that event into tuple
//! deltas for the node below it, and the terminal node adjusts the
//! constraint's running score. A score director ([`director`]) owns the
//! working solution and drives the protocol.
//!
//! # Architecture
//!
//! Node types are generic over their upstream nodes and closures, so a
//! constraint is one monomorphized value. Constraint lists are either tuples
//! of constraints or `Vec<Box<dyn IncrementalConstraint>>` when assembled at
//! runtime.

// Node types nest deeply
#![allow(clippy::type_complexity)]

pub mod api;
pub mod director;
pub mod graph;
pub mod stream;

pub use api::analysis::{ConstraintAnalysis, ConstraintMatch, ScoreExplanation};
pub use api::constraint_set::{ConstraintResult, ConstraintSet, IncrementalConstraint};

pub use director::{
    IncrementalScoreDirector, RecordingScoreDirector, ScoreDirector, ShadowCascade,
    ShadowListener, SimpleScoreDirector, SolvableSolution,
};

pub use stream::{
    entities, facts, BiConstraintStream, ConstraintBuilder, ConstraintFactory,
    TriConstraintStream, UniConstraintStream,
};
