//! Stratum - A Constraint Solver in Rust
//!
//! One import for the whole solver: score types, descriptors, constraint
//! streams, score directors, moves, phases, terminations, the solver, the
//! factory and the job manager.
//!
//! # Example
//!
//! ```rust
//! use stratum::prelude::*;
//!
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! assert!(score.is_feasible());
//! ```

pub use stratum_config as config;
pub use stratum_core as core;
pub use stratum_scoring as scoring;
pub use stratum_solver as solver;

// Score types
pub use stratum_core::score::{
    BendableScore, HardMediumSoftScore, HardSoftScore, ParseableScore, Score, ScoreParseError,
    SimpleScore,
};

// Errors
pub use stratum_core::{
    ConfigurationError, MoveApplicationError, ScoreCorruptionError, SolveFailure, SolverError,
    ValidationError,
};

// Domain model
pub use stratum_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningId, PlanningSolution, ProblemFact,
    SolutionDescriptor, VariableDescriptor,
};

// Constraint stream API and score directors
pub use stratum_scoring::stream;
pub use stratum_scoring::{
    ConstraintSet, IncrementalScoreDirector, ScoreDirector, SimpleScoreDirector,
    SolvableSolution,
};

pub use stratum_config::{EnvironmentMode, SolverConfig, TerminationConfig};

pub use stratum_solver::{
    BasicVariable, BestSolution, BestSolutionReceiver, JobId, ListVariable, Solver,
    SolverFactory, SolverManager, SolverStatus, VariableBinding,
};

mod logging;
pub use logging::{init_logging, SolverConsoleLayer};

/// The names most programs need.
pub mod prelude {
    pub use stratum_config::{
        AcceptorConfig, ConstructionHeuristicConfig, LocalSearchConfig, PhaseConfig,
        SolverConfig, TerminationConfig,
    };
    pub use stratum_core::domain::{
        EntityDescriptor, IndexRange, IntegerRange, PlanningSolution, SolutionDescriptor,
        StaticValueRange, ValueRange, VariableDescriptor,
    };
    pub use stratum_core::score::{
        BendableScore, HardMediumSoftScore, HardSoftScore, ParseableScore, Score, SimpleScore,
    };
    pub use stratum_core::{SolveFailure, SolverError};
    pub use stratum_scoring::stream::joiner::{equal, equal_bi};
    pub use stratum_scoring::stream::{entities, facts, ConstraintFactory};
    pub use stratum_scoring::{
        IncrementalScoreDirector, ScoreDirector, SimpleScoreDirector, SolvableSolution,
    };
    pub use stratum_solver::{
        BasicMove, BasicVariable, ChangeMove, ChangeMoveSelector, ConstructionHeuristicPhase,
        ListMove, ListVariable, LocalSearchPhase, Move, Phase, Solver, SolverFactory,
        SolverManager, SwapMoveSelector, Termination, UnionMoveSelector, VariableBinding,
    };

    pub use crate::init_logging;
}
