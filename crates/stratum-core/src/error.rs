//! Error taxonomy for stratum.
//!
//! Build-time problems ([`ValidationError`], [`ConfigurationError`]) surface
//! synchronously to the caller. Run-time problems ([`ScoreCorruptionError`],
//! [`MoveApplicationError`]) abort the active run; the caller then receives
//! the last consistent best solution through [`SolveFailure`].

use std::fmt;

use thiserror::Error;

use crate::score::ScoreParseError;

/// A malformed domain descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no planning solution type declared")]
    NoSolution,

    #[error("solution '{solution}' declares no planning entity")]
    NoEntities { solution: &'static str },

    #[error("entity '{entity}' declares no genuine planning variable")]
    NoPlanningVariables { entity: &'static str },

    #[error("solution '{solution}' has no score field")]
    MissingScoreField { solution: &'static str },

    #[error("variable '{entity}.{variable}' has no value range")]
    MissingValueRange {
        entity: &'static str,
        variable: &'static str,
    },

    #[error("variable '{entity}.{variable}' references undeclared value range '{range}'")]
    UnreferencedValueRange {
        entity: &'static str,
        variable: &'static str,
        range: &'static str,
    },

    #[error("shadow variable '{entity}.{variable}' depends on unknown source '{source_entity}.{source_variable}'")]
    UnknownShadowSource {
        entity: &'static str,
        variable: &'static str,
        source_entity: &'static str,
        source_variable: &'static str,
    },

    #[error("listener targets '{entity}.{variable}', which is not a declared shadow variable")]
    UnknownShadowVariable {
        entity: &'static str,
        variable: &'static str,
    },

    #[error("shadow variables form a cycle: {}", .cycle.join(" -> "))]
    ShadowCycle { cycle: Vec<String> },

    #[error("duplicate variable '{entity}.{variable}'")]
    DuplicateVariable {
        entity: &'static str,
        variable: &'static str,
    },
}

/// Contradictory or out-of-range solver settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration at '{path}': {message}")]
pub struct ConfigurationError {
    /// Dotted location of the offending setting, e.g. `phases[1].acceptor`.
    pub path: String,
    pub message: String,
}

impl ConfigurationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The incrementally maintained score diverged from a full recalculation.
///
/// Only detected in assertion environment modes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "score corruption after {context}: incremental score {incremental} != from-scratch score {from_scratch}"
)]
pub struct ScoreCorruptionError {
    pub incremental: String,
    pub from_scratch: String,
    pub context: String,
    /// Constraints whose individual scores differ, as `name: incremental != expected`.
    pub diverging_constraints: Vec<String>,
}

/// A move could not be applied without corrupting the working solution.
///
/// Moves validate before mutating, so the solution is untouched whenever
/// this error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveApplicationError {
    #[error("value {value} is outside the value range of '{variable}' on entity {entity_index}")]
    ValueOutOfRange {
        variable: &'static str,
        entity_index: usize,
        value: String,
    },

    #[error("entity index {entity_index} is out of bounds ({entity_count} entities)")]
    EntityOutOfBounds {
        entity_index: usize,
        entity_count: usize,
    },

    #[error("stale list index {index} on entity {entity_index} (list length {len})")]
    StaleIndex {
        entity_index: usize,
        index: usize,
        len: usize,
    },

    #[error("entity {entity_index} is pinned")]
    Pinned { entity_index: usize },

    #[error("move is not doable: {0}")]
    NotDoable(String),
}

/// Umbrella error for every stratum operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    ScoreCorruption(#[from] ScoreCorruptionError),

    #[error(transparent)]
    MoveApplication(#[from] MoveApplicationError),

    #[error(transparent)]
    ScoreParse(#[from] ScoreParseError),

    /// Invalid operation for the current solver state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl SolverError {
    /// Returns true for errors that abort an active run.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(
            self,
            SolverError::ScoreCorruption(_) | SolverError::MoveApplication(_)
        )
    }
}

pub type Result<T, E = SolverError> = std::result::Result<T, E>;

/// A run that terminated with an error.
///
/// `best_solution` is the last consistent best solution found before the
/// failure, never the half-mutated working solution.
pub struct SolveFailure<S> {
    pub best_solution: S,
    pub error: SolverError,
}

impl<S> SolveFailure<S> {
    pub fn new(best_solution: S, error: SolverError) -> Self {
        Self {
            best_solution,
            error,
        }
    }
}

impl<S> fmt::Debug for SolveFailure<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveFailure")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<S> fmt::Display for SolveFailure<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "solve failed: {}", self.error)
    }
}

impl<S> std::error::Error for SolveFailure<S> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts_to_solver_error() {
        let err: SolverError = ValidationError::NoSolution.into();
        assert!(matches!(err, SolverError::Validation(_)));
        assert!(!err.is_fatal_to_run());
    }

    #[test]
    fn test_move_errors_are_fatal() {
        let err: SolverError = MoveApplicationError::StaleIndex {
            entity_index: 0,
            index: 5,
            len: 3,
        }
        .into();
        assert!(err.is_fatal_to_run());
        assert_eq!(
            err.to_string(),
            "stale list index 5 on entity 0 (list length 3)"
        );
    }

    #[test]
    fn test_shadow_cycle_message() {
        let err = ValidationError::ShadowCycle {
            cycle: vec!["A.x".into(), "A.y".into(), "A.x".into()],
        };
        assert_eq!(err.to_string(), "shadow variables form a cycle: A.x -> A.y -> A.x");
    }

    #[test]
    fn test_solve_failure_exposes_source() {
        use std::error::Error as _;
        let failure = SolveFailure::new(42u32, ConfigurationError::new("seed", "bad").into());
        assert_eq!(failure.best_solution, 42);
        assert!(failure.source().is_some());
        assert!(format!("{:?}", failure).contains("Configuration"));
    }
}
