//! Configuration system for stratum.
//!
//! Load solver configuration from TOML or YAML to control termination,
//! phases, acceptors and move selectors without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use stratum_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     [termination]
//!     seconds_spent_limit = 30
//!     unimproved_seconds_spent_limit = 5
//!
//!     [[phases]]
//!     type = "construction_heuristic"
//!     construction_heuristic_type = "first_fit"
//!
//!     [[phases]]
//!     type = "local_search"
//!     [phases.acceptor]
//!     type = "late_acceptance"
//!     late_acceptance_size = 400
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.phases.len(), 2);
//! assert!(config.validate().is_ok());
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use stratum_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! assert!(config.phases.is_empty());
//! ```

mod phase;
mod termination;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stratum_core::score::{HardMediumSoftScore, HardSoftScore, ParseableScore, SimpleScore};
use stratum_core::ConfigurationError;
use thiserror::Error;

pub use phase::{
    AcceptorConfig, ConstructionHeuristicConfig, ConstructionHeuristicType, ExhaustiveSearchConfig,
    ExhaustiveSearchType, ExplorationType, ForagerConfig, LateAcceptanceConfig,
    ListMoveSelectorConfig, LocalSearchConfig, MoveSelectorConfig, PhaseConfig, PickEarlyType,
    SelectionOrder, SimulatedAnnealingConfig, SubListChangeMoveConfig, TabuSearchConfig, TieBreak,
    UnionMoveSelectorConfig, VariableMoveSelectorConfig,
};
pub use termination::{TerminationComposition, TerminationConfig};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

impl From<ConfigError> for ConfigurationError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(inner) => inner,
            other => ConfigurationError::new("<source>", other.to_string()),
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of threads for parallel move evaluation.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Solver-level termination.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Phase configurations. Empty means construction followed by local search.
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension.
    ///
    /// `.yaml` and `.yml` parse as YAML; anything else parses as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or doesn't parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(
            self.termination
                .unwrap_or_default()
                .with_seconds_spent_limit(seconds),
        );
        self
    }

    /// Replaces the solver-level termination.
    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    /// Adds a phase configuration.
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the configured phases, or the default construction plus local
    /// search pair when none are configured.
    pub fn effective_phases(&self) -> Vec<PhaseConfig> {
        if self.phases.is_empty() {
            vec![
                PhaseConfig::ConstructionHeuristic(ConstructionHeuristicConfig::default()),
                PhaseConfig::LocalSearch(LocalSearchConfig::default()),
            ]
        } else {
            self.phases.clone()
        }
    }

    /// Checks for contradictory or out-of-range settings.
    ///
    /// # Errors
    ///
    /// Returns the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let MoveThreadCount::Count(0) = self.move_thread_count {
            return Err(ConfigurationError::new(
                "move_thread_count",
                "thread count must be at least 1",
            ));
        }

        let solver_terminates = match &self.termination {
            Some(t) => {
                validate_termination("termination", t)?;
                !t.is_empty()
            }
            None => false,
        };

        for (i, phase) in self.effective_phases().iter().enumerate() {
            let path = format!("phases[{}]", i);
            phase.validate(&path)?;
            if let Some(t) = phase.termination() {
                validate_termination(&format!("{}.termination", path), t)?;
            }

            let phase_terminates = phase.termination().is_some_and(|t| !t.is_empty());
            let is_local_search = matches!(phase, PhaseConfig::LocalSearch(_));
            if is_local_search && !solver_terminates && !phase_terminates {
                return Err(ConfigurationError::new(
                    path,
                    "local search needs a termination on the phase or the solver",
                ));
            }
        }
        Ok(())
    }
}

fn validate_termination(path: &str, config: &TerminationConfig) -> Result<(), ConfigurationError> {
    if let Some(limit) = &config.best_score_limit {
        // Bendable limits are checked when the solver knows the level sizes.
        let parses = limit.trim_start().starts_with('[')
            || SimpleScore::parse(limit).is_ok()
            || HardSoftScore::parse(limit).is_ok()
            || HardMediumSoftScore::parse(limit).is_ok();
        if !parses {
            return Err(ConfigurationError::new(
                format!("{}.best_score_limit", path),
                format!("'{}' is not a score", limit),
            ));
        }
    }
    if config.step_count_limit == Some(0) {
        return Err(ConfigurationError::new(
            format!("{}.step_count_limit", path),
            "step count limit must be positive",
        ));
    }
    Ok(())
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior.
    Reproducible,

    /// Compares the incremental score with a full recalculation after every step.
    FastAssert,

    /// Like `FastAssert`, and also after every undone move evaluation.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_reproducible(&self) -> bool {
        !matches!(self, EnvironmentMode::NonReproducible)
    }

    pub fn asserts_steps(&self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    pub fn asserts_moves(&self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

/// Move thread count configuration.
///
/// Written as `"auto"`, `"none"` or a plain thread count. The table form
/// `{ count = n }` is accepted as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "ThreadCountRepr", into = "ThreadCountRepr")]
pub enum MoveThreadCount {
    /// One thread per available core.
    Auto,

    /// No parallel move evaluation.
    #[default]
    None,

    /// Specific number of threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Resolves to a worker count, or `None` for single-threaded evaluation.
    pub fn resolve(&self) -> Option<usize> {
        match self {
            MoveThreadCount::None => None,
            MoveThreadCount::Count(n) if *n <= 1 => None,
            MoveThreadCount::Count(n) => Some(*n),
            MoveThreadCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .ok()
                .filter(|&n| n > 1),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum ThreadCountRepr {
    Count(usize),
    Keyword(String),
    Table { count: usize },
}

impl TryFrom<ThreadCountRepr> for MoveThreadCount {
    type Error = String;

    fn try_from(repr: ThreadCountRepr) -> Result<Self, Self::Error> {
        match repr {
            ThreadCountRepr::Count(n) | ThreadCountRepr::Table { count: n } => {
                Ok(MoveThreadCount::Count(n))
            }
            ThreadCountRepr::Keyword(word) => match word.as_str() {
                "auto" => Ok(MoveThreadCount::Auto),
                "none" => Ok(MoveThreadCount::None),
                other => other.parse().map(MoveThreadCount::Count).map_err(|_| {
                    format!(
                        "invalid move_thread_count '{}', expected auto, none or a number",
                        other
                    )
                }),
            },
        }
    }
}

impl From<MoveThreadCount> for ThreadCountRepr {
    fn from(count: MoveThreadCount) -> Self {
        match count {
            MoveThreadCount::Auto => ThreadCountRepr::Keyword("auto".into()),
            MoveThreadCount::None => ThreadCountRepr::Keyword("none".into()),
            MoveThreadCount::Count(n) => ThreadCountRepr::Count(n),
        }
    }
}

#[cfg(test)]
mod tests;
