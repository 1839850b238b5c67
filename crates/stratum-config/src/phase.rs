// Phase, acceptor, forager and move selector configuration.

use serde::{Deserialize, Serialize};
use stratum_core::ConfigurationError;

use crate::TerminationConfig;

/// Phase configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    /// Construction heuristic phase.
    ConstructionHeuristic(ConstructionHeuristicConfig),

    /// Local search phase.
    LocalSearch(LocalSearchConfig),

    /// Exhaustive search phase.
    ExhaustiveSearch(ExhaustiveSearchConfig),
}

impl PhaseConfig {
    /// Returns the phase's own termination, if any.
    pub fn termination(&self) -> Option<&TerminationConfig> {
        match self {
            PhaseConfig::ConstructionHeuristic(c) => c.termination.as_ref(),
            PhaseConfig::LocalSearch(c) => c.termination.as_ref(),
            PhaseConfig::ExhaustiveSearch(c) => c.termination.as_ref(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PhaseConfig::ConstructionHeuristic(_) => "construction_heuristic",
            PhaseConfig::LocalSearch(_) => "local_search",
            PhaseConfig::ExhaustiveSearch(_) => "exhaustive_search",
        }
    }

    pub(crate) fn validate(&self, path: &str) -> Result<(), ConfigurationError> {
        match self {
            PhaseConfig::ConstructionHeuristic(_) => Ok(()),
            PhaseConfig::LocalSearch(c) => c.validate(path),
            PhaseConfig::ExhaustiveSearch(c) => c.validate(path),
        }
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstructionHeuristicConfig {
    /// Type of construction heuristic.
    #[serde(default)]
    pub construction_heuristic_type: ConstructionHeuristicType,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

/// Construction heuristic types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionHeuristicType {
    /// First value that scores best for each entity in order.
    #[default]
    FirstFit,

    /// First fit, most difficult entities first.
    FirstFitDecreasing,

    /// Tries the weakest values first.
    WeakestFit,

    /// Weakest fit, most difficult entities first.
    WeakestFitDecreasing,

    /// Tries the strongest values first.
    StrongestFit,

    /// Strongest fit, most difficult entities first.
    StrongestFitDecreasing,

    /// Inserts each unassigned list element at its cheapest position.
    CheapestInsertion,
}

impl ConstructionHeuristicType {
    /// Returns true if entities are sorted by decreasing difficulty.
    pub fn sorts_entities(&self) -> bool {
        matches!(
            self,
            Self::FirstFitDecreasing | Self::WeakestFitDecreasing | Self::StrongestFitDecreasing
        )
    }
}

/// Local search configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Acceptor configuration. Defaults to hill climbing.
    pub acceptor: Option<AcceptorConfig>,

    /// Forager configuration.
    pub forager: Option<ForagerConfig>,

    /// Move selector configuration. Defaults to the union of the change and
    /// swap selectors for basic variables, or of all list selectors.
    pub move_selector: Option<MoveSelectorConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl LocalSearchConfig {
    fn validate(&self, path: &str) -> Result<(), ConfigurationError> {
        if let Some(acceptor) = &self.acceptor {
            acceptor.validate(&format!("{}.acceptor", path))?;
        }
        if let Some(forager) = &self.forager {
            if forager.accepted_count_limit == Some(0) {
                return Err(ConfigurationError::new(
                    format!("{}.forager.accepted_count_limit", path),
                    "accepted count limit must be positive",
                ));
            }
        }
        if let Some(selector) = &self.move_selector {
            selector.validate(&format!("{}.move_selector", path))?;
        }
        Ok(())
    }
}

/// Acceptor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Hill climbing (only accept non-worsening moves).
    HillClimbing,

    /// Simulated annealing acceptor.
    SimulatedAnnealing(SimulatedAnnealingConfig),

    /// Tabu search acceptor.
    TabuSearch(TabuSearchConfig),

    /// Late acceptance acceptor.
    LateAcceptance(LateAcceptanceConfig),
}

impl AcceptorConfig {
    fn validate(&self, path: &str) -> Result<(), ConfigurationError> {
        match self {
            AcceptorConfig::HillClimbing => Ok(()),
            AcceptorConfig::SimulatedAnnealing(c) => {
                let t = c.starting_temperature();
                if !(t.is_finite() && t > 0.0) {
                    return Err(ConfigurationError::new(
                        format!("{}.starting_temperature", path),
                        format!("temperature must be positive, got {}", t),
                    ));
                }
                let rate = c.cooling_rate();
                if !(rate > 0.0 && rate <= 1.0) {
                    return Err(ConfigurationError::new(
                        format!("{}.cooling_rate", path),
                        format!("cooling rate must be in (0, 1], got {}", rate),
                    ));
                }
                Ok(())
            }
            AcceptorConfig::TabuSearch(c) => {
                if c.entity_tabu_size.unwrap_or(0) == 0 && c.move_tabu_size.unwrap_or(0) == 0 {
                    return Err(ConfigurationError::new(
                        path,
                        "tabu search needs a positive entity_tabu_size or move_tabu_size",
                    ));
                }
                Ok(())
            }
            AcceptorConfig::LateAcceptance(c) => {
                if c.late_acceptance_size == Some(0) {
                    return Err(ConfigurationError::new(
                        format!("{}.late_acceptance_size", path),
                        "late acceptance size must be positive",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    /// Starting temperature, in units of the most significant differing score level.
    pub starting_temperature: Option<f64>,

    /// Multiplicative temperature decay per step.
    pub cooling_rate: Option<f64>,
}

impl SimulatedAnnealingConfig {
    pub fn starting_temperature(&self) -> f64 {
        self.starting_temperature.unwrap_or(1.0)
    }

    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate.unwrap_or(0.999)
    }
}

/// Tabu search configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TabuSearchConfig {
    /// Number of steps an entity stays tabu after a move touches it.
    pub entity_tabu_size: Option<usize>,

    /// Number of steps the undo of a step's move stays tabu.
    pub move_tabu_size: Option<usize>,

    /// Accept tabu moves that would improve the best score. Defaults to true.
    pub aspiration: Option<bool>,
}

/// Late acceptance configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LateAcceptanceConfig {
    /// Size of late acceptance list.
    pub late_acceptance_size: Option<usize>,
}

/// Forager configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForagerConfig {
    /// Maximum number of accepted moves to consider per step.
    pub accepted_count_limit: Option<usize>,

    /// Whether to pick early if an improving move is found.
    pub pick_early_type: Option<PickEarlyType>,

    /// How to choose among moves with an equal best score.
    pub tie_break: Option<TieBreak>,
}

/// Pick early type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickEarlyType {
    /// Never pick early.
    #[default]
    Never,

    /// Pick the first move that improves the best score.
    FirstBestScoreImproving,

    /// Pick the first move that improves the last step score.
    FirstLastStepScoreImproving,
}

/// Tie-break among accepted moves with an equal best score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The first such move in selector order.
    #[default]
    FirstEncountered,

    /// A uniformly random one, drawn from the solver's seeded generator.
    Random,
}

/// Selection order of entities, values and moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Declaration order.
    Original,

    /// Shuffled every step.
    #[default]
    Random,
}

/// Move selector configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSelectorConfig {
    /// Change move selector.
    ChangeMoveSelector(VariableMoveSelectorConfig),

    /// Swap move selector.
    SwapMoveSelector(VariableMoveSelectorConfig),

    /// Moves one list element to another position.
    ListChangeMoveSelector(ListMoveSelectorConfig),

    /// Swaps two list elements.
    ListSwapMoveSelector(ListMoveSelectorConfig),

    /// Reverses a sub-range of one list (2-opt).
    ListReverseMoveSelector(ListMoveSelectorConfig),

    /// Moves a contiguous sub-list to another position.
    SubListChangeMoveSelector(SubListChangeMoveConfig),

    /// Union of multiple selectors.
    UnionMoveSelector(UnionMoveSelectorConfig),
}

impl MoveSelectorConfig {
    fn validate(&self, path: &str) -> Result<(), ConfigurationError> {
        match self {
            MoveSelectorConfig::SubListChangeMoveSelector(c) => {
                if c.minimum_size() == 0 || c.minimum_size() > c.maximum_size() {
                    return Err(ConfigurationError::new(
                        path,
                        format!(
                            "sub-list sizes must satisfy 1 <= minimum <= maximum, got {}..={}",
                            c.minimum_size(),
                            c.maximum_size()
                        ),
                    ));
                }
                Ok(())
            }
            MoveSelectorConfig::UnionMoveSelector(c) => {
                if c.selectors.is_empty() {
                    return Err(ConfigurationError::new(path, "union needs at least one selector"));
                }
                for (i, child) in c.selectors.iter().enumerate() {
                    child.validate(&format!("{}.selectors[{}]", path, i))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Change and swap move configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VariableMoveSelectorConfig {
    /// Entity class filter.
    pub entity_class: Option<String>,

    /// Variable name filter.
    pub variable_name: Option<String>,

    #[serde(default)]
    pub selection_order: SelectionOrder,
}

/// List change, swap and reverse move configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMoveSelectorConfig {
    /// Entity class filter.
    pub entity_class: Option<String>,

    #[serde(default)]
    pub selection_order: SelectionOrder,
}

/// Sub-list change move configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubListChangeMoveConfig {
    /// Entity class filter.
    pub entity_class: Option<String>,

    pub minimum_sub_list_size: Option<usize>,

    pub maximum_sub_list_size: Option<usize>,

    #[serde(default)]
    pub selection_order: SelectionOrder,
}

impl SubListChangeMoveConfig {
    pub fn minimum_size(&self) -> usize {
        self.minimum_sub_list_size.unwrap_or(1)
    }

    pub fn maximum_size(&self) -> usize {
        self.maximum_sub_list_size.unwrap_or(3)
    }
}

/// Union move selector configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UnionMoveSelectorConfig {
    /// Child selectors.
    pub selectors: Vec<MoveSelectorConfig>,
}

/// Exhaustive search configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExhaustiveSearchConfig {
    /// Exhaustive search type.
    #[serde(default)]
    pub exhaustive_search_type: ExhaustiveSearchType,

    /// Above this many entities the phase is skipped. Defaults to 12.
    pub entity_limit: Option<usize>,

    /// Maximum number of explored nodes.
    pub node_limit: Option<u64>,

    #[serde(default)]
    pub exploration_type: ExplorationType,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl ExhaustiveSearchConfig {
    pub fn entity_limit(&self) -> usize {
        self.entity_limit.unwrap_or(12)
    }

    fn validate(&self, path: &str) -> Result<(), ConfigurationError> {
        if self.node_limit == Some(0) {
            return Err(ConfigurationError::new(
                format!("{}.node_limit", path),
                "node limit must be positive",
            ));
        }
        Ok(())
    }
}

/// Exhaustive search types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustiveSearchType {
    /// Prunes branches that cannot beat the best score.
    #[default]
    BranchAndBound,

    /// Visits every complete assignment.
    BruteForce,
}

/// Order in which exhaustive search expands child nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationType {
    /// Values in value range order.
    #[default]
    DepthFirst,

    /// Best scoring child first.
    ScoreFirst,
}
