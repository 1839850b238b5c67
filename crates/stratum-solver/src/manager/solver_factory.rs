//! Builds solvers from configuration.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_config::{
    ConstructionHeuristicType, LocalSearchConfig, MoveSelectorConfig, PhaseConfig, SelectionOrder,
    SolverConfig, TerminationComposition, TerminationConfig, VariableMoveSelectorConfig,
};
use stratum_core::domain::PlanningSolution;
use stratum_core::score::ParseableScore;
use stratum_core::{ConfigurationError, SolveFailure, SolverError};
use stratum_scoring::ScoreDirector;
use tracing::{debug, warn};

use crate::heuristic::r#move::{BasicMove, ListMove};
use crate::heuristic::selector::{
    ChangeMoveSelector, ListChangeMoveSelector, ListReverseMoveSelector, ListSwapMoveSelector,
    MoveSelector, SubListChangeMoveSelector, SwapMoveSelector, UnionMoveSelector,
};
use crate::heuristic::variable::{BasicVariable, ListVariable, PlanningValue};
use crate::phase::construction::{ConstructionHeuristicPhase, ListConstructionPhase};
use crate::phase::exhaustive::ExhaustiveSearchPhase;
use crate::phase::localsearch::{acceptor_from_config, AcceptedCountForager, LocalSearchPhase};
use crate::phase::Phase;
use crate::solver::Solver;
use crate::termination::{
    AndTermination, BestScoreFeasibleTermination, BestScoreTermination, MoveCountTermination,
    NoTermination, OrTermination, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination, UnimprovedTimeTermination,
};

/// A solver whose phases and termination come from configuration.
pub type ConfiguredSolver<S, D> =
    Solver<S, Vec<Box<dyn Phase<S, D>>>, Box<dyn Termination<S>>>;

type DirectorBuilder<S, D> = dyn Fn(S) -> Result<D, SolverError> + Send + Sync;

/// The planning variable configured phases and selectors work on.
pub enum VariableBinding<S, V> {
    Basic(Arc<BasicVariable<S, V>>),
    List(Arc<ListVariable<S, V>>),
}

impl<S, V> VariableBinding<S, V> {
    fn variable_name(&self) -> &'static str {
        match self {
            VariableBinding::Basic(var) => var.variable_name,
            VariableBinding::List(var) => var.variable_name,
        }
    }
}

impl<S, V> Clone for VariableBinding<S, V> {
    fn clone(&self) -> Self {
        match self {
            VariableBinding::Basic(var) => VariableBinding::Basic(Arc::clone(var)),
            VariableBinding::List(var) => VariableBinding::List(Arc::clone(var)),
        }
    }
}

impl<S, V> Debug for VariableBinding<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableBinding::Basic(var) => {
                f.debug_tuple("Basic").field(&var.variable_name).finish()
            }
            VariableBinding::List(var) => f.debug_tuple("List").field(&var.variable_name).finish(),
        }
    }
}

/// Creates fresh solvers and score directors for one problem type.
///
/// The configuration is validated once, in [`new`](Self::new). Every
/// [`create_solver`](Self::create_solver) call returns a solver with fresh
/// phase state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stratum_config::SolverConfig;
/// use stratum_solver::heuristic::BasicVariable;
/// use stratum_solver::manager::{SolverFactory, VariableBinding};
/// use stratum_test::nqueens::{self, NQueensSolution};
///
/// let row = Arc::new(BasicVariable::new(
///     0, "row", nqueens::queen_count, nqueens::get_queen_row, nqueens::set_queen_row,
///     nqueens::row_range(4),
/// ));
/// let config = SolverConfig::from_toml_str(r#"
///     random_seed = 3
///     [termination]
///     step_count_limit = 30
/// "#).unwrap();
/// let factory = SolverFactory::new(config, VariableBinding::Basic(row), |s| {
///     nqueens::incremental_director(s).map_err(Into::into)
/// })
/// .unwrap();
///
/// let solution = factory.solve(NQueensSolution::uninitialized(4)).unwrap();
/// assert!(solution.rows().iter().all(Option::is_some));
/// ```
pub struct SolverFactory<S: PlanningSolution, V, D> {
    config: SolverConfig,
    variable: VariableBinding<S, V>,
    director_builder: Arc<DirectorBuilder<S, D>>,
}

impl<S, V, D> SolverFactory<S, V, D>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    V: PlanningValue,
    D: ScoreDirector<S> + Clone + 'static,
{
    /// Validates `config` and binds it to the domain.
    ///
    /// # Errors
    ///
    /// Returns the first contradictory or out-of-range setting, including
    /// settings that do not fit the bound variable.
    pub fn new(
        config: SolverConfig,
        variable: VariableBinding<S, V>,
        director_builder: impl Fn(S) -> Result<D, SolverError> + Send + Sync + 'static,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let factory = Self {
            config,
            variable,
            director_builder: Arc::new(director_builder),
        };
        // Surfaces binding mismatches and unparsable score limits now
        // instead of at the first solve.
        factory.create_solver()?;
        Ok(factory)
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn variable(&self) -> &VariableBinding<S, V> {
        &self.variable
    }

    /// Builds a score director over `solution`.
    pub fn build_director(&self, solution: S) -> Result<D, SolverError> {
        (self.director_builder)(solution)
    }

    /// Creates a solver with fresh phases.
    pub fn create_solver(&self) -> Result<ConfiguredSolver<S, D>, ConfigurationError> {
        let move_threads = self.config.move_thread_count.resolve().unwrap_or(1);
        let mut phases: Vec<Box<dyn Phase<S, D>>> = Vec::new();
        for (i, phase) in self.config.effective_phases().iter().enumerate() {
            phases.push(self.build_phase(&format!("phases[{}]", i), phase, move_threads)?);
        }

        let termination = match &self.config.termination {
            Some(config) => termination_from_config::<S>("termination", config)?,
            None => None,
        };
        let mut solver = Solver::new(phases).with_environment_mode(self.config.environment_mode);
        if let Some(seed) = self.config.random_seed {
            solver = solver.with_random_seed(seed);
        }
        debug!(
            event = "solver_created",
            phases = solver.phases().len(),
            move_threads,
            variable = self.variable.variable_name(),
        );
        Ok(solver.with_termination(termination.unwrap_or_else(|| Box::new(NoTermination))))
    }

    /// Creates a solver and a director and solves `problem`.
    pub fn solve(&self, problem: S) -> Result<S, SolveFailure<S>> {
        let mut solver = self
            .create_solver()
            .map_err(|e| SolveFailure::new(problem.clone(), e.into()))?;
        let director = self
            .build_director(problem.clone())
            .map_err(|e| SolveFailure::new(problem, e))?;
        solver.solve(director)
    }

    fn build_phase(
        &self,
        path: &str,
        config: &PhaseConfig,
        move_threads: usize,
    ) -> Result<Box<dyn Phase<S, D>>, ConfigurationError> {
        let termination = match config.termination() {
            Some(t) => termination_from_config::<S>(&format!("{}.termination", path), t)?,
            None => None,
        };

        match (config, &self.variable) {
            (PhaseConfig::ConstructionHeuristic(c), VariableBinding::Basic(var)) => {
                if c.construction_heuristic_type == ConstructionHeuristicType::CheapestInsertion {
                    warn!(
                        event = "config_ignored",
                        path,
                        setting = "construction_heuristic_type",
                        reason = "cheapest insertion needs a list variable; using first fit",
                    );
                }
                Ok(Box::new(
                    ConstructionHeuristicPhase::new(Arc::clone(var), c.construction_heuristic_type)
                        .with_boxed_termination(termination),
                ))
            }
            (PhaseConfig::ConstructionHeuristic(c), VariableBinding::List(var)) => {
                if !matches!(
                    c.construction_heuristic_type,
                    ConstructionHeuristicType::CheapestInsertion
                        | ConstructionHeuristicType::FirstFit
                ) {
                    warn!(
                        event = "config_ignored",
                        path,
                        setting = "construction_heuristic_type",
                        reason = "list variables are constructed by cheapest insertion",
                    );
                }
                Ok(Box::new(
                    ListConstructionPhase::new(Arc::clone(var)).with_boxed_termination(termination),
                ))
            }
            (PhaseConfig::LocalSearch(c), VariableBinding::Basic(var)) => {
                let selector = match &c.move_selector {
                    Some(s) => basic_selector(var, s, &format!("{}.move_selector", path))?,
                    None => default_basic_selector(var),
                };
                Ok(local_search::<S, D, BasicMove<S, V>>(c, selector, termination, move_threads))
            }
            (PhaseConfig::LocalSearch(c), VariableBinding::List(var)) => {
                let selector = match &c.move_selector {
                    Some(s) => list_selector(var, s, &format!("{}.move_selector", path))?,
                    None => default_list_selector(var),
                };
                Ok(local_search::<S, D, ListMove<S, V>>(c, selector, termination, move_threads))
            }
            (PhaseConfig::ExhaustiveSearch(c), VariableBinding::Basic(var)) => Ok(Box::new(
                ExhaustiveSearchPhase::from_config(Arc::clone(var), c)
                    .with_boxed_termination(termination),
            )),
            (PhaseConfig::ExhaustiveSearch(_), VariableBinding::List(_)) => Err(
                ConfigurationError::new(path, "exhaustive search needs a basic variable"),
            ),
        }
    }
}

impl<S: PlanningSolution, V, D> Debug for SolverFactory<S, V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverFactory")
            .field("config", &self.config)
            .field("variable", &self.variable)
            .finish_non_exhaustive()
    }
}

fn local_search<S, D, M>(
    config: &LocalSearchConfig,
    selector: Box<dyn MoveSelector<S, M>>,
    termination: Option<Box<dyn Termination<S>>>,
    move_threads: usize,
) -> Box<dyn Phase<S, D>>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + Clone + 'static,
    M: crate::heuristic::r#move::Move<S> + 'static,
{
    let forager = config
        .forager
        .as_ref()
        .map_or_else(AcceptedCountForager::unlimited, AcceptedCountForager::from_config);
    Box::new(
        LocalSearchPhase::new(selector, acceptor_from_config::<S>(config.acceptor.as_ref()))
            .with_forager(forager)
            .with_boxed_termination(termination)
            .with_move_thread_count(move_threads),
    )
}

fn check_variable_name(
    path: &str,
    config: &VariableMoveSelectorConfig,
    variable_name: &str,
) -> Result<(), ConfigurationError> {
    match &config.variable_name {
        Some(name) if name != variable_name => Err(ConfigurationError::new(
            format!("{}.variable_name", path),
            format!("unknown variable '{}', expected '{}'", name, variable_name),
        )),
        _ => Ok(()),
    }
}

fn default_basic_selector<S, V>(
    var: &Arc<BasicVariable<S, V>>,
) -> Box<dyn MoveSelector<S, BasicMove<S, V>>>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    let order = SelectionOrder::default();
    Box::new(
        UnionMoveSelector::<S, BasicMove<S, V>>::new(Vec::new())
            .with(ChangeMoveSelector::new(Arc::clone(var), order))
            .with(SwapMoveSelector::new(Arc::clone(var), order)),
    )
}

fn basic_selector<S, V>(
    var: &Arc<BasicVariable<S, V>>,
    config: &MoveSelectorConfig,
    path: &str,
) -> Result<Box<dyn MoveSelector<S, BasicMove<S, V>>>, ConfigurationError>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    match config {
        MoveSelectorConfig::ChangeMoveSelector(c) => {
            check_variable_name(path, c, var.variable_name)?;
            Ok(Box::new(ChangeMoveSelector::<S, V, BasicMove<S, V>>::new(
                Arc::clone(var),
                c.selection_order,
            )))
        }
        MoveSelectorConfig::SwapMoveSelector(c) => {
            check_variable_name(path, c, var.variable_name)?;
            Ok(Box::new(SwapMoveSelector::<S, V, BasicMove<S, V>>::new(
                Arc::clone(var),
                c.selection_order,
            )))
        }
        MoveSelectorConfig::UnionMoveSelector(c) => {
            let children = c
                .selectors
                .iter()
                .enumerate()
                .map(|(i, child)| basic_selector(var, child, &format!("{}.selectors[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(UnionMoveSelector::new(children)))
        }
        _ => Err(ConfigurationError::new(
            path,
            format!("selector needs a list variable, but '{}' is basic", var.variable_name),
        )),
    }
}

fn default_list_selector<S, V>(
    var: &Arc<ListVariable<S, V>>,
) -> Box<dyn MoveSelector<S, ListMove<S, V>>>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    let order = SelectionOrder::default();
    Box::new(
        UnionMoveSelector::<S, ListMove<S, V>>::new(Vec::new())
            .with(ListChangeMoveSelector::new(Arc::clone(var), order))
            .with(ListSwapMoveSelector::new(Arc::clone(var), order))
            .with(ListReverseMoveSelector::new(Arc::clone(var), order)),
    )
}

fn list_selector<S, V>(
    var: &Arc<ListVariable<S, V>>,
    config: &MoveSelectorConfig,
    path: &str,
) -> Result<Box<dyn MoveSelector<S, ListMove<S, V>>>, ConfigurationError>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    match config {
        MoveSelectorConfig::ListChangeMoveSelector(c) => {
            Ok(Box::new(ListChangeMoveSelector::<S, V, ListMove<S, V>>::new(
                Arc::clone(var),
                c.selection_order,
            )))
        }
        MoveSelectorConfig::ListSwapMoveSelector(c) => {
            Ok(Box::new(ListSwapMoveSelector::<S, V, ListMove<S, V>>::new(
                Arc::clone(var),
                c.selection_order,
            )))
        }
        MoveSelectorConfig::ListReverseMoveSelector(c) => {
            Ok(Box::new(ListReverseMoveSelector::<S, V, ListMove<S, V>>::new(
                Arc::clone(var),
                c.selection_order,
            )))
        }
        MoveSelectorConfig::SubListChangeMoveSelector(c) => {
            Ok(Box::new(SubListChangeMoveSelector::<S, V, ListMove<S, V>>::new(
                Arc::clone(var),
                c.minimum_size(),
                c.maximum_size(),
                c.selection_order,
            )))
        }
        MoveSelectorConfig::UnionMoveSelector(c) => {
            let children = c
                .selectors
                .iter()
                .enumerate()
                .map(|(i, child)| list_selector(var, child, &format!("{}.selectors[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(UnionMoveSelector::new(children)))
        }
        _ => Err(ConfigurationError::new(
            path,
            format!("selector needs a basic variable, but '{}' is a list", var.variable_name),
        )),
    }
}

/// Builds the termination a config describes, or `None` when it sets no
/// condition.
///
/// `path` locates the config in error reports.
///
/// # Example
///
/// ```
/// use stratum_config::TerminationConfig;
/// use stratum_solver::manager::termination_from_config;
/// use stratum_test::assignment::Timetable;
///
/// let config = TerminationConfig::default()
///     .with_best_score_limit("0hard/-2soft")
///     .with_step_count_limit(100);
/// let termination = termination_from_config::<Timetable>("termination", &config).unwrap();
/// assert!(termination.is_some());
///
/// let bad = TerminationConfig::default().with_best_score_limit("-2");
/// assert!(termination_from_config::<Timetable>("termination", &bad).is_err());
/// ```
pub fn termination_from_config<S>(
    path: &str,
    config: &TerminationConfig,
) -> Result<Option<Box<dyn Termination<S>>>, ConfigurationError>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
{
    let mut parts: Vec<Box<dyn Termination<S>>> = Vec::new();
    if let Some(limit) = config.time_limit() {
        parts.push(Box::new(TimeTermination::new(limit)));
    }
    if let Some(limit) = config.unimproved_time_limit() {
        parts.push(Box::new(UnimprovedTimeTermination::new(limit)));
    }
    if let Some(limit) = &config.best_score_limit {
        let target = S::Score::parse(limit).map_err(|e| {
            ConfigurationError::new(format!("{}.best_score_limit", path), e.to_string())
        })?;
        parts.push(Box::new(BestScoreTermination::new(target)));
    }
    if config.requires_feasible() {
        parts.push(Box::new(BestScoreFeasibleTermination::new()));
    }
    if let Some(limit) = config.step_count_limit {
        parts.push(Box::new(StepCountTermination::new(limit)));
    }
    if let Some(limit) = config.unimproved_step_count_limit {
        parts.push(Box::new(UnimprovedStepCountTermination::new(limit)));
    }
    if let Some(limit) = config.move_count_limit {
        parts.push(Box::new(MoveCountTermination::new(limit)));
    }

    if parts.len() <= 1 {
        return Ok(parts.pop());
    }
    Ok(Some(match config.termination_composition {
        TerminationComposition::Or => Box::new(OrTermination::new(parts)),
        TerminationComposition::And => Box::new(AndTermination::new(parts)),
    }))
}
