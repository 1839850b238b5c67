//! Solver implementation.

use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use stratum_config::EnvironmentMode;
use stratum_core::domain::PlanningSolution;
use stratum_core::{SolveFailure, SolverError};
use stratum_scoring::ScoreDirector;
use tracing::info;

use crate::event::{SolverEventListener, SolverEventSupport};
use crate::phase::PhaseList;
use crate::realtime::ProblemChangeReceiver;
use crate::scope::SolverScope;
use crate::stats::SolverStats;
use crate::termination::Termination;

pub use crate::termination::NoTermination;

/// The main solver that optimizes planning solutions.
///
/// Runs its phases in order against one score director, checking the
/// solver-level termination between phases and between the steps of every
/// phase.
///
/// # Type Parameters
/// * `S` - Solution type
/// * `P` - The phases: a tuple of phases or `Vec<Box<dyn Phase>>`
/// * `T` - Solver-level termination
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stratum_solver::heuristic::BasicVariable;
/// use stratum_solver::phase::construction::{
///     ConstructionHeuristicPhase, ConstructionHeuristicType,
/// };
/// use stratum_solver::solver::Solver;
/// use stratum_solver::termination::StepCountTermination;
/// use stratum_test::nqueens::{self, NQueensSolution};
///
/// let row = Arc::new(BasicVariable::new(
///     0, "row", nqueens::queen_count, nqueens::get_queen_row, nqueens::set_queen_row,
///     nqueens::row_range(4),
/// ));
/// let construction = ConstructionHeuristicPhase::new(row, ConstructionHeuristicType::FirstFit);
/// let mut solver = Solver::new((construction,)).with_termination(StepCountTermination::new(100));
///
/// let director = nqueens::incremental_director(NQueensSolution::uninitialized(4)).unwrap();
/// let solution = solver.solve(director).unwrap();
/// assert!(solution.rows().iter().all(Option::is_some));
/// ```
pub struct Solver<S: PlanningSolution, P, T = NoTermination> {
    phases: P,
    termination: T,
    events: SolverEventSupport<S>,
    problem_changes: Option<ProblemChangeReceiver<S>>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
    environment_mode: EnvironmentMode,
    random_seed: Option<u64>,
    last_stats: Option<SolverStats>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S: PlanningSolution, P> Solver<S, P, NoTermination> {
    /// Creates a solver over `phases` that ends when its phases finish.
    pub fn new(phases: P) -> Self {
        Solver {
            phases,
            termination: NoTermination,
            events: SolverEventSupport::new(),
            problem_changes: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
            environment_mode: EnvironmentMode::default(),
            random_seed: None,
            last_stats: None,
            _phantom: PhantomData,
        }
    }
}

impl<S: PlanningSolution, P, T> Solver<S, P, T> {
    /// Replaces the solver-level termination.
    pub fn with_termination<T2: Termination<S>>(self, termination: T2) -> Solver<S, P, T2> {
        Solver {
            phases: self.phases,
            termination,
            events: self.events,
            problem_changes: self.problem_changes,
            terminate_early_flag: self.terminate_early_flag,
            solving: self.solving,
            environment_mode: self.environment_mode,
            random_seed: self.random_seed,
            last_stats: self.last_stats,
            _phantom: PhantomData,
        }
    }

    /// Registers a listener for best-solution and solving start/end events.
    pub fn with_event_listener(mut self, listener: Arc<dyn SolverEventListener<S>>) -> Self {
        self.events.add_solver_listener(listener);
        self
    }

    /// Replaces every registered listener, including phase and step ones.
    pub fn with_events(mut self, events: SolverEventSupport<S>) -> Self {
        self.events = events;
        self
    }

    /// Applies changes sent through the matching
    /// [`SolverHandle`](crate::realtime::SolverHandle) between steps.
    ///
    /// The handle's early-termination request then stops this solver too.
    pub fn with_problem_changes(mut self, receiver: ProblemChangeReceiver<S>) -> Self {
        self.terminate_early_flag = receiver.terminate_flag();
        self.problem_changes = Some(receiver);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Requests early termination of the solving process.
    ///
    /// The run stops at the next step boundary and returns its best
    /// solution. Returns true if a run was in progress.
    pub fn terminate_early(&self) -> bool {
        self.terminate_early_flag.store(true, Ordering::SeqCst);
        self.solving.load(Ordering::SeqCst)
    }

    /// The flag [`terminate_early`](Self::terminate_early) sets, for use from
    /// another thread while `solve` runs.
    pub fn terminate_early_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    /// Returns true if the solver is currently solving.
    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    /// Statistics of the last finished run.
    pub fn last_stats(&self) -> Option<&SolverStats> {
        self.last_stats.as_ref()
    }

    pub fn phases(&self) -> &P {
        &self.phases
    }
}

impl<S, P, T> Solver<S, P, T>
where
    S: PlanningSolution,
    T: Termination<S>,
{
    /// Solves starting from the director's working solution.
    ///
    /// Returns the best solution found. When a phase fails, the run stops
    /// and the failure carries the best solution found before the error.
    pub fn solve<D>(&mut self, score_director: D) -> Result<S, SolveFailure<S>>
    where
        D: ScoreDirector<S>,
        P: PhaseList<S, D>,
    {
        self.solving.store(true, Ordering::SeqCst);
        if let Some(receiver) = &self.problem_changes {
            receiver.set_solving(true);
        }
        let started = Instant::now();

        let mut scope = SolverScope::new(score_director)
            .with_environment_mode(self.environment_mode)
            .with_terminate_early_flag(Arc::clone(&self.terminate_early_flag))
            .with_termination(&self.termination)
            .with_events(&self.events);
        if let Some(receiver) = &self.problem_changes {
            scope = scope.with_problem_changes(receiver);
        }
        match (self.random_seed, self.environment_mode.is_reproducible()) {
            (Some(seed), _) => scope = scope.with_seed(seed),
            (None, true) => scope = scope.with_seed(0),
            (None, false) => {}
        }
        scope.start_solving();

        info!(
            event = "solve_start",
            phases = self.phases.len(),
            environment_mode = ?self.environment_mode,
            random_seed = ?self.random_seed,
        );
        self.events.fire_solving_started(scope.working_solution());

        let mut failure = None;
        for index in 0..self.phases.len() {
            scope.process_problem_changes();
            if scope.is_solver_terminated() {
                break;
            }
            let Some(phase) = self.phases.phase_mut(index) else {
                break;
            };
            let phase_type = phase.phase_type_name();

            scope.start_phase(index, phase_type);
            self.events.fire_phase_started(index, phase_type);
            info!(event = "phase_start", phase = phase_type, phase_index = index);

            let outcome = phase.solve(&mut scope);
            scope.end_phase();

            let progress = scope.phase_progress();
            let speed = scope
                .stats()
                .phases
                .last()
                .map_or(0.0, |p| p.moves_per_second());
            info!(
                event = "phase_end",
                phase = phase_type,
                phase_index = index,
                duration_ms = progress.elapsed.as_millis() as u64,
                steps = progress.step_count,
                speed = speed as u64,
                score = %ScoreText(scope.best_score()),
            );
            self.events.fire_phase_ended(index, phase_type);

            if let Err(error) = outcome {
                failure = Some(error);
                break;
            }
        }

        let terminated_early = scope.is_terminate_early();
        let score = scope.best_score().copied();
        let (solution, stats) = scope.into_result();

        info!(
            event = "solve_end",
            duration_ms = started.elapsed().as_millis() as u64,
            steps = stats.step_count,
            moves = stats.moves_evaluated,
            speed = stats.moves_per_second() as u64,
            score = %ScoreText(score.as_ref()),
            terminated_early,
            failed = failure.is_some(),
        );
        self.events.fire_solving_ended(&solution, terminated_early);

        self.last_stats = Some(stats);
        self.solving.store(false, Ordering::SeqCst);
        self.terminate_early_flag.store(false, Ordering::SeqCst);
        if let Some(receiver) = &self.problem_changes {
            receiver.set_solving(false);
        }

        match failure {
            None => Ok(solution),
            Some(error) => Err(SolveFailure::new(solution, error)),
        }
    }

    /// Like [`solve`](Self::solve), dropping the best solution on failure.
    pub fn solve_or_error<D>(&mut self, score_director: D) -> Result<S, SolverError>
    where
        D: ScoreDirector<S>,
        P: PhaseList<S, D>,
    {
        self.solve(score_director).map_err(|failure| failure.error)
    }
}

impl<S: PlanningSolution, P: Debug, T: Debug> Debug for Solver<S, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .field("environment_mode", &self.environment_mode)
            .field("random_seed", &self.random_seed)
            .field("events", &self.events)
            .finish()
    }
}

struct ScoreText<'a, Sc>(Option<&'a Sc>);

impl<Sc: Display> Display for ScoreText<'_, Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(score) => write!(f, "{}", score),
            None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
