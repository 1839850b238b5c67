//! Solver-level scope.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stratum_config::EnvironmentMode;
use stratum_core::domain::PlanningSolution;
use stratum_core::ScoreCorruptionError;
use stratum_scoring::ScoreDirector;
use tracing::{debug, warn};

use super::Progress;
use crate::event::SolverEventSupport;
use crate::realtime::ProblemChangeReceiver;
use crate::stats::SolverStats;
use crate::termination::Termination;

#[derive(Debug, Clone, Copy)]
struct Mark {
    time: Instant,
    step: u64,
    moves: u64,
}

impl Mark {
    fn at(step: u64, moves: u64) -> Self {
        Self {
            time: Instant::now(),
            step,
            moves,
        }
    }
}

/// Top-level scope for the entire solving process.
///
/// Generic over `D: ScoreDirector<S>` so phases drive the concrete director.
/// The `'t` lifetime bounds the collaborators borrowed from the
/// [`Solver`](crate::solver::Solver): its termination, event listeners and
/// problem-change queue.
pub struct SolverScope<'t, S: PlanningSolution, D: ScoreDirector<S>> {
    score_director: D,
    best_solution: Option<S>,
    best_score: Option<S::Score>,
    best_initialized: bool,
    rng: ChaCha8Rng,
    environment_mode: EnvironmentMode,
    solve_start: Mark,
    phase_start: Mark,
    last_improvement: Mark,
    step_count: u64,
    move_count: u64,
    stats: SolverStats,
    terminate_early: Arc<AtomicBool>,
    termination: Option<&'t dyn Termination<S>>,
    events: Option<&'t SolverEventSupport<S>>,
    problem_changes: Option<&'t ProblemChangeReceiver<S>>,
}

impl<'t, S: PlanningSolution, D: ScoreDirector<S>> SolverScope<'t, S, D> {
    pub fn new(score_director: D) -> Self {
        let now = Mark::at(0, 0);
        Self {
            score_director,
            best_solution: None,
            best_score: None,
            best_initialized: false,
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
            environment_mode: EnvironmentMode::default(),
            solve_start: now,
            phase_start: now,
            last_improvement: now,
            step_count: 0,
            move_count: 0,
            stats: SolverStats::default(),
            terminate_early: Arc::new(AtomicBool::new(false)),
            termination: None,
            events: None,
            problem_changes: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Run-level termination, checked by every phase between steps.
    pub fn with_termination(mut self, termination: &'t dyn Termination<S>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_events(mut self, events: &'t SolverEventSupport<S>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_problem_changes(mut self, receiver: &'t ProblemChangeReceiver<S>) -> Self {
        self.problem_changes = Some(receiver);
        self
    }

    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early = flag;
        self
    }

    /// Resets the clocks and counters at the start of a run.
    pub fn start_solving(&mut self) {
        let now = Mark::at(0, 0);
        self.solve_start = now;
        self.phase_start = now;
        self.last_improvement = now;
        self.step_count = 0;
        self.move_count = 0;
        self.stats.start();
    }

    /// Marks the start of a phase for phase-relative progress.
    pub fn start_phase(&mut self, phase_index: usize, phase_type: &'static str) {
        self.phase_start = Mark::at(self.step_count, self.move_count);
        self.stats.start_phase(phase_index, phase_type);
    }

    pub fn end_phase(&mut self) {
        self.stats.end_phase();
    }

    pub fn score_director(&self) -> &D {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut self.score_director
    }

    /// Splits the scope into its director and random generator.
    pub fn director_and_rng(&mut self) -> (&mut D, &mut ChaCha8Rng) {
        (&mut self.score_director, &mut self.rng)
    }

    pub fn working_solution(&self) -> &S {
        self.score_director.working_solution()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.stats.record_score_calculation();
        self.score_director.calculate_score()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<&S::Score> {
        self.best_score.as_ref()
    }

    /// Replaces the best solution if the working solution beats it.
    ///
    /// An initialized solution always beats an uninitialized one; otherwise
    /// the higher score wins. Returns true when the best solution changed.
    pub fn update_best_solution(&mut self) -> bool {
        let score = self.calculate_score();
        self.update_best_solution_with(score)
    }

    /// Like [`update_best_solution`](Self::update_best_solution) with the
    /// working score already calculated.
    pub fn update_best_solution_with(&mut self, score: S::Score) -> bool {
        let initialized = self.score_director.working_solution().is_initialized();
        let improved = match &self.best_score {
            None => true,
            Some(best) => match (initialized, self.best_initialized) {
                (true, false) => true,
                (false, true) => false,
                _ => score > *best,
            },
        };
        if improved {
            let solution = self.score_director.clone_working_solution();
            self.set_best_solution(solution, score);
        }
        improved
    }

    /// Stores `solution` as the best solution and notifies listeners.
    ///
    /// `score` is written onto the solution, replacing whatever score the
    /// working copy last carried.
    pub fn set_best_solution(&mut self, mut solution: S, score: S::Score) {
        solution.set_score(Some(score));
        debug!(
            event = "new_best",
            step = self.step_count,
            score = %score,
        );
        self.best_initialized = solution.is_initialized();
        if let Some(events) = self.events {
            events.fire_best_solution_changed(&solution, &score);
        }
        self.best_solution = Some(solution);
        self.best_score = Some(score);
        self.last_improvement = Mark::at(self.step_count, self.move_count);
    }

    /// Records one evaluated move.
    pub fn record_move(&mut self, accepted: bool) {
        self.move_count += 1;
        self.stats.record_move(accepted);
    }

    pub fn step_started(&self) {
        if let Some(events) = self.events {
            events.fire_step_started(self.step_count);
        }
    }

    /// Records a completed step and returns the run's step count.
    pub fn step_ended(&mut self, step_score: S::Score) -> u64 {
        if let Some(events) = self.events {
            events.fire_step_ended(self.step_count, &step_score);
        }
        self.step_count += 1;
        self.stats.record_step();
        debug!(
            event = "step",
            step = self.step_count,
            phase_step = self.phase_step_count(),
            score = %step_score,
        );
        self.step_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    /// Steps completed since the current phase started.
    pub fn phase_step_count(&self) -> u64 {
        self.step_count - self.phase_start.step
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Progress since the start of the run.
    pub fn solver_progress(&self) -> Progress<S::Score> {
        self.progress_since(self.solve_start)
    }

    /// Progress since the start of the current phase.
    pub fn phase_progress(&self) -> Progress<S::Score> {
        self.progress_since(self.phase_start)
    }

    fn progress_since(&self, start: Mark) -> Progress<S::Score> {
        let improvement = if self.last_improvement.time >= start.time {
            self.last_improvement
        } else {
            start
        };
        Progress {
            elapsed: start.time.elapsed(),
            step_count: self.step_count - start.step,
            move_count: self.move_count - start.moves,
            best_score: self.best_score.filter(|_| self.best_initialized),
            unimproved_elapsed: improvement.time.elapsed(),
            unimproved_step_count: self.step_count - improvement.step.max(start.step),
        }
    }

    pub fn terminate_early_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early)
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early.load(Ordering::SeqCst)
    }

    /// True once early termination was requested or the run-level
    /// termination fired.
    pub fn is_solver_terminated(&self) -> bool {
        self.is_terminate_early()
            || self
                .termination
                .is_some_and(|t| t.is_terminated(&self.solver_progress()))
    }

    /// Like [`is_solver_terminated`](Self::is_solver_terminated), also
    /// checking the phase's own termination against phase progress.
    pub fn is_phase_terminated(&self, phase_termination: Option<&dyn Termination<S>>) -> bool {
        self.is_solver_terminated()
            || phase_termination.is_some_and(|t| t.is_terminated(&self.phase_progress()))
    }

    /// Compares the working score with a full recalculation when the
    /// environment mode asserts steps.
    pub fn assert_step(&mut self) -> Result<(), ScoreCorruptionError> {
        if self.environment_mode.asserts_steps() {
            self.score_director.assert_score_from_scratch()?;
        }
        Ok(())
    }

    /// Applies every queued problem change to the working solution.
    ///
    /// The changed working solution becomes the new best solution, since the
    /// old best no longer describes the same problem. A change that fails
    /// is logged and skipped. Returns the number of changes applied.
    pub fn process_problem_changes(&mut self) -> usize {
        let Some(receiver) = self.problem_changes else {
            return 0;
        };
        let changes = receiver.drain_pending();
        if changes.is_empty() {
            return 0;
        }
        let mut applied = 0;
        for change in &changes {
            match change.apply(&mut self.score_director) {
                Ok(()) => {
                    debug!(event = "problem_change", change = ?change);
                    applied += 1;
                }
                Err(err) => warn!(
                    event = "problem_change_rejected",
                    change = ?change,
                    error = %err,
                ),
            }
        }
        if applied == 0 {
            return 0;
        }
        let score = self.calculate_score();
        let solution = self.score_director.clone_working_solution();
        self.set_best_solution(solution, score);
        debug!(
            event = "problem_changes_applied",
            count = applied,
            score = %score,
        );
        applied
    }

    pub fn take_best_or_working_solution(self) -> S {
        self.into_result().0
    }

    /// Consumes the scope, returning the best solution and the statistics.
    pub fn into_result(self) -> (S, SolverStats) {
        let solution = match self.best_solution {
            Some(best) => best,
            None => self.score_director.clone_working_solution(),
        };
        (solution, self.stats)
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> fmt::Debug for SolverScope<'_, S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverScope")
            .field("best_score", &self.best_score)
            .field("step_count", &self.step_count)
            .field("move_count", &self.move_count)
            .field("environment_mode", &self.environment_mode)
            .finish()
    }
}
