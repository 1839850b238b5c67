//! Solver lifecycle callbacks.
//!
//! Three listener traits cover the three granularities a solve reports at:
//! the whole run ([`SolverEventListener`]), each phase
//! ([`PhaseLifecycleListener`]) and each step ([`StepLifecycleListener`]).
//! [`SolverEventSupport`] holds the registered listeners and calls them in
//! registration order, on the solving thread.
//!
//! ```
//! use std::sync::Arc;
//! use stratum_solver::event::{SolverEventListener, SolverEventSupport};
//! use stratum_core::domain::PlanningSolution;
//! use stratum_core::score::SimpleScore;
//!
//! #[derive(Clone, Debug)]
//! struct Plan { score: Option<SimpleScore> }
//!
//! impl PlanningSolution for Plan {
//!     type Score = SimpleScore;
//!     fn score(&self) -> Option<Self::Score> { self.score }
//!     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
//! }
//!
//! #[derive(Debug)]
//! struct PrintBest;
//!
//! impl SolverEventListener<Plan> for PrintBest {
//!     fn on_best_solution_changed(&self, _plan: &Plan, score: &SimpleScore) {
//!         println!("best so far: {}", score);
//!     }
//! }
//!
//! let mut events = SolverEventSupport::<Plan>::new();
//! events.add_solver_listener(Arc::new(PrintBest));
//! assert_eq!(events.listener_count(), 1);
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use tracing::{debug, info};

/// Run-level callbacks.
pub trait SolverEventListener<S: PlanningSolution>: Send + Sync + Debug {
    /// A strictly better solution was found. `solution` is a detached copy.
    fn on_best_solution_changed(&self, solution: &S, score: &S::Score);

    fn on_solving_started(&self, _solution: &S) {}

    /// Called once per run with the best solution, failed runs included.
    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {}
}

/// Phase boundaries, with the phase's position in the solver's list and its
/// type name (`"LocalSearch"`, `"ConstructionHeuristic"`, ...).
pub trait PhaseLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    fn on_phase_started(&self, phase_index: usize, phase_type: &str);

    fn on_phase_ended(&self, phase_index: usize, phase_type: &str);
}

/// Step boundaries. `step_index` counts steps across the whole run.
pub trait StepLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    fn on_step_started(&self, step_index: u64);

    /// `score` is the working solution's score after the step's move.
    fn on_step_ended(&self, step_index: u64, score: &S::Score);
}

/// Registered listeners of a solver.
///
/// Cloning shares the listeners, so a listener registered once observes
/// every clone.
pub struct SolverEventSupport<S: PlanningSolution> {
    solver: Vec<Arc<dyn SolverEventListener<S>>>,
    phase: Vec<Arc<dyn PhaseLifecycleListener<S>>>,
    step: Vec<Arc<dyn StepLifecycleListener<S>>>,
}

impl<S: PlanningSolution> SolverEventSupport<S> {
    pub fn new() -> Self {
        Self {
            solver: Vec::new(),
            phase: Vec::new(),
            step: Vec::new(),
        }
    }

    pub fn add_solver_listener(&mut self, listener: Arc<dyn SolverEventListener<S>>) {
        self.solver.push(listener);
    }

    pub fn add_phase_listener(&mut self, listener: Arc<dyn PhaseLifecycleListener<S>>) {
        self.phase.push(listener);
    }

    pub fn add_step_listener(&mut self, listener: Arc<dyn StepLifecycleListener<S>>) {
        self.step.push(listener);
    }

    /// Total registrations; a listener added for two granularities counts twice.
    pub fn listener_count(&self) -> usize {
        self.solver.len() + self.phase.len() + self.step.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }

    pub fn fire_best_solution_changed(&self, solution: &S, score: &S::Score) {
        self.solver
            .iter()
            .for_each(|l| l.on_best_solution_changed(solution, score));
    }

    pub fn fire_solving_started(&self, solution: &S) {
        self.solver.iter().for_each(|l| l.on_solving_started(solution));
    }

    pub fn fire_solving_ended(&self, solution: &S, is_terminated_early: bool) {
        self.solver
            .iter()
            .for_each(|l| l.on_solving_ended(solution, is_terminated_early));
    }

    pub fn fire_phase_started(&self, phase_index: usize, phase_type: &str) {
        self.phase
            .iter()
            .for_each(|l| l.on_phase_started(phase_index, phase_type));
    }

    pub fn fire_phase_ended(&self, phase_index: usize, phase_type: &str) {
        self.phase
            .iter()
            .for_each(|l| l.on_phase_ended(phase_index, phase_type));
    }

    pub fn fire_step_started(&self, step_index: u64) {
        self.step.iter().for_each(|l| l.on_step_started(step_index));
    }

    pub fn fire_step_ended(&self, step_index: u64, score: &S::Score) {
        self.step
            .iter()
            .for_each(|l| l.on_step_ended(step_index, score));
    }
}

impl<S: PlanningSolution> Clone for SolverEventSupport<S> {
    fn clone(&self) -> Self {
        Self {
            solver: self.solver.clone(),
            phase: self.phase.clone(),
            step: self.step.clone(),
        }
    }
}

impl<S: PlanningSolution> Default for SolverEventSupport<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Debug for SolverEventSupport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverEventSupport")
            .field("solver", &self.solver)
            .field("phase", &self.phase)
            .field("step", &self.step)
            .finish()
    }
}

/// Mirrors every callback into `tracing`, tagged with a job label.
///
/// Run and phase callbacks log at INFO, step and best-solution callbacks at
/// DEBUG.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventListener {
    label: String,
}

impl LoggingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<S: PlanningSolution> SolverEventListener<S> for LoggingEventListener {
    fn on_best_solution_changed(&self, _solution: &S, score: &S::Score) {
        debug!(job = %self.label, event = "listener_best", score = %score);
    }

    fn on_solving_started(&self, _solution: &S) {
        info!(job = %self.label, event = "listener_started");
    }

    fn on_solving_ended(&self, solution: &S, is_terminated_early: bool) {
        info!(
            job = %self.label,
            event = "listener_ended",
            terminated_early = is_terminated_early,
            initialized = solution.is_initialized(),
        );
    }
}

impl<S: PlanningSolution> PhaseLifecycleListener<S> for LoggingEventListener {
    fn on_phase_started(&self, phase_index: usize, phase_type: &str) {
        info!(job = %self.label, event = "listener_phase_started", phase_index, phase = phase_type);
    }

    fn on_phase_ended(&self, phase_index: usize, phase_type: &str) {
        info!(job = %self.label, event = "listener_phase_ended", phase_index, phase = phase_type);
    }
}

impl<S: PlanningSolution> StepLifecycleListener<S> for LoggingEventListener {
    fn on_step_started(&self, _step_index: u64) {}

    fn on_step_ended(&self, step_index: u64, score: &S::Score) {
        debug!(job = %self.label, event = "listener_step", step_index, score = %score);
    }
}

macro_rules! counting_listener {
    ($($count:ident),+ $(,)?) => {
        /// Counts every callback it receives.
        #[derive(Debug, Default)]
        pub struct CountingEventListener {
            $($count: AtomicUsize,)+
        }

        impl CountingEventListener {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $count(&self) -> usize {
                    self.$count.load(Ordering::SeqCst)
                }
            )+

            pub fn reset(&self) {
                $(self.$count.store(0, Ordering::SeqCst);)+
            }
        }
    };
}

counting_listener!(
    best_solution_count,
    solving_started_count,
    solving_ended_count,
    phase_started_count,
    phase_ended_count,
    step_started_count,
    step_ended_count,
);

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

impl<S: PlanningSolution> SolverEventListener<S> for CountingEventListener {
    fn on_best_solution_changed(&self, _solution: &S, _score: &S::Score) {
        bump(&self.best_solution_count);
    }

    fn on_solving_started(&self, _solution: &S) {
        bump(&self.solving_started_count);
    }

    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {
        bump(&self.solving_ended_count);
    }
}

impl<S: PlanningSolution> PhaseLifecycleListener<S> for CountingEventListener {
    fn on_phase_started(&self, _phase_index: usize, _phase_type: &str) {
        bump(&self.phase_started_count);
    }

    fn on_phase_ended(&self, _phase_index: usize, _phase_type: &str) {
        bump(&self.phase_ended_count);
    }
}

impl<S: PlanningSolution> StepLifecycleListener<S> for CountingEventListener {
    fn on_step_started(&self, _step_index: u64) {
        bump(&self.step_started_count);
    }

    fn on_step_ended(&self, _step_index: u64, _score: &S::Score) {
        bump(&self.step_ended_count);
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
