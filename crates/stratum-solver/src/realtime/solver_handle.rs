//! Channel pair for submitting problem changes to a solver.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;

use super::problem_change::BoxedProblemChange;
use super::ProblemChange;

/// Result of a problem change submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemChangeResult {
    /// The change waits for the next step boundary.
    Queued,
    /// The receiving solver is gone; the change was dropped.
    SolverDropped,
}

/// Sending half: submits problem changes and early-termination requests.
///
/// Changes submitted before solving starts are applied at the first step
/// boundary.
///
/// # Example
///
/// ```
/// use stratum_solver::realtime::{ProblemChangeResult, RemoveEntity, SolverHandle};
/// use stratum_test::assignment::Timetable;
///
/// let (handle, receiver) = SolverHandle::<Timetable>::new();
/// let change = RemoveEntity::new(0, 1, |t: &mut Timetable| &mut t.lessons);
/// assert_eq!(handle.add_problem_change(change), ProblemChangeResult::Queued);
///
/// drop(receiver);
/// let change = RemoveEntity::new(0, 1, |t: &mut Timetable| &mut t.lessons);
/// assert_eq!(handle.add_problem_change(change), ProblemChangeResult::SolverDropped);
/// ```
pub struct SolverHandle<S: PlanningSolution> {
    change_tx: Sender<BoxedProblemChange<S>>,
    solving: Arc<AtomicBool>,
    terminate_early: Arc<AtomicBool>,
}

impl<S: PlanningSolution> SolverHandle<S> {
    /// Creates a handle and the receiver to pass to the solver.
    pub fn new() -> (Self, ProblemChangeReceiver<S>) {
        let (tx, rx) = mpsc::channel();
        let solving = Arc::new(AtomicBool::new(false));
        let terminate_early = Arc::new(AtomicBool::new(false));

        let handle = Self {
            change_tx: tx,
            solving: Arc::clone(&solving),
            terminate_early: Arc::clone(&terminate_early),
        };
        let receiver = ProblemChangeReceiver {
            change_rx: rx,
            solving,
            terminate_early,
        };
        (handle, receiver)
    }

    pub fn add_problem_change<P: ProblemChange<S> + 'static>(
        &self,
        change: P,
    ) -> ProblemChangeResult {
        self.add_problem_change_boxed(Box::new(change))
    }

    pub fn add_problem_change_boxed(&self, change: BoxedProblemChange<S>) -> ProblemChangeResult {
        match self.change_tx.send(change) {
            Ok(()) => ProblemChangeResult::Queued,
            Err(_) => ProblemChangeResult::SolverDropped,
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Requests early termination. The solver stops at the next step
    /// boundary and keeps its best solution.
    pub fn terminate_early(&self) {
        self.terminate_early.store(true, Ordering::SeqCst);
    }

    pub fn is_terminate_early_requested(&self) -> bool {
        self.terminate_early.load(Ordering::SeqCst)
    }
}

impl<S: PlanningSolution> Clone for SolverHandle<S> {
    fn clone(&self) -> Self {
        Self {
            change_tx: self.change_tx.clone(),
            solving: Arc::clone(&self.solving),
            terminate_early: Arc::clone(&self.terminate_early),
        }
    }
}

impl<S: PlanningSolution> Debug for SolverHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverHandle")
            .field("solving", &self.is_solving())
            .field("terminate_early", &self.is_terminate_early_requested())
            .finish()
    }
}

/// Receiving half, owned by the solver.
pub struct ProblemChangeReceiver<S: PlanningSolution> {
    change_rx: Receiver<BoxedProblemChange<S>>,
    solving: Arc<AtomicBool>,
    terminate_early: Arc<AtomicBool>,
}

impl<S: PlanningSolution> ProblemChangeReceiver<S> {
    /// Takes every queued change without blocking, in submission order.
    pub fn drain_pending(&self) -> Vec<BoxedProblemChange<S>> {
        self.change_rx.try_iter().collect()
    }

    pub fn is_terminate_early_requested(&self) -> bool {
        self.terminate_early.load(Ordering::SeqCst)
    }

    /// The flag shared with every handle, for the solver's scope.
    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early)
    }

    pub fn set_solving(&self, solving: bool) {
        self.solving.store(solving, Ordering::SeqCst);
    }

    pub fn clear_terminate_early(&self) {
        self.terminate_early.store(false, Ordering::SeqCst);
    }
}

impl<S: PlanningSolution> Debug for ProblemChangeReceiver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemChangeReceiver")
            .field("solving", &self.solving.load(Ordering::SeqCst))
            .finish()
    }
}
