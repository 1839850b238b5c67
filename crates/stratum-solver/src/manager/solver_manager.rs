//! Concurrent solving jobs.

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use stratum_core::domain::PlanningSolution;
use stratum_core::score::ParseableScore;
use stratum_core::{SolveFailure, SolverError};
use stratum_scoring::ScoreDirector;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use super::SolverFactory;
use crate::event::SolverEventListener;
use crate::heuristic::variable::PlanningValue;
use crate::realtime::{ProblemChange, ProblemChangeResult, SolverHandle};

/// Identifies one job of a [`SolverManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Whether a job's thread is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    Solving,
    NotSolving,
}

/// A new best solution of one job.
#[derive(Debug, Clone)]
pub struct BestSolution<S: PlanningSolution> {
    pub job: JobId,
    pub solution: S,
    pub score: S::Score,
}

/// Stream of a job's best solutions, closed when the job ends.
pub type BestSolutionReceiver<S> = UnboundedReceiver<BestSolution<S>>;

type JobResult<S> = Result<S, SolveFailure<S>>;

struct Job<S: PlanningSolution> {
    handle: SolverHandle<S>,
    latest: Arc<Mutex<S>>,
    thread: Option<JoinHandle<JobResult<S>>>,
}

// Publishes every new best solution of one job.
struct BestSolutionPublisher<S: PlanningSolution> {
    job: JobId,
    latest: Arc<Mutex<S>>,
    sender: UnboundedSender<BestSolution<S>>,
}

impl<S: PlanningSolution> SolverEventListener<S> for BestSolutionPublisher<S> {
    fn on_best_solution_changed(&self, solution: &S, score: &S::Score) {
        *lock(&self.latest) = solution.clone();
        // Nobody listening is fine; the latest solution stays queryable.
        let _ = self.sender.send(BestSolution {
            job: self.job,
            solution: solution.clone(),
            score: *score,
        });
    }
}

impl<S: PlanningSolution> Debug for BestSolutionPublisher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestSolutionPublisher")
            .field("job", &self.job)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of solving jobs.
///
/// Each job runs on its own thread with its own solver, score director and
/// solution. Jobs share nothing but the [`SolverFactory`] that creates their
/// solvers. Dropping the manager terminates and joins every job.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stratum_config::{SolverConfig, TerminationConfig};
/// use stratum_solver::heuristic::BasicVariable;
/// use stratum_solver::manager::{SolverFactory, SolverManager, VariableBinding};
/// use stratum_test::nqueens::{self, NQueensSolution};
///
/// let row = Arc::new(BasicVariable::new(
///     0, "row", nqueens::queen_count, nqueens::get_queen_row, nqueens::set_queen_row,
///     nqueens::row_range(4),
/// ));
/// let config = SolverConfig::new()
///     .with_random_seed(1)
///     .with_termination(TerminationConfig::default().with_step_count_limit(50));
/// let factory = SolverFactory::new(config, VariableBinding::Basic(row), |s| {
///     nqueens::incremental_director(s).map_err(Into::into)
/// })
/// .unwrap();
///
/// let manager = SolverManager::new(factory);
/// let (job, _best) = manager.solve(NQueensSolution::uninitialized(4)).unwrap();
/// let solution = manager.wait(job).unwrap().unwrap();
/// assert!(solution.rows().iter().all(Option::is_some));
/// ```
pub struct SolverManager<S: PlanningSolution, V, D> {
    factory: Arc<SolverFactory<S, V, D>>,
    jobs: Mutex<HashMap<JobId, Job<S>>>,
    next_id: AtomicU64,
}

impl<S, V, D> SolverManager<S, V, D>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    V: PlanningValue,
    D: ScoreDirector<S> + Clone + Send + 'static,
{
    pub fn new(factory: SolverFactory<S, V, D>) -> Self {
        Self {
            factory: Arc::new(factory),
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn factory(&self) -> &SolverFactory<S, V, D> {
        &self.factory
    }

    /// Starts solving `problem` on a new thread.
    ///
    /// Returns the job's id and the stream of its best solutions.
    ///
    /// # Errors
    ///
    /// Fails when the solver or director cannot be built, or the thread
    /// cannot be spawned. No job is registered then.
    pub fn solve(&self, problem: S) -> Result<(JobId, BestSolutionReceiver<S>), SolverError> {
        let job = JobId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = mpsc::unbounded_channel();
        let (handle, changes) = SolverHandle::new();
        let latest = Arc::new(Mutex::new(problem.clone()));

        let publisher = BestSolutionPublisher {
            job,
            latest: Arc::clone(&latest),
            sender,
        };
        let mut solver = self
            .factory
            .create_solver()?
            .with_event_listener(Arc::new(publisher))
            .with_problem_changes(changes);
        let director = self.factory.build_director(problem)?;

        let thread = thread::Builder::new()
            .name(format!("stratum-{}", job.0))
            .spawn(move || {
                let result = solver.solve(director);
                match &result {
                    Ok(_) => info!(event = "job_finished", %job),
                    Err(failure) => warn!(event = "job_failed", %job, error = %failure.error),
                }
                result
            })
            .map_err(|e| SolverError::InvalidState(format!("cannot spawn {}: {}", job, e)))?;

        lock(&self.jobs).insert(
            job,
            Job {
                handle,
                latest,
                thread: Some(thread),
            },
        );
        info!(event = "job_submitted", %job);
        Ok((job, receiver))
    }

    /// Queues a change for a job's solver.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidState`] for an unknown job.
    pub fn add_problem_change<P>(
        &self,
        job: JobId,
        change: P,
    ) -> Result<ProblemChangeResult, SolverError>
    where
        P: ProblemChange<S> + 'static,
    {
        let jobs = lock(&self.jobs);
        let entry = jobs
            .get(&job)
            .ok_or_else(|| SolverError::InvalidState(format!("unknown {}", job)))?;
        Ok(entry.handle.add_problem_change(change))
    }

    /// Asks a job to stop at its next step boundary.
    ///
    /// Returns false for unknown or finished jobs.
    pub fn terminate_early(&self, job: JobId) -> bool {
        let jobs = lock(&self.jobs);
        match jobs.get(&job) {
            Some(entry) if !is_finished(entry) => {
                entry.handle.terminate_early();
                true
            }
            _ => false,
        }
    }

    pub fn status(&self, job: JobId) -> Option<SolverStatus> {
        lock(&self.jobs).get(&job).map(|entry| {
            if is_finished(entry) {
                SolverStatus::NotSolving
            } else {
                SolverStatus::Solving
            }
        })
    }

    /// The job's latest best solution, or its problem before the first one.
    pub fn best_solution(&self, job: JobId) -> Option<S> {
        lock(&self.jobs)
            .get(&job)
            .map(|entry| lock(&entry.latest).clone())
    }

    /// Blocks until the job ends and returns its result.
    ///
    /// The job stays registered; later calls return `None` once the result
    /// has been taken. A panicked job yields its latest best solution.
    pub fn wait(&self, job: JobId) -> Option<JobResult<S>> {
        let (thread, latest) = {
            let mut jobs = lock(&self.jobs);
            let entry = jobs.get_mut(&job)?;
            (entry.thread.take()?, Arc::clone(&entry.latest))
        };
        Some(join(job, thread, &latest))
    }

    /// Terminates the job, waits for it and forgets it.
    ///
    /// Returns the job's final best solution.
    pub fn remove(&self, job: JobId) -> Option<S> {
        let entry = lock(&self.jobs).remove(&job)?;
        entry.handle.terminate_early();
        let solution = match entry.thread {
            Some(thread) => match join(job, thread, &entry.latest) {
                Ok(solution) => solution,
                Err(failure) => failure.best_solution,
            },
            None => lock(&entry.latest).clone(),
        };
        info!(event = "job_removed", %job);
        Some(solution)
    }

    pub fn job_ids(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = lock(&self.jobs).keys().copied().collect();
        ids.sort();
        ids
    }
}

fn is_finished<S: PlanningSolution>(job: &Job<S>) -> bool {
    job.thread.as_ref().map_or(true, JoinHandle::is_finished)
}

fn join<S: PlanningSolution>(
    job: JobId,
    thread: JoinHandle<JobResult<S>>,
    latest: &Mutex<S>,
) -> JobResult<S> {
    thread.join().unwrap_or_else(|_| {
        warn!(event = "job_panicked", %job);
        Err(SolveFailure::new(
            lock(latest).clone(),
            SolverError::InvalidState(format!("{} panicked", job)),
        ))
    })
}

impl<S: PlanningSolution, V, D> Drop for SolverManager<S, V, D> {
    fn drop(&mut self) {
        let jobs = std::mem::take(&mut *lock(&self.jobs));
        for (_, job) in jobs {
            job.handle.terminate_early();
            if let Some(thread) = job.thread {
                let _ = thread.join();
            }
        }
    }
}

impl<S: PlanningSolution, V, D> Debug for SolverManager<S, V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<JobId> = lock(&self.jobs).keys().copied().collect();
        ids.sort();
        f.debug_struct("SolverManager")
            .field("factory", &self.factory)
            .field("jobs", &ids)
            .finish()
    }
}
