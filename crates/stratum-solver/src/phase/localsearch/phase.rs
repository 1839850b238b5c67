//! Local search phase implementation.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use stratum_core::domain::PlanningSolution;
use stratum_core::SolverError;
use stratum_scoring::ScoreDirector;
use tracing::debug;

use super::acceptor::{AcceptContext, Acceptor};
use super::forager::AcceptedCountForager;
use crate::heuristic::r#move::{Move, MoveArena};
use crate::heuristic::selector::MoveSelector;
use crate::phase::{evaluate_move, Phase};
use crate::scope::SolverScope;
use crate::termination::Termination;

/// Local search phase that improves an existing solution.
///
/// Each step:
/// 1. fills the arena from the move selector
/// 2. scores each doable move, undoing it afterwards
/// 3. offers the score to the acceptor and accepted indices to the forager
/// 4. takes the picked move out of the arena and applies it for good
///
/// The phase ends when its termination fires, the selector yields no moves
/// or no move is accepted.
///
/// # Parallel evaluation
///
/// With `move_thread_count > 1`, step scoring runs on a rayon pool. Each
/// worker owns a clone of the score director and scores one contiguous
/// chunk of the arena; every picked move is replayed on all clones.
/// Acceptance and foraging then walk the merged scores in arena order, so a
/// seeded run picks the same moves with any thread count.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `MS` - The move selector type
/// * `A` - The acceptor type
pub struct LocalSearchPhase<S, M, MS, A>
where
    S: PlanningSolution,
{
    move_selector: MS,
    acceptor: A,
    forager: AcceptedCountForager<S::Score>,
    arena: MoveArena<M>,
    termination: Option<Box<dyn Termination<S>>>,
    move_thread_count: usize,
    pool: Option<ThreadPool>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M, MS, A> LocalSearchPhase<S, M, MS, A>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S>,
{
    /// Creates a phase that evaluates every move of a step before picking.
    pub fn new(move_selector: MS, acceptor: A) -> Self {
        Self {
            move_selector,
            acceptor,
            forager: AcceptedCountForager::unlimited(),
            arena: MoveArena::new(),
            termination: None,
            move_thread_count: 1,
            pool: None,
            _phantom: PhantomData,
        }
    }

    pub fn with_forager(mut self, forager: AcceptedCountForager<S::Score>) -> Self {
        self.forager = forager;
        self
    }

    /// Phase termination, checked against phase progress.
    pub fn with_termination(mut self, termination: impl Termination<S> + 'static) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_boxed_termination(mut self, termination: Option<Box<dyn Termination<S>>>) -> Self {
        self.termination = termination;
        self
    }

    /// Number of threads scoring moves; 0 and 1 both mean no pool.
    pub fn with_move_thread_count(mut self, move_thread_count: usize) -> Self {
        self.move_thread_count = move_thread_count.max(1);
        self.pool = None;
        self
    }

    fn ensure_pool(&mut self) -> Result<(), SolverError> {
        if self.move_thread_count > 1 && self.pool.is_none() {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.move_thread_count)
                .thread_name(|i| format!("stratum-move-{}", i))
                .build()
                .map_err(|e| SolverError::InvalidState(format!("move thread pool: {}", e)))?;
            self.pool = Some(pool);
        }
        Ok(())
    }

    fn fork<D: ScoreDirector<S> + Clone>(&self, solver_scope: &SolverScope<'_, S, D>) -> Vec<D> {
        if self.pool.is_none() {
            return Vec::new();
        }
        (0..self.move_thread_count)
            .map(|_| solver_scope.score_director().clone())
            .collect()
    }

    // Scores the arena and feeds the forager; returns the picked index.
    fn forage<D: ScoreDirector<S> + Clone>(
        &mut self,
        solver_scope: &mut SolverScope<'_, S, D>,
        forks: &mut [D],
        last_step_score: &S::Score,
        assert_moves: bool,
    ) -> Result<Option<(usize, S::Score)>, SolverError> {
        let best_score = solver_scope.best_score().copied().unwrap_or(*last_step_score);
        let needs_signatures = self.acceptor.needs_signatures();
        self.forager.step_started();

        let precomputed = match &self.pool {
            Some(pool) if !forks.is_empty() => Some(score_in_parallel(
                pool,
                self.arena.as_slice(),
                forks,
                assert_moves,
            )?),
            _ => None,
        };

        let mut quit = false;
        for index in 0..self.arena.len() {
            let Some(m) = self.arena.get(index) else {
                continue;
            };
            let (director, rng) = solver_scope.director_and_rng();
            let move_score = match &precomputed {
                Some(scores) => match scores.get(index).copied().flatten() {
                    Some(score) => score,
                    None => continue,
                },
                None if quit => break,
                None => {
                    if !m.is_doable(&*director) {
                        continue;
                    }
                    evaluate_move::<S, _>(&mut *director, m, assert_moves)?
                }
            };
            if quit {
                solver_scope.record_move(false);
                continue;
            }

            let signature = needs_signatures.then(|| m.signature(&*director));
            let accepted = self.acceptor.is_accepted(
                &AcceptContext {
                    last_step_score,
                    best_score: &best_score,
                    move_score: &move_score,
                    signature: signature.as_ref(),
                },
                rng,
            );
            solver_scope.record_move(accepted);
            if accepted {
                self.forager
                    .add_move_with_scores(index, move_score, last_step_score, &best_score);
                quit = self.forager.is_quit_early();
            }
        }

        Ok(self.forager.pick_move(solver_scope.rng()))
    }
}

// Scores each arena chunk on its own director clone; `None` marks an empty
// or undoable slot.
fn score_in_parallel<S, M, D>(
    pool: &ThreadPool,
    moves: &[Option<M>],
    forks: &mut [D],
    assert_moves: bool,
) -> Result<Vec<Option<S::Score>>, SolverError>
where
    S: PlanningSolution,
    M: Move<S>,
    D: ScoreDirector<S>,
{
    if moves.is_empty() {
        return Ok(Vec::new());
    }
    let chunk_size = moves.len().div_ceil(forks.len());
    let chunks: Vec<Vec<Option<S::Score>>> = pool.install(|| {
        forks
            .par_iter_mut()
            .zip(moves.par_chunks(chunk_size))
            .map(|(fork, chunk)| {
                chunk
                    .iter()
                    .map(|slot| match slot {
                        Some(m) if m.is_doable(&*fork) => {
                            evaluate_move::<S, M>(&mut *fork, m, assert_moves).map(Some)
                        }
                        _ => Ok(None),
                    })
                    .collect::<Result<Vec<_>, SolverError>>()
            })
            .collect::<Result<Vec<_>, SolverError>>()
    })?;
    Ok(chunks.into_iter().flatten().collect())
}

impl<S, M, MS, A> Debug for LocalSearchPhase<S, M, MS, A>
where
    S: PlanningSolution,
    MS: Debug,
    A: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("termination", &self.termination)
            .field("move_thread_count", &self.move_thread_count)
            .finish()
    }
}

impl<S, D, M, MS, A> Phase<S, D> for LocalSearchPhase<S, M, MS, A>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + Clone,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S>,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<'_, S, D>) -> Result<(), SolverError> {
        self.ensure_pool()?;
        let assert_moves = solver_scope.environment_mode().asserts_moves();
        let mut forks = self.fork(solver_scope);

        let mut last_step_score = solver_scope.calculate_score();
        if solver_scope.best_score().is_none() {
            solver_scope.update_best_solution();
        }
        self.acceptor.phase_started(&last_step_score);

        loop {
            if solver_scope.process_problem_changes() > 0 {
                last_step_score = solver_scope.calculate_score();
                self.acceptor.phase_started(&last_step_score);
                forks = self.fork(solver_scope);
            }
            if solver_scope.is_phase_terminated(self.termination.as_deref()) {
                break;
            }
            solver_scope.step_started();

            self.arena.reset();
            let (director, rng) = solver_scope.director_and_rng();
            self.move_selector.fill(&*director, rng, &mut self.arena);
            if self.arena.is_empty() {
                debug!(event = "empty_neighborhood", step = solver_scope.step_count());
                break;
            }

            let picked = self.forage(solver_scope, &mut forks, &last_step_score, assert_moves)?;
            let Some(m) = picked.and_then(|(index, _)| self.arena.take(index)) else {
                debug!(event = "no_accepted_move", step = solver_scope.step_count());
                break;
            };

            let signature = self
                .acceptor
                .needs_signatures()
                .then(|| m.signature(solver_scope.score_director()));
            m.do_move(solver_scope.score_director_mut())?;
            for fork in &mut forks {
                m.do_move(fork)?;
            }

            let step_score = solver_scope.calculate_score();
            self.acceptor.step_ended(&step_score, signature.as_ref());
            last_step_score = step_score;
            solver_scope.step_ended(step_score);
            solver_scope.assert_step()?;
            solver_scope.update_best_solution_with(step_score);
        }

        self.acceptor.phase_ended();
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}
