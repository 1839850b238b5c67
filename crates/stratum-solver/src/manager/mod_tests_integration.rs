// Tests for SolverManager jobs.

use std::thread;
use std::time::{Duration, Instant};

use stratum_config::{
    AcceptorConfig, ConstructionHeuristicConfig, LocalSearchConfig, PhaseConfig,
    SimulatedAnnealingConfig, SolverConfig, TerminationConfig,
};
use stratum_core::SolverError;
use stratum_scoring::ScoreDirector;
use stratum_test::assignment::Lesson;

use super::*;
use crate::realtime::{AddEntity, ClosureProblemChange, ProblemChangeResult};
use crate::test_utils::{assignment, lesson_room, nqueens, queen_row, NQueensSolution, Timetable};

fn queens_manager(
    steps: u64,
) -> SolverManager<NQueensSolution, i64, impl ScoreDirector<NQueensSolution> + Clone + Send> {
    let config = SolverConfig::new()
        .with_random_seed(9)
        .with_termination(TerminationConfig::default().with_step_count_limit(steps));
    let factory = SolverFactory::new(config, VariableBinding::Basic(queen_row(6)), |s| {
        nqueens::incremental_director(s).map_err(Into::into)
    })
    .unwrap();
    SolverManager::new(factory)
}

// Runs until terminated: the annealing acceptor always finds a move.
fn endless_timetable_manager(
) -> SolverManager<Timetable, usize, impl ScoreDirector<Timetable> + Clone + Send> {
    let config = SolverConfig::new()
        .with_termination(TerminationConfig::default().with_seconds_spent_limit(30))
        .with_phase(PhaseConfig::ConstructionHeuristic(ConstructionHeuristicConfig::default()))
        .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
            acceptor: Some(AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
                starting_temperature: Some(1000.0),
                cooling_rate: Some(1.0),
            })),
            ..LocalSearchConfig::default()
        }));
    let factory = SolverFactory::new(config, VariableBinding::Basic(lesson_room()), |t| {
        assignment::incremental_director(t).map_err(Into::into)
    })
    .unwrap();
    SolverManager::new(factory)
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_concurrent_jobs_finish_independently() {
    let manager = queens_manager(40);
    let (first, _) = manager.solve(NQueensSolution::uninitialized(6)).unwrap();
    let (second, _) = manager.solve(NQueensSolution::uninitialized(6)).unwrap();
    assert_ne!(first, second);
    assert_eq!(manager.job_ids(), vec![first, second]);

    for job in [first, second] {
        let solution = manager.wait(job).unwrap().unwrap();
        assert!(solution.rows().iter().all(Option::is_some));
        assert_eq!(manager.status(job), Some(SolverStatus::NotSolving));
        assert_eq!(manager.best_solution(job).unwrap().rows(), solution.rows());
        // The result can be taken only once.
        assert!(manager.wait(job).is_none());
    }
}

#[test]
fn test_best_solutions_stream_until_job_ends() {
    let manager = queens_manager(30);
    let (job, mut best) = manager.solve(NQueensSolution::uninitialized(6)).unwrap();
    let solution = manager.wait(job).unwrap().unwrap();

    let mut events = Vec::new();
    while let Some(event) = best.blocking_recv() {
        events.push(event);
    }
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.job == job));
    let last = events.last().unwrap();
    assert_eq!(last.solution.rows(), solution.rows());
    assert_eq!(Some(last.score), solution.score);
}

#[test]
fn test_unknown_job() {
    let manager = queens_manager(5);
    let missing = JobId(42);
    assert_eq!(manager.status(missing), None);
    assert!(manager.best_solution(missing).is_none());
    assert!(manager.wait(missing).is_none());
    assert!(manager.remove(missing).is_none());
    assert!(!manager.terminate_early(missing));

    let noop =
        ClosureProblemChange::new("noop", |_: &mut dyn ScoreDirector<NQueensSolution>| Ok(()));
    let err = manager.add_problem_change(missing, noop).unwrap_err();
    assert_eq!(err, SolverError::InvalidState("unknown job-42".into()));
}

#[test]
fn test_terminate_early_stops_running_job() {
    let manager = endless_timetable_manager();
    let (job, _) = manager.solve(Timetable::small()).unwrap();
    assert!(wait_until(|| manager.best_solution(job).is_some_and(|t| t.score.is_some())));
    assert_eq!(manager.status(job), Some(SolverStatus::Solving));

    assert!(manager.terminate_early(job));
    let started = Instant::now();
    let solution = manager.wait(job).unwrap().unwrap();
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(solution.lessons.iter().all(|l| l.room.is_some()));
    assert!(!manager.terminate_early(job));
}

#[test]
fn test_problem_change_reaches_running_job() {
    let manager = endless_timetable_manager();
    let (job, _) = manager.solve(Timetable::small()).unwrap();

    let result = manager
        .add_problem_change(
            job,
            AddEntity::new(
                0,
                Lesson::new(4, "Noether", 12, 1),
                |t: &mut Timetable| &mut t.lessons,
            ),
        )
        .unwrap();
    assert_eq!(result, ProblemChangeResult::Queued);
    assert!(wait_until(|| manager.best_solution(job).is_some_and(|t| t.lessons.len() == 5)));

    manager.terminate_early(job);
    let solution = manager.wait(job).unwrap().unwrap();
    assert_eq!(solution.lessons.len(), 5);
}

#[test]
fn test_remove_terminates_and_forgets_job() {
    let manager = endless_timetable_manager();
    let (job, _) = manager.solve(Timetable::small()).unwrap();

    let solution = manager.remove(job).unwrap();
    assert_eq!(solution.lessons.len(), 4);
    assert!(manager.job_ids().is_empty());
    assert_eq!(manager.status(job), None);
}

#[test]
fn test_drop_terminates_running_jobs() {
    let manager = endless_timetable_manager();
    manager.solve(Timetable::small()).unwrap();
    manager.solve(Timetable::small()).unwrap();

    let started = Instant::now();
    drop(manager);
    assert!(started.elapsed() < Duration::from_secs(10));
}
