//! Solver statistics.
//!
//! Plain counters for solver and phase performance tracking. Both types
//! serialize with serde so callers can export a run summary.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Solver-level statistics.
///
/// Tracks aggregate metrics across all phases of a solve run.
///
/// # Example
///
/// ```
/// use stratum_solver::stats::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.start();
/// stats.record_step();
/// stats.record_move(true);
/// stats.record_move(false);
///
/// assert_eq!(stats.step_count, 1);
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.moves_accepted, 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverStats {
    #[serde(skip)]
    start_time: Option<Instant>,
    /// Total steps taken across all phases.
    pub step_count: u64,
    /// Total moves evaluated across all phases.
    pub moves_evaluated: u64,
    /// Total moves accepted across all phases.
    pub moves_accepted: u64,
    /// Total score calculations performed.
    pub score_calculations: u64,
    /// One entry per started phase, in run order.
    pub phases: Vec<PhaseStats>,
}

impl SolverStats {
    /// Marks the start of solving.
    pub fn start(&mut self) {
        *self = Self {
            start_time: Some(Instant::now()),
            ..Self::default()
        };
    }

    /// Returns the elapsed time since solving started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn start_phase(&mut self, phase_index: usize, phase_type: &'static str) {
        self.phases.push(PhaseStats::new(phase_index, phase_type));
    }

    pub fn end_phase(&mut self) {
        if let Some(phase) = self.phases.last_mut() {
            phase.finish();
        }
    }

    /// Records a move evaluation and whether it was accepted.
    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
        if let Some(phase) = self.phases.last_mut() {
            phase.record_move(accepted);
        }
    }

    /// Records a step completion.
    pub fn record_step(&mut self) {
        self.step_count += 1;
        if let Some(phase) = self.phases.last_mut() {
            phase.step_count += 1;
        }
    }

    /// Records a score calculation.
    pub fn record_score_calculation(&mut self) {
        self.score_calculations += 1;
    }

    /// Returns the moves per second rate.
    pub fn moves_per_second(&self) -> f64 {
        rate(self.moves_evaluated, self.elapsed())
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

/// Phase-level statistics.
///
/// # Example
///
/// ```
/// use stratum_solver::stats::PhaseStats;
///
/// let mut stats = PhaseStats::new(0, "LocalSearch");
/// stats.record_move(true);
///
/// assert_eq!(stats.phase_index, 0);
/// assert_eq!(stats.phase_type, "LocalSearch");
/// assert_eq!(stats.moves_accepted, 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct PhaseStats {
    /// Index of this phase (0-based).
    pub phase_index: usize,
    /// Type name of the phase.
    pub phase_type: &'static str,
    #[serde(skip)]
    start_time: Instant,
    /// Wall time of the phase, set when it ends.
    pub duration: Option<Duration>,
    pub step_count: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
}

impl PhaseStats {
    pub fn new(phase_index: usize, phase_type: &'static str) -> Self {
        Self {
            phase_index,
            phase_type,
            start_time: Instant::now(),
            duration: None,
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
        }
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn finish(&mut self) {
        self.duration = Some(self.start_time.elapsed());
    }

    pub fn elapsed(&self) -> Duration {
        self.duration.unwrap_or_else(|| self.start_time.elapsed())
    }

    /// Returns the moves per second rate.
    pub fn moves_per_second(&self) -> f64 {
        rate(self.moves_evaluated, self.elapsed())
    }
}

fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_counters_follow_solver_counters() {
        let mut stats = SolverStats::default();
        stats.start();
        stats.start_phase(0, "ConstructionHeuristic");
        stats.record_move(true);
        stats.record_step();
        stats.end_phase();
        stats.start_phase(1, "LocalSearch");
        stats.record_move(false);
        stats.record_move(true);
        stats.record_step();

        assert_eq!(stats.moves_evaluated, 3);
        assert_eq!(stats.moves_accepted, 2);
        assert_eq!(stats.phases.len(), 2);
        assert_eq!(stats.phases[0].moves_evaluated, 1);
        assert!(stats.phases[0].duration.is_some());
        assert_eq!(stats.phases[1].moves_evaluated, 2);
        assert_eq!(stats.phases[1].step_count, 1);
        assert!(stats.phases[1].duration.is_none());
        assert!((stats.acceptance_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_start_resets_counters() {
        let mut stats = SolverStats::default();
        stats.record_step();
        stats.start_phase(0, "LocalSearch");
        stats.start();
        assert_eq!(stats.step_count, 0);
        assert!(stats.phases.is_empty());
    }

    #[test]
    fn test_empty_rates_are_zero() {
        let stats = SolverStats::default();
        assert_eq!(stats.moves_per_second(), 0.0);
        assert_eq!(stats.acceptance_rate(), 0.0);
    }
}
