// Termination settings, shared by the solver and by individual phases.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Termination configuration.
///
/// Every configured limit becomes one termination condition. Conditions
/// combine with `or` unless `termination_composition = "and"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving.
    pub millis_spent_limit: Option<u64>,

    /// Maximum seconds without a best score improvement.
    pub unimproved_seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds without a best score improvement.
    pub unimproved_millis_spent_limit: Option<u64>,

    /// Target best score to reach, in the score wire format (e.g. `"0hard/-10soft"`).
    pub best_score_limit: Option<String>,

    /// Stop as soon as the best score is feasible.
    pub best_score_feasible: Option<bool>,

    /// Maximum number of steps.
    pub step_count_limit: Option<u64>,

    /// Maximum number of steps without a best score improvement.
    pub unimproved_step_count_limit: Option<u64>,

    /// Maximum number of evaluated moves.
    pub move_count_limit: Option<u64>,

    /// How the configured conditions combine.
    #[serde(default)]
    pub termination_composition: TerminationComposition,
}

/// How multiple termination conditions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationComposition {
    /// Terminate when any condition fires.
    #[default]
    Or,

    /// Terminate when every condition fires.
    And,
}

impl TerminationConfig {
    /// Returns the total spent-time limit, if any.
    ///
    /// Seconds, minutes and milliseconds add up.
    pub fn time_limit(&self) -> Option<Duration> {
        sum_durations([
            self.millis_spent_limit.map(Duration::from_millis),
            self.seconds_spent_limit.map(Duration::from_secs),
            self.minutes_spent_limit.map(|m| Duration::from_secs(m * 60)),
        ])
    }

    /// Returns the unimproved spent-time limit, if any.
    pub fn unimproved_time_limit(&self) -> Option<Duration> {
        sum_durations([
            self.unimproved_millis_spent_limit.map(Duration::from_millis),
            self.unimproved_seconds_spent_limit.map(Duration::from_secs),
        ])
    }

    /// Returns true if `best_score_feasible = true`.
    pub fn requires_feasible(&self) -> bool {
        self.best_score_feasible.unwrap_or(false)
    }

    /// Returns true if no condition is configured.
    pub fn is_empty(&self) -> bool {
        self.time_limit().is_none()
            && self.unimproved_time_limit().is_none()
            && self.best_score_limit.is_none()
            && !self.requires_feasible()
            && self.step_count_limit.is_none()
            && self.unimproved_step_count_limit.is_none()
            && self.move_count_limit.is_none()
    }

    pub fn with_seconds_spent_limit(mut self, seconds: u64) -> Self {
        self.seconds_spent_limit = Some(seconds);
        self
    }

    pub fn with_millis_spent_limit(mut self, millis: u64) -> Self {
        self.millis_spent_limit = Some(millis);
        self
    }

    pub fn with_step_count_limit(mut self, steps: u64) -> Self {
        self.step_count_limit = Some(steps);
        self
    }

    pub fn with_unimproved_step_count_limit(mut self, steps: u64) -> Self {
        self.unimproved_step_count_limit = Some(steps);
        self
    }

    pub fn with_move_count_limit(mut self, moves: u64) -> Self {
        self.move_count_limit = Some(moves);
        self
    }

    pub fn with_best_score_limit(mut self, score: impl Into<String>) -> Self {
        self.best_score_limit = Some(score.into());
        self
    }

    pub fn with_best_score_feasible(mut self, feasible: bool) -> Self {
        self.best_score_feasible = Some(feasible);
        self
    }

    pub fn with_composition(mut self, composition: TerminationComposition) -> Self {
        self.termination_composition = composition;
        self
    }
}

fn sum_durations<const N: usize>(parts: [Option<Duration>; N]) -> Option<Duration> {
    parts.into_iter().flatten().reduce(|a, b| a + b)
}
