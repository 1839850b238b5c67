//! Single-level score.

use std::fmt;

use super::traits::{ParseableScore, ScoreParseError};

/// One integer level, treated as hard.
///
/// Fits models where every constraint is a plain penalty count, such as
/// queen conflicts. Any negative score is infeasible.
///
/// ```
/// use stratum_core::{Score, SimpleScore};
///
/// let five_conflicts = SimpleScore::of(-5);
/// assert!(SimpleScore::of(-3) > five_conflicts);
/// assert!(!five_conflicts.is_feasible());
/// assert_eq!(SimpleScore::from(-5), five_conflicts);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleScore {
    score: i64,
}

impl SimpleScore {
    pub const ZERO: SimpleScore = SimpleScore::of(0);
    pub const ONE: SimpleScore = SimpleScore::of(1);

    #[inline]
    pub const fn of(score: i64) -> Self {
        SimpleScore { score }
    }

    #[inline]
    pub const fn score(&self) -> i64 {
        self.score
    }
}

impl_level_score!(SimpleScore { score: Hard } => of);

impl fmt::Display for SimpleScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.score)
    }
}

impl ParseableScore for SimpleScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let s = s.trim();
        s.parse::<i64>()
            .map(SimpleScore::of)
            .map_err(|e| ScoreParseError::new(format!("invalid SimpleScore '{}': {}", s, e)))
    }

    fn to_string_repr(&self) -> String {
        self.to_string()
    }
}

impl From<i64> for SimpleScore {
    fn from(score: i64) -> Self {
        SimpleScore::of(score)
    }
}
