//! Core Score trait definition

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, Neg, Sub};

use thiserror::Error;

use super::ScoreLevel;

/// Core trait for all score types.
///
/// A score is an ordered tuple of levels compared lexicographically, most
/// significant level first. Zero is the additive identity and a score is
/// feasible when every hard level is non-negative.
///
/// All score implementations are `Copy`: the constraint graph adds and
/// subtracts scores on every propagated tuple, so they must be cheap values.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + Hash
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if all hard levels are `>= 0`.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels.
    fn levels_count() -> usize;

    /// Returns the score values, highest priority first.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Creates a score from level numbers, highest priority first.
    ///
    /// # Panics
    /// Panics if the number of levels doesn't match `levels_count()`.
    fn from_level_numbers(levels: &[i64]) -> Self;

    /// Multiplies every level by an integer factor.
    ///
    /// This is the exact operation used by constraint weighers.
    fn scale(&self, factor: i64) -> Self;

    /// Multiplies this score by a scalar, rounding each level.
    fn multiply(&self, multiplicand: f64) -> Self;

    /// Divides this score by a scalar, rounding each level.
    fn divide(&self, divisor: f64) -> Self;

    /// Returns the absolute value of this score.
    fn abs(&self) -> Self;

    /// Returns the semantic label for the score level at the given index.
    ///
    /// # Panics
    /// Panics if `index >= levels_count()`.
    fn level_label(index: usize) -> ScoreLevel;

    /// Returns true if any hard level of this score is non-zero.
    ///
    /// Used to classify constraints by their weight.
    fn has_hard_impact(&self) -> bool {
        self.to_level_numbers()
            .iter()
            .enumerate()
            .any(|(i, &level)| level != 0 && Self::level_label(i) == ScoreLevel::Hard)
    }

    /// Compares two scores, returning the ordering.
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Returns true if this score is better (higher) than the other score.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns true if this score is worse than the other score.
    fn is_worse_than(&self, other: &Self) -> bool {
        self < other
    }
}

/// Scores that can be parsed from and written to the wire format.
pub trait ParseableScore: Score {
    /// Parses a score from its string representation.
    ///
    /// # Format
    /// - SimpleScore: `"42"`
    /// - HardSoftScore: `"0hard/-100soft"`
    /// - HardMediumSoftScore: `"0hard/0medium/-100soft"`
    /// - BendableScore: `"[0/0]hard/[-10/-20]soft"`
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Returns the string representation of this score.
    ///
    /// `parse(to_string_repr(x)) == x` holds for every score.
    fn to_string_repr(&self) -> String;
}

/// Error when parsing a score from string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("score parse error: {message}")]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
