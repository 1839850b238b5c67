//! BendableScore - Multi-level score with compile-time level counts

use std::fmt;
use std::ops::{Add, Neg, Sub};

use super::traits::{ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A score with `H` hard levels followed by `S` soft levels.
///
/// Level counts are const generics so the score stays `Copy` and two
/// scores of different shapes can never be mixed.
///
/// # Examples
///
/// ```
/// use stratum_core::{BendableScore, Score};
///
/// let score = BendableScore::<2, 3>::of([-1, -2], [-10, -20, -30]);
///
/// assert_eq!(score.hard_score(1), -2);
/// assert_eq!(BendableScore::<2, 3>::levels_count(), 5);
/// assert!(!score.is_feasible());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BendableScore<const H: usize, const S: usize> {
    hard: [i64; H],
    soft: [i64; S],
}

impl<const H: usize, const S: usize> BendableScore<H, S> {
    pub const ZERO: Self = BendableScore {
        hard: [0; H],
        soft: [0; S],
    };

    pub const fn of(hard: [i64; H], soft: [i64; S]) -> Self {
        BendableScore { hard, soft }
    }

    /// A score of 1 at the given hard level and 0 elsewhere.
    pub fn one_hard(level: usize) -> Self {
        let mut score = Self::ZERO;
        score.hard[level] = 1;
        score
    }

    /// A score of 1 at the given soft level and 0 elsewhere.
    pub fn one_soft(level: usize) -> Self {
        let mut score = Self::ZERO;
        score.soft[level] = 1;
        score
    }

    pub fn hard_score(&self, level: usize) -> i64 {
        self.hard[level]
    }

    pub fn soft_score(&self, level: usize) -> i64 {
        self.soft[level]
    }

    pub fn hard_scores(&self) -> &[i64; H] {
        &self.hard
    }

    pub fn soft_scores(&self) -> &[i64; S] {
        &self.soft
    }

    fn map(&self, f: impl Fn(i64) -> i64) -> Self {
        BendableScore {
            hard: self.hard.map(&f),
            soft: self.soft.map(&f),
        }
    }

    fn zip(self, other: Self, f: impl Fn(i64, i64) -> i64) -> Self {
        let mut out = self;
        for (a, b) in out.hard.iter_mut().zip(other.hard) {
            *a = f(*a, b);
        }
        for (a, b) in out.soft.iter_mut().zip(other.soft) {
            *a = f(*a, b);
        }
        out
    }
}

impl<const H: usize, const S: usize> Default for BendableScore<H, S> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const H: usize, const S: usize> Score for BendableScore<H, S> {
    fn is_feasible(&self) -> bool {
        self.hard.iter().all(|&h| h >= 0)
    }

    fn zero() -> Self {
        Self::ZERO
    }

    fn levels_count() -> usize {
        H + S
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        self.hard.iter().chain(self.soft.iter()).copied().collect()
    }

    fn from_level_numbers(levels: &[i64]) -> Self {
        assert_eq!(
            levels.len(),
            H + S,
            "BendableScore<{}, {}> requires exactly {} levels",
            H,
            S,
            H + S
        );
        let mut score = Self::ZERO;
        score.hard.copy_from_slice(&levels[..H]);
        score.soft.copy_from_slice(&levels[H..]);
        score
    }

    fn scale(&self, factor: i64) -> Self {
        self.map(|v| v * factor)
    }

    fn multiply(&self, multiplicand: f64) -> Self {
        self.map(|v| (v as f64 * multiplicand).round() as i64)
    }

    fn divide(&self, divisor: f64) -> Self {
        self.map(|v| (v as f64 / divisor).round() as i64)
    }

    fn abs(&self) -> Self {
        self.map(i64::abs)
    }

    fn level_label(index: usize) -> ScoreLevel {
        if index < H {
            ScoreLevel::Hard
        } else if index < H + S {
            ScoreLevel::Soft
        } else {
            panic!(
                "BendableScore<{}, {}> has {} levels, got index {}",
                H,
                S,
                H + S,
                index
            )
        }
    }
}

impl<const H: usize, const S: usize> Add for BendableScore<H, S> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip(other, |a, b| a + b)
    }
}

impl<const H: usize, const S: usize> Sub for BendableScore<H, S> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip(other, |a, b| a - b)
    }
}

impl<const H: usize, const S: usize> Neg for BendableScore<H, S> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

fn join_levels(levels: &[i64]) -> String {
    levels
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

impl<const H: usize, const S: usize> fmt::Debug for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BendableScore(hard: {:?}, soft: {:?})", self.hard, self.soft)
    }
}

impl<const H: usize, const S: usize> fmt::Display for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]hard/[{}]soft",
            join_levels(&self.hard),
            join_levels(&self.soft)
        )
    }
}

fn parse_bracketed<const N: usize>(
    part: &str,
    suffix: &str,
) -> Result<[i64; N], ScoreParseError> {
    let inner = part
        .strip_suffix(suffix)
        .and_then(|p| p.strip_prefix('['))
        .and_then(|p| p.strip_suffix(']'))
        .ok_or_else(|| {
            ScoreParseError::new(format!("expected '[..]{}', got '{}'", suffix, part))
        })?;

    let mut levels = [0i64; N];
    let values: Vec<&str> = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split('/').collect()
    };
    if values.len() != N {
        return Err(ScoreParseError::new(format!(
            "expected {} {} levels, got {}",
            N,
            suffix,
            values.len()
        )));
    }
    for (slot, raw) in levels.iter_mut().zip(values) {
        *slot = raw.trim().parse::<i64>().map_err(|e| {
            ScoreParseError::new(format!("invalid {} level '{}': {}", suffix, raw, e))
        })?;
    }
    Ok(levels)
}

impl<const H: usize, const S: usize> ParseableScore for BendableScore<H, S> {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let s = s.trim();
        let split = s.find("hard/").ok_or_else(|| {
            ScoreParseError::new(format!(
                "invalid BendableScore '{}': expected '[..]hard/[..]soft'",
                s
            ))
        })?;
        let (hard_part, soft_part) = s.split_at(split + "hard".len());
        let soft_part = &soft_part[1..];

        Ok(BendableScore {
            hard: parse_bracketed::<H>(hard_part, "hard")?,
            soft: parse_bracketed::<S>(soft_part, "soft")?,
        })
    }

    fn to_string_repr(&self) -> String {
        self.to_string()
    }
}

#[cfg(feature = "serde")]
impl<const H: usize, const S: usize> serde::Serialize for BendableScore<H, S> {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_str(self)
    }
}

// Serialized as its display form, since serde has no impls for
// const-generic arrays.
#[cfg(feature = "serde")]
impl<'de, const H: usize, const S: usize> serde::Deserialize<'de> for BendableScore<H, S> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
