//! Hard, medium and soft levels.

/// Three levels, compared hard first.
///
/// The medium level sits between feasibility and preference. A typical use
/// is counting unassigned entities when the model allows leaving some out:
/// assigning one more always beats any soft gain.
///
/// ```
/// use stratum_core::HardMediumSoftScore;
///
/// let one_left_out = HardMediumSoftScore::of(0, -1, 0);
/// let all_assigned = HardMediumSoftScore::of(0, 0, -40);
/// assert!(all_assigned > one_left_out);
/// assert_eq!(all_assigned.to_string(), "0hard/0medium/-40soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardMediumSoftScore {
    hard: i64,
    medium: i64,
    soft: i64,
}

impl HardMediumSoftScore {
    pub const ZERO: HardMediumSoftScore = HardMediumSoftScore::of(0, 0, 0);
    pub const ONE_HARD: HardMediumSoftScore = HardMediumSoftScore::of_hard(1);
    pub const ONE_MEDIUM: HardMediumSoftScore = HardMediumSoftScore::of_medium(1);
    pub const ONE_SOFT: HardMediumSoftScore = HardMediumSoftScore::of_soft(1);

    #[inline]
    pub const fn of(hard: i64, medium: i64, soft: i64) -> Self {
        HardMediumSoftScore { hard, medium, soft }
    }

    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        Self::of(hard, 0, 0)
    }

    #[inline]
    pub const fn of_medium(medium: i64) -> Self {
        Self::of(0, medium, 0)
    }

    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        Self::of(0, 0, soft)
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn medium(&self) -> i64 {
        self.medium
    }

    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }
}

impl_level_score!(
    HardMediumSoftScore {
        hard: Hard => "hard",
        medium: Medium => "medium",
        soft: Soft => "soft"
    } => of
);
