//! Hard and soft levels.

/// The common two-level score: broken hard constraints make a plan
/// infeasible and soft constraints rank the feasible plans.
///
/// Any hard improvement outweighs every soft loss:
///
/// ```
/// use stratum_core::{HardSoftScore, Score};
///
/// let overbooked = HardSoftScore::of(-1, 0);
/// let unpopular = HardSoftScore::of(0, -500);
/// assert!(unpopular > overbooked);
/// assert!(unpopular.is_feasible());
///
/// let penalty = HardSoftScore::ONE_SOFT.scale(3);
/// assert_eq!(unpopular - penalty, HardSoftScore::of(0, -503));
/// assert_eq!((unpopular - penalty).to_string(), "0hard/-503soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftScore {
    hard: i64,
    soft: i64,
}

impl HardSoftScore {
    pub const ZERO: HardSoftScore = HardSoftScore::of(0, 0);
    pub const ONE_HARD: HardSoftScore = HardSoftScore::of_hard(1);
    pub const ONE_SOFT: HardSoftScore = HardSoftScore::of_soft(1);

    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftScore { hard, soft }
    }

    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        Self::of(hard, 0)
    }

    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        Self::of(0, soft)
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }
}

impl_level_score!(HardSoftScore { hard: Hard => "hard", soft: Soft => "soft" } => of);
