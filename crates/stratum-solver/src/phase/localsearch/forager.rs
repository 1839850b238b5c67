//! Forager for local search move selection.
//!
//! The forager collects accepted moves during a step, decides when to stop
//! evaluating and picks the move to apply. It works on arena indices so
//! the moves themselves stay in the [`MoveArena`](crate::heuristic::MoveArena).

use rand::{Rng, RngCore};
use stratum_config::{ForagerConfig, PickEarlyType, TieBreak};
use stratum_core::score::Score;

/// Collects up to `accepted_count_limit` accepted moves per step and picks
/// the best one.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use stratum_core::score::SimpleScore;
/// use stratum_solver::phase::localsearch::AcceptedCountForager;
///
/// let mut forager = AcceptedCountForager::new(2);
/// forager.step_started();
/// forager.add_move(4, SimpleScore::of(-3));
/// forager.add_move(9, SimpleScore::of(-1));
/// assert!(forager.is_quit_early());
///
/// let mut rng = ChaCha8Rng::seed_from_u64(0);
/// assert_eq!(forager.pick_move(&mut rng), Some((9, SimpleScore::of(-1))));
/// ```
#[derive(Debug, Clone)]
pub struct AcceptedCountForager<Sc> {
    accepted_count_limit: usize,
    pick_early: PickEarlyType,
    tie_break: TieBreak,
    accepted: Vec<(usize, Sc)>,
    picked_early: bool,
}

impl<Sc: Score> AcceptedCountForager<Sc> {
    /// A limit of zero is treated as one.
    pub fn new(accepted_count_limit: usize) -> Self {
        Self {
            accepted_count_limit: accepted_count_limit.max(1),
            pick_early: PickEarlyType::Never,
            tie_break: TieBreak::FirstEncountered,
            accepted: Vec::new(),
            picked_early: false,
        }
    }

    /// Evaluates every move of the step before picking.
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn from_config(config: &ForagerConfig) -> Self {
        Self::new(config.accepted_count_limit.unwrap_or(usize::MAX))
            .with_pick_early(config.pick_early_type.unwrap_or_default())
            .with_tie_break(config.tie_break.unwrap_or_default())
    }

    pub fn with_pick_early(mut self, pick_early: PickEarlyType) -> Self {
        self.pick_early = pick_early;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn step_started(&mut self) {
        self.accepted.clear();
        self.picked_early = false;
    }

    pub fn add_move(&mut self, index: usize, score: Sc) {
        self.accepted.push((index, score));
    }

    /// Like [`add_move`](Self::add_move), also applying the pick-early rule.
    pub fn add_move_with_scores(&mut self, index: usize, score: Sc, last_step: &Sc, best: &Sc) {
        self.picked_early = match self.pick_early {
            PickEarlyType::Never => false,
            PickEarlyType::FirstBestScoreImproving => score > *best,
            PickEarlyType::FirstLastStepScoreImproving => score > *last_step,
        };
        self.add_move(index, score);
    }

    /// True once the limit is reached or a move qualified for picking early.
    pub fn is_quit_early(&self) -> bool {
        self.picked_early || self.accepted.len() >= self.accepted_count_limit
    }

    /// Picks the best accepted move and clears the step's moves.
    ///
    /// After picking early, the qualifying move is returned.
    pub fn pick_move(&mut self, rng: &mut dyn RngCore) -> Option<(usize, Sc)> {
        let accepted = std::mem::take(&mut self.accepted);
        if self.picked_early {
            return accepted.last().copied();
        }
        let best = accepted.iter().map(|(_, s)| *s).max()?;
        let ties: Vec<(usize, Sc)> = accepted.into_iter().filter(|(_, s)| *s == best).collect();
        match self.tie_break {
            TieBreak::FirstEncountered => ties.first().copied(),
            TieBreak::Random => ties.get(rng.random_range(0..ties.len())).copied(),
        }
    }
}
