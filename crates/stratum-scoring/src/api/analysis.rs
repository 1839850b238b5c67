//! Score analysis types.
//!
//! An explanation is read off the live matches held by each constraint's
//! terminal node, so producing one never rescans the solution.

use std::fmt::Debug;

use stratum_core::score::Score;
use stratum_core::ConstraintRef;

/// One live tuple at a constraint's terminal node.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintMatch<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    /// Score impact of this match, sign included.
    pub score: Sc,
    /// The matched tuple rendered with `Debug`.
    pub justification: String,
}

impl<Sc: Score> ConstraintMatch<Sc> {
    pub fn new(constraint_ref: ConstraintRef, score: Sc, justification: String) -> Self {
        Self {
            constraint_ref,
            score,
            justification,
        }
    }

    /// Builds a match whose justification is the `Debug` form of `tuple`.
    pub fn of<T: Debug>(constraint_ref: ConstraintRef, score: Sc, tuple: &T) -> Self {
        Self::new(constraint_ref, score, format!("{:?}", tuple))
    }
}

/// Per-constraint breakdown in a score explanation.
#[derive(Debug, Clone)]
pub struct ConstraintAnalysis<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    /// Constraint weight (score per unit of weigher output).
    pub weight: Sc,
    /// Total score from this constraint.
    pub score: Sc,
    pub matches: Vec<ConstraintMatch<Sc>>,
    pub is_hard: bool,
}

impl<Sc: Score> ConstraintAnalysis<Sc> {
    pub fn new(
        constraint_ref: ConstraintRef,
        weight: Sc,
        score: Sc,
        matches: Vec<ConstraintMatch<Sc>>,
        is_hard: bool,
    ) -> Self {
        Self {
            constraint_ref,
            weight,
            score,
            matches,
            is_hard,
        }
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }
}

/// Complete score explanation with per-constraint breakdown.
#[derive(Debug, Clone)]
pub struct ScoreExplanation<Sc: Score> {
    pub score: Sc,
    pub constraint_analyses: Vec<ConstraintAnalysis<Sc>>,
}

impl<Sc: Score> ScoreExplanation<Sc> {
    pub fn new(score: Sc, constraint_analyses: Vec<ConstraintAnalysis<Sc>>) -> Self {
        Self {
            score,
            constraint_analyses,
        }
    }

    /// Returns the total match count across all constraints.
    pub fn total_match_count(&self) -> usize {
        self.constraint_analyses.iter().map(|a| a.match_count()).sum()
    }

    /// Returns constraints with non-zero scores.
    pub fn non_zero_constraints(&self) -> Vec<&ConstraintAnalysis<Sc>> {
        self.constraint_analyses
            .iter()
            .filter(|a| a.score != Sc::zero())
            .collect()
    }

    /// Returns all matches across all constraints.
    pub fn all_matches(&self) -> Vec<&ConstraintMatch<Sc>> {
        self.constraint_analyses
            .iter()
            .flat_map(|a| &a.matches)
            .collect()
    }

    pub fn constraint(&self, name: &str) -> Option<&ConstraintAnalysis<Sc>> {
        self.constraint_analyses.iter().find(|a| a.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::score::SimpleScore;

    fn analysis(name: &str, scores: &[i64]) -> ConstraintAnalysis<SimpleScore> {
        let cr = ConstraintRef::new("", name);
        let matches: Vec<_> = scores
            .iter()
            .map(|&s| ConstraintMatch::of(cr.clone(), SimpleScore::of(s), &(s,)))
            .collect();
        let total = scores.iter().sum();
        ConstraintAnalysis::new(cr, SimpleScore::of(-1), SimpleScore::of(total), matches, false)
    }

    #[test]
    fn explanation_totals() {
        let explanation = ScoreExplanation::new(
            SimpleScore::of(-3),
            vec![analysis("a", &[-1, -2]), analysis("b", &[])],
        );

        assert_eq!(explanation.total_match_count(), 2);
        assert_eq!(explanation.non_zero_constraints().len(), 1);
        assert_eq!(explanation.all_matches().len(), 2);
        assert_eq!(explanation.constraint("a").map(|a| a.match_count()), Some(2));
        assert!(explanation.constraint("missing").is_none());
    }

    #[test]
    fn justification_uses_debug() {
        let m = ConstraintMatch::of(ConstraintRef::new("", "x"), SimpleScore::of(-1), &("q", 3));
        assert_eq!(m.justification, "(\"q\", 3)");
    }
}
