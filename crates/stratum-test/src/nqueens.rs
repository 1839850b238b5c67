//! N-Queens problem test fixtures.
//!
//! Places N queens on an N×N board so that no two queens share a row or a
//! diagonal. Each queen owns a fixed column; its row is the planning
//! variable.
//!
//! # Example
//!
//! ```
//! use stratum_core::SimpleScore;
//! use stratum_scoring::director::ScoreDirector;
//! use stratum_test::nqueens::{incremental_director, NQueensSolution};
//!
//! let mut director = incremental_director(NQueensSolution::with_rows(&[1, 3, 0, 2])).unwrap();
//! assert_eq!(director.calculate_score(), SimpleScore::of(0));
//! ```

use stratum_core::domain::{
    EntityDescriptor, IntegerRange, PlanningEntity, PlanningId, PlanningSolution,
    SolutionDescriptor, VariableDescriptor,
};
use stratum_core::score::SimpleScore;
use stratum_core::ValidationError;
use stratum_scoring::director::{IncrementalScoreDirector, SimpleScoreDirector, SolvableSolution};
use stratum_scoring::stream::joiner::equal;
use stratum_scoring::stream::{entities, ConstraintFactory};
use stratum_scoring::ConstraintSet;

/// A queen with a fixed column and a row to assign.
#[derive(Clone, Debug, PartialEq)]
pub struct Queen {
    pub id: i64,
    pub column: i64,
    pub row: Option<i64>,
}

impl Queen {
    pub fn new(id: i64, column: i64, row: Option<i64>) -> Self {
        Self { id, column, row }
    }

    pub fn assigned(id: i64, column: i64, row: i64) -> Self {
        Self::new(id, column, Some(row))
    }

    pub fn unassigned(id: i64, column: i64) -> Self {
        Self::new(id, column, None)
    }
}

impl PlanningEntity for Queen {}

impl PlanningId for Queen {
    type Id = i64;

    fn planning_id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug)]
pub struct NQueensSolution {
    pub n: usize,
    pub queens: Vec<Queen>,
    pub score: Option<SimpleScore>,
}

impl NQueensSolution {
    /// Creates an N-Queens solution with n unassigned queens in columns `0..n`.
    pub fn uninitialized(n: usize) -> Self {
        let queens = (0..n)
            .map(|i| Queen::unassigned(i as i64, i as i64))
            .collect();
        Self {
            n,
            queens,
            score: None,
        }
    }

    /// Creates a solution with queen `i` in column `i` and row `rows[i]`.
    pub fn with_rows(rows: &[i64]) -> Self {
        let queens = rows
            .iter()
            .enumerate()
            .map(|(i, &row)| Queen::assigned(i as i64, i as i64, row))
            .collect();
        Self {
            n: rows.len(),
            queens,
            score: None,
        }
    }

    pub fn with_optional_rows(rows: &[Option<i64>]) -> Self {
        let queens = rows
            .iter()
            .enumerate()
            .map(|(i, &row)| Queen::new(i as i64, i as i64, row))
            .collect();
        Self {
            n: rows.len(),
            queens,
            score: None,
        }
    }

    pub fn rows(&self) -> Vec<Option<i64>> {
        self.queens.iter().map(|q| q.row).collect()
    }
}

impl PlanningSolution for NQueensSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        self.queens.iter().all(|q| q.row.is_some())
    }
}

impl SolvableSolution for NQueensSolution {
    fn entity_count(solution: &Self, _descriptor_index: usize) -> usize {
        solution.queens.len()
    }
}

pub fn queens(s: &NQueensSolution) -> &[Queen] {
    &s.queens
}

pub fn queen_count(s: &NQueensSolution) -> usize {
    s.queens.len()
}

/// Typed getter for the `row` planning variable.
pub fn get_queen_row(s: &NQueensSolution, idx: usize) -> Option<i64> {
    s.queens.get(idx).and_then(|q| q.row)
}

/// Typed setter for the `row` planning variable.
pub fn set_queen_row(s: &mut NQueensSolution, idx: usize, v: Option<i64>) {
    if let Some(queen) = s.queens.get_mut(idx) {
        queen.row = v;
    }
}

/// Rows `0..n`.
pub fn row_range(n: usize) -> IntegerRange {
    IntegerRange::from_zero(n as i64)
}

pub fn descriptor() -> Result<SolutionDescriptor, ValidationError> {
    SolutionDescriptor::new("NQueensSolution")
        .with_value_range("rows")
        .with_entity(
            EntityDescriptor::new("Queen", "queens")
                .with_variable(VariableDescriptor::genuine("row").with_value_range("rows")),
        )
        .with_score_field("score")
        .validate()
}

/// Counts row and diagonal conflicts over all pairs of assigned queens.
///
/// Full recalculation; the reference for the incremental constraints.
pub fn calculate_conflicts(solution: &NQueensSolution) -> SimpleScore {
    let mut conflicts = 0i64;
    let queens = &solution.queens;

    for i in 0..queens.len() {
        for j in (i + 1)..queens.len() {
            if let (Some(row_i), Some(row_j)) = (queens[i].row, queens[j].row) {
                if row_i == row_j {
                    conflicts += 1;
                }
                let col_diff = (queens[j].column - queens[i].column).abs();
                if (row_i - row_j).abs() == col_diff {
                    conflicts += 1;
                }
            }
        }
    }

    SimpleScore::of(-conflicts)
}

/// Row, ascending diagonal and descending diagonal conflicts.
pub fn constraints() -> impl ConstraintSet<NQueensSolution, SimpleScore> {
    let factory = ConstraintFactory::<NQueensSolution, SimpleScore>::new();

    let row_conflict = factory
        .for_each_unique_pair(entities(0, queens), equal(|q: &Queen| q.row))
        .filter(|a: &Queen, _: &Queen| a.row.is_some())
        .penalize(SimpleScore::of(1))
        .as_constraint_in("nqueens", "Row conflict");

    let ascending_conflict = factory
        .for_each_unique_pair(
            entities(0, queens),
            equal(|q: &Queen| q.row.map(|r| r - q.column)),
        )
        .filter(|a: &Queen, _: &Queen| a.row.is_some())
        .penalize(SimpleScore::of(1))
        .as_constraint_in("nqueens", "Ascending diagonal conflict");

    let descending_conflict = factory
        .for_each_unique_pair(
            entities(0, queens),
            equal(|q: &Queen| q.row.map(|r| r + q.column)),
        )
        .filter(|a: &Queen, _: &Queen| a.row.is_some())
        .penalize(SimpleScore::of(1))
        .as_constraint_in("nqueens", "Descending diagonal conflict");

    (row_conflict, ascending_conflict, descending_conflict)
}

pub fn incremental_director(
    solution: NQueensSolution,
) -> Result<
    IncrementalScoreDirector<NQueensSolution, impl ConstraintSet<NQueensSolution, SimpleScore>>,
    ValidationError,
> {
    Ok(IncrementalScoreDirector::new(
        solution,
        descriptor()?,
        constraints(),
    ))
}

pub fn simple_director(
    solution: NQueensSolution,
) -> Result<
    SimpleScoreDirector<NQueensSolution, fn(&NQueensSolution) -> SimpleScore>,
    ValidationError,
> {
    Ok(SimpleScoreDirector::new(
        solution,
        descriptor()?,
        calculate_conflicts as fn(&NQueensSolution) -> SimpleScore,
    ))
}
