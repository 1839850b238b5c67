//! Typed accessors for planning variables.
//!
//! Moves, selectors and phases never reflect over the solution. Each
//! variable is bound once to plain function pointers and a value range, and
//! every move carries an `Arc` to that binding.

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

use stratum_core::domain::{PlanningSolution, ValueRange};
use stratum_core::MoveApplicationError;

/// Values a planning variable can hold.
pub trait PlanningValue: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> PlanningValue for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Binding of a basic (single-valued) planning variable.
///
/// # Example
///
/// ```
/// use stratum_solver::heuristic::BasicVariable;
/// use stratum_test::nqueens::{
///     get_queen_row, queen_count, row_range, set_queen_row, NQueensSolution,
/// };
///
/// let row = BasicVariable::new(0, "row", queen_count, get_queen_row, set_queen_row, row_range(4));
/// let solution = NQueensSolution::with_rows(&[0, 1, 2, 3]);
/// assert_eq!(row.entity_count(&solution), 4);
/// assert_eq!(row.values(&solution, 0), vec![0, 1, 2, 3]);
/// ```
pub struct BasicVariable<S, V> {
    pub descriptor_index: usize,
    pub variable_name: &'static str,
    pub entity_count: fn(&S) -> usize,
    pub getter: fn(&S, usize) -> Option<V>,
    pub setter: fn(&mut S, usize, Option<V>),
    pub value_range: Arc<dyn ValueRange<S, V>>,
    pub allows_unassigned: bool,
    pub pinned: Option<fn(&S, usize) -> bool>,
    /// Higher means harder to place; used by the decreasing construction types.
    pub difficulty: Option<fn(&S, usize) -> i64>,
    /// Higher means stronger; used by weakest and strongest fit.
    pub strength: Option<fn(&S, &V) -> i64>,
}

impl<S, V> BasicVariable<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    pub fn new(
        descriptor_index: usize,
        variable_name: &'static str,
        entity_count: fn(&S) -> usize,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        value_range: impl ValueRange<S, V> + 'static,
    ) -> Self {
        Self {
            descriptor_index,
            variable_name,
            entity_count,
            getter,
            setter,
            value_range: Arc::new(value_range),
            allows_unassigned: false,
            pinned: None,
            difficulty: None,
            strength: None,
        }
    }

    pub fn with_allows_unassigned(mut self, allows: bool) -> Self {
        self.allows_unassigned = allows;
        self
    }

    pub fn with_pinned(mut self, pinned: fn(&S, usize) -> bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn with_difficulty(mut self, difficulty: fn(&S, usize) -> i64) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_strength(mut self, strength: fn(&S, &V) -> i64) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn entity_count(&self, solution: &S) -> usize {
        (self.entity_count)(solution)
    }

    pub fn get(&self, solution: &S, entity_index: usize) -> Option<V> {
        (self.getter)(solution, entity_index)
    }

    pub fn is_pinned(&self, solution: &S, entity_index: usize) -> bool {
        self.pinned.is_some_and(|p| p(solution, entity_index))
    }

    /// Candidate values for one entity, in value range order.
    pub fn values(&self, solution: &S, entity_index: usize) -> Vec<V> {
        self.value_range.values(solution, entity_index)
    }

    /// Entities whose variable is unassigned and not pinned.
    pub fn unassigned_entities(&self, solution: &S) -> Vec<usize> {
        (0..self.entity_count(solution))
            .filter(|&e| self.get(solution, e).is_none() && !self.is_pinned(solution, e))
            .collect()
    }

    /// Fails unless `entity_index` exists and is movable.
    pub fn check_entity(
        &self,
        solution: &S,
        entity_index: usize,
    ) -> Result<(), MoveApplicationError> {
        let entity_count = self.entity_count(solution);
        if entity_index >= entity_count {
            return Err(MoveApplicationError::EntityOutOfBounds {
                entity_index,
                entity_count,
            });
        }
        if self.is_pinned(solution, entity_index) {
            return Err(MoveApplicationError::Pinned { entity_index });
        }
        Ok(())
    }

    /// Fails unless `value` may be assigned to `entity_index`.
    pub fn check_value(
        &self,
        solution: &S,
        entity_index: usize,
        value: Option<&V>,
    ) -> Result<(), MoveApplicationError> {
        let legal = match value {
            Some(v) => self.value_range.contains(solution, entity_index, v),
            None => self.allows_unassigned,
        };
        if legal {
            Ok(())
        } else {
            Err(MoveApplicationError::ValueOutOfRange {
                variable: self.variable_name,
                entity_index,
                value: format!("{:?}", value),
            })
        }
    }
}

impl<S, V> Debug for BasicVariable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicVariable")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("allows_unassigned", &self.allows_unassigned)
            .finish_non_exhaustive()
    }
}

/// Binding of a list planning variable.
///
/// Each entity owns an ordered list of elements. Every element of
/// `element_range` belongs to at most one list; elements in no list are
/// unassigned.
pub struct ListVariable<S, V> {
    pub descriptor_index: usize,
    pub variable_name: &'static str,
    pub entity_count: fn(&S) -> usize,
    pub list: fn(&S, usize) -> &[V],
    pub list_mut: fn(&mut S, usize) -> &mut Vec<V>,
    pub element_range: Arc<dyn ValueRange<S, V>>,
    pub pinned: Option<fn(&S, usize) -> bool>,
}

impl<S, V> ListVariable<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    pub fn new(
        descriptor_index: usize,
        variable_name: &'static str,
        entity_count: fn(&S) -> usize,
        list: fn(&S, usize) -> &[V],
        list_mut: fn(&mut S, usize) -> &mut Vec<V>,
        element_range: impl ValueRange<S, V> + 'static,
    ) -> Self {
        Self {
            descriptor_index,
            variable_name,
            entity_count,
            list,
            list_mut,
            element_range: Arc::new(element_range),
            pinned: None,
        }
    }

    pub fn with_pinned(mut self, pinned: fn(&S, usize) -> bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn entity_count(&self, solution: &S) -> usize {
        (self.entity_count)(solution)
    }

    pub fn list<'s>(&self, solution: &'s S, entity_index: usize) -> &'s [V] {
        (self.list)(solution, entity_index)
    }

    pub fn len(&self, solution: &S, entity_index: usize) -> usize {
        self.list(solution, entity_index).len()
    }

    pub fn is_pinned(&self, solution: &S, entity_index: usize) -> bool {
        self.pinned.is_some_and(|p| p(solution, entity_index))
    }

    /// Elements of the range that are in no list, in range order.
    pub fn unassigned_elements(&self, solution: &S) -> Vec<V> {
        let assigned: HashSet<&V> = (0..self.entity_count(solution))
            .flat_map(|e| self.list(solution, e))
            .collect();
        self.element_range
            .values(solution, 0)
            .into_iter()
            .filter(|v| !assigned.contains(v))
            .collect()
    }

    /// Fails unless `entity_index` exists and is movable.
    pub fn check_entity(
        &self,
        solution: &S,
        entity_index: usize,
    ) -> Result<(), MoveApplicationError> {
        let entity_count = self.entity_count(solution);
        if entity_index >= entity_count {
            return Err(MoveApplicationError::EntityOutOfBounds {
                entity_index,
                entity_count,
            });
        }
        if self.is_pinned(solution, entity_index) {
            return Err(MoveApplicationError::Pinned { entity_index });
        }
        Ok(())
    }

    /// Fails if `index` is past `len + slack` on `entity_index`.
    ///
    /// A slack of 0 checks an existing position; 1 checks an insertion point.
    pub fn check_index(
        &self,
        solution: &S,
        entity_index: usize,
        index: usize,
        slack: usize,
    ) -> Result<(), MoveApplicationError> {
        let len = self.len(solution, entity_index);
        if index < len + slack {
            Ok(())
        } else {
            Err(MoveApplicationError::StaleIndex {
                entity_index,
                index,
                len,
            })
        }
    }

    /// Fails unless `element` belongs to the element range.
    pub fn check_element(
        &self,
        solution: &S,
        entity_index: usize,
        element: &V,
    ) -> Result<(), MoveApplicationError> {
        if self.element_range.contains(solution, entity_index, element) {
            Ok(())
        } else {
            Err(MoveApplicationError::ValueOutOfRange {
                variable: self.variable_name,
                entity_index,
                value: format!("{:?}", element),
            })
        }
    }
}

impl<S, V> Debug for ListVariable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListVariable")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish_non_exhaustive()
    }
}
