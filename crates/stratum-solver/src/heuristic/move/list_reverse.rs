//! ListReverseMove - reverses a segment of one list (2-opt).
//!
//! For routing this removes two edges and reconnects the route with the
//! segment in between traversed backwards:
//!
//! ```text
//! [a, b, c, d, e]   reverse 1..4   [a, d, c, b, e]
//! ```

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::signature::state_hash;
use super::{Move, MoveSignature};
use crate::heuristic::variable::{ListVariable, PlanningValue};

/// Reverses `start..end` (end exclusive) in one entity's list.
pub struct ListReverseMove<S, V> {
    variable: Arc<ListVariable<S, V>>,
    entity_index: usize,
    start: usize,
    end: usize,
}

impl<S, V> Clone for ListReverseMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            entity_index: self.entity_index,
            start: self.start,
            end: self.end,
        }
    }
}

impl<S, V> Debug for ListReverseMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListReverseMove")
            .field("entity_index", &self.entity_index)
            .field("segment", &(self.start..self.end))
            .finish()
    }
}

impl<S, V> ListReverseMove<S, V> {
    pub fn new(
        variable: Arc<ListVariable<S, V>>,
        entity_index: usize,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            variable,
            entity_index,
            start,
            end,
        }
    }

    pub fn segment_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

impl<S, V> ListReverseMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn validate(&self, solution: &S) -> Result<(), MoveApplicationError> {
        self.variable.check_entity(solution, self.entity_index)?;
        if self.start >= self.end {
            return Err(MoveApplicationError::NotDoable(format!(
                "empty segment {}..{}",
                self.start, self.end
            )));
        }
        // `end` is exclusive, so it may equal the length.
        self.variable
            .check_index(solution, self.entity_index, self.end, 1)
    }
}

impl<S, V> Move<S> for ListReverseMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
        self.segment_len() >= 2 && self.validate(score_director.working_solution()).is_ok()
    }

    fn do_move(
        &self,
        score_director: &mut dyn ScoreDirector<S>,
    ) -> Result<(), MoveApplicationError> {
        self.validate(score_director.working_solution())?;
        let var = &self.variable;
        let (entity, start, end) = (self.entity_index, self.start, self.end);

        score_director.before_variable_changed(var.descriptor_index, entity, var.variable_name);
        (var.list_mut)(score_director.working_solution_mut(), entity)[start..end].reverse();
        score_director.after_variable_changed(var.descriptor_index, entity, var.variable_name);

        let list_mut = var.list_mut;
        score_director.register_undo(Box::new(move |s: &mut S| {
            list_mut(s, entity)[start..end].reverse();
        }));
        Ok(())
    }

    fn descriptor_index(&self) -> usize {
        self.variable.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        std::slice::from_ref(&self.entity_index)
    }

    fn variable_name(&self) -> &str {
        self.variable.variable_name
    }

    fn signature(&self, score_director: &dyn ScoreDirector<S>) -> MoveSignature {
        let list = self
            .variable
            .list(score_director.working_solution(), self.entity_index);
        let segment = list.get(self.start..self.end).unwrap_or_default();
        let reversed: Vec<&V> = segment.iter().rev().collect();
        MoveSignature::new(
            self.variable.descriptor_index,
            [self.entity_index],
            state_hash("list_reverse", &(self.start, segment.iter().collect::<Vec<_>>())),
            state_hash("list_reverse", &(self.start, reversed)),
        )
    }
}
