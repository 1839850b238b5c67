//! ListChangeMove - relocates one element of a list variable.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::signature::state_hash;
use super::{Move, MoveSignature};
use crate::heuristic::variable::{ListVariable, PlanningValue};

/// Moves the element at `(from_entity, from_index)` to `(to_entity, to_index)`.
///
/// The element is removed first; `to_index` is a position in the destination
/// list after that removal. Within one list, `to_index` may therefore be at
/// most `len - 1`.
///
/// # Example
///
/// ```text
/// route 0: [a, b, c]        ListChangeMove(0, 0 -> 0, 2)
/// route 0: [b, c, a]
/// ```
pub struct ListChangeMove<S, V> {
    variable: Arc<ListVariable<S, V>>,
    entities: [usize; 2],
    from_index: usize,
    to_index: usize,
}

impl<S, V> Clone for ListChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            entities: self.entities,
            from_index: self.from_index,
            to_index: self.to_index,
        }
    }
}

impl<S, V> Debug for ListChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListChangeMove")
            .field("from_entity", &self.entities[0])
            .field("from_index", &self.from_index)
            .field("to_entity", &self.entities[1])
            .field("to_index", &self.to_index)
            .finish()
    }
}

impl<S, V> ListChangeMove<S, V> {
    pub fn new(
        variable: Arc<ListVariable<S, V>>,
        from_entity: usize,
        from_index: usize,
        to_entity: usize,
        to_index: usize,
    ) -> Self {
        Self {
            variable,
            entities: [from_entity, to_entity],
            from_index,
            to_index,
        }
    }

    fn is_intra_list(&self) -> bool {
        self.entities[0] == self.entities[1]
    }
}

impl<S, V> ListChangeMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn validate(&self, solution: &S) -> Result<(), MoveApplicationError> {
        let var = &self.variable;
        let [from, to] = self.entities;
        var.check_entity(solution, from)?;
        var.check_entity(solution, to)?;
        var.check_index(solution, from, self.from_index, 0)?;
        // Inside one list the removal shortens the destination by one.
        let slack = if self.is_intra_list() { 0 } else { 1 };
        var.check_index(solution, to, self.to_index, slack)
    }
}

impl<S, V> Move<S> for ListChangeMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
        if self.is_intra_list() && self.from_index == self.to_index {
            return false;
        }
        self.validate(score_director.working_solution()).is_ok()
    }

    fn do_move(
        &self,
        score_director: &mut dyn ScoreDirector<S>,
    ) -> Result<(), MoveApplicationError> {
        self.validate(score_director.working_solution())?;
        let var = &self.variable;
        let [from, to] = self.entities;
        let (from_index, to_index) = (self.from_index, self.to_index);

        score_director.before_variable_changed(var.descriptor_index, from, var.variable_name);
        if !self.is_intra_list() {
            score_director.before_variable_changed(var.descriptor_index, to, var.variable_name);
        }
        let solution = score_director.working_solution_mut();
        let element = (var.list_mut)(solution, from).remove(from_index);
        (var.list_mut)(solution, to).insert(to_index, element);
        score_director.after_variable_changed(var.descriptor_index, from, var.variable_name);
        if !self.is_intra_list() {
            score_director.after_variable_changed(var.descriptor_index, to, var.variable_name);
        }

        let list_mut = var.list_mut;
        score_director.register_undo(Box::new(move |s: &mut S| {
            let element = list_mut(s, to).remove(to_index);
            list_mut(s, from).insert(from_index, element);
        }));
        Ok(())
    }

    fn descriptor_index(&self) -> usize {
        self.variable.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        if self.is_intra_list() {
            &self.entities[..1]
        } else {
            &self.entities
        }
    }

    fn variable_name(&self) -> &str {
        self.variable.variable_name
    }

    fn signature(&self, score_director: &dyn ScoreDirector<S>) -> MoveSignature {
        let [from, to] = self.entities;
        let element = self
            .variable
            .list(score_director.working_solution(), from)
            .get(self.from_index);
        MoveSignature::new(
            self.variable.descriptor_index,
            self.entities,
            state_hash("list_change", &(from, self.from_index, element)),
            state_hash("list_change", &(to, self.to_index, element)),
        )
    }
}
