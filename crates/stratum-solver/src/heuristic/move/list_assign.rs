//! ListAssignMove - inserts an unassigned element into a list.
//!
//! Used by list construction; local search only rearranges elements that are
//! already assigned.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::signature::state_hash;
use super::{Move, MoveSignature};
use crate::heuristic::variable::{ListVariable, PlanningValue};

pub struct ListAssignMove<S, V> {
    variable: Arc<ListVariable<S, V>>,
    element: V,
    entity_index: usize,
    index: usize,
}

impl<S, V: Clone> Clone for ListAssignMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            element: self.element.clone(),
            entity_index: self.entity_index,
            index: self.index,
        }
    }
}

impl<S, V: Debug> Debug for ListAssignMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAssignMove")
            .field("element", &self.element)
            .field("entity_index", &self.entity_index)
            .field("index", &self.index)
            .finish()
    }
}

impl<S, V> ListAssignMove<S, V> {
    pub fn new(
        variable: Arc<ListVariable<S, V>>,
        element: V,
        entity_index: usize,
        index: usize,
    ) -> Self {
        Self {
            variable,
            element,
            entity_index,
            index,
        }
    }

    pub fn element(&self) -> &V {
        &self.element
    }
}

impl<S, V> ListAssignMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn validate(&self, solution: &S) -> Result<(), MoveApplicationError> {
        let var = &self.variable;
        var.check_entity(solution, self.entity_index)?;
        var.check_element(solution, self.entity_index, &self.element)?;
        var.check_index(solution, self.entity_index, self.index, 1)?;
        let assigned =
            (0..var.entity_count(solution)).any(|e| var.list(solution, e).contains(&self.element));
        if assigned {
            return Err(MoveApplicationError::NotDoable(format!(
                "element {:?} is already assigned",
                self.element
            )));
        }
        Ok(())
    }
}

impl<S, V> Move<S> for ListAssignMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
        self.validate(score_director.working_solution()).is_ok()
    }

    fn do_move(
        &self,
        score_director: &mut dyn ScoreDirector<S>,
    ) -> Result<(), MoveApplicationError> {
        self.validate(score_director.working_solution())?;
        let var = &self.variable;
        let (entity, index) = (self.entity_index, self.index);

        score_director.before_variable_changed(var.descriptor_index, entity, var.variable_name);
        (var.list_mut)(score_director.working_solution_mut(), entity)
            .insert(index, self.element.clone());
        score_director.after_variable_changed(var.descriptor_index, entity, var.variable_name);

        let list_mut = var.list_mut;
        score_director.register_undo(Box::new(move |s: &mut S| {
            list_mut(s, entity).remove(index);
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

    fn signature(&self, _score_director: &dyn ScoreDirector<S>) -> MoveSignature {
        MoveSignature::new(
            self.variable.descriptor_index,
            [self.entity_index],
            state_hash("list_assign", &("unassigned", &self.element)),
            state_hash("list_assign", &(self.entity_index, self.index, &self.element)),
        )
    }
}
