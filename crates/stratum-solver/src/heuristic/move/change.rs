//! ChangeMove - assigns a value to a planning variable.
//!
//! This is the most fundamental move type. It takes a value and assigns
//! it to a planning variable on an entity.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::signature::state_hash;
use super::{Move, MoveSignature};
use crate::heuristic::variable::{BasicVariable, PlanningValue};

/// A move that assigns a value (or `None`) to an entity's variable.
///
/// The target value is checked against the variable's value range before
/// anything is mutated; an out-of-range value fails with
/// [`MoveApplicationError::ValueOutOfRange`].
pub struct ChangeMove<S, V> {
    variable: Arc<BasicVariable<S, V>>,
    entity_index: usize,
    to_value: Option<V>,
}

impl<S, V: Clone> Clone for ChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            entity_index: self.entity_index,
            to_value: self.to_value.clone(),
        }
    }
}

impl<S, V: Debug> Debug for ChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMove")
            .field("variable_name", &self.variable.variable_name)
            .field("entity_index", &self.entity_index)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S, V> ChangeMove<S, V> {
    pub fn new(
        variable: Arc<BasicVariable<S, V>>,
        entity_index: usize,
        to_value: Option<V>,
    ) -> Self {
        Self {
            variable,
            entity_index,
            to_value,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn to_value(&self) -> Option<&V> {
        self.to_value.as_ref()
    }
}

impl<S, V> Move<S> for ChangeMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
        let solution = score_director.working_solution();
        if self.variable.check_entity(solution, self.entity_index).is_err() {
            return false;
        }
        self.variable.get(solution, self.entity_index) != self.to_value
    }

    fn do_move(
        &self,
        score_director: &mut dyn ScoreDirector<S>,
    ) -> Result<(), MoveApplicationError> {
        let var = &self.variable;
        let solution = score_director.working_solution();
        var.check_entity(solution, self.entity_index)?;
        var.check_value(solution, self.entity_index, self.to_value.as_ref())?;
        let old_value = var.get(solution, self.entity_index);

        score_director.before_variable_changed(
            var.descriptor_index,
            self.entity_index,
            var.variable_name,
        );
        (var.setter)(
            score_director.working_solution_mut(),
            self.entity_index,
            self.to_value.clone(),
        );
        score_director.after_variable_changed(
            var.descriptor_index,
            self.entity_index,
            var.variable_name,
        );

        let setter = var.setter;
        let idx = self.entity_index;
        score_director.register_undo(Box::new(move |s: &mut S| {
            setter(s, idx, old_value);
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
        let current = self
            .variable
            .get(score_director.working_solution(), self.entity_index);
        MoveSignature::new(
            self.variable.descriptor_index,
            [self.entity_index],
            state_hash("change", &(self.entity_index, &current)),
            state_hash("change", &(self.entity_index, &self.to_value)),
        )
    }
}
