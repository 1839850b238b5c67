//! SwapMove - exchanges the values of two entities.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::signature::state_hash;
use super::{Move, MoveSignature};
use crate::heuristic::variable::{BasicVariable, PlanningValue};

/// A move that swaps one variable's values between two entities.
///
/// Each entity's new value must lie in its own value range, so swaps stay
/// legal for entity-dependent ranges.
pub struct SwapMove<S, V> {
    variable: Arc<BasicVariable<S, V>>,
    entities: [usize; 2],
}

impl<S, V> Clone for SwapMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            entities: self.entities,
        }
    }
}

impl<S, V> Debug for SwapMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapMove")
            .field("variable_name", &self.variable.variable_name)
            .field("left", &self.entities[0])
            .field("right", &self.entities[1])
            .finish()
    }
}

impl<S, V> SwapMove<S, V> {
    pub fn new(variable: Arc<BasicVariable<S, V>>, left: usize, right: usize) -> Self {
        Self {
            variable,
            entities: [left, right],
        }
    }
}

impl<S, V> Move<S> for SwapMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
        let [left, right] = self.entities;
        let solution = score_director.working_solution();
        if left == right
            || self.variable.check_entity(solution, left).is_err()
            || self.variable.check_entity(solution, right).is_err()
        {
            return false;
        }
        self.variable.get(solution, left) != self.variable.get(solution, right)
    }

    fn do_move(
        &self,
        score_director: &mut dyn ScoreDirector<S>,
    ) -> Result<(), MoveApplicationError> {
        let var = &self.variable;
        let [left, right] = self.entities;
        let solution = score_director.working_solution();
        var.check_entity(solution, left)?;
        var.check_entity(solution, right)?;
        let left_value = var.get(solution, left);
        let right_value = var.get(solution, right);
        var.check_value(solution, left, right_value.as_ref())?;
        var.check_value(solution, right, left_value.as_ref())?;

        score_director.before_variable_changed(var.descriptor_index, left, var.variable_name);
        score_director.before_variable_changed(var.descriptor_index, right, var.variable_name);
        let solution = score_director.working_solution_mut();
        (var.setter)(solution, left, right_value.clone());
        (var.setter)(solution, right, left_value.clone());
        score_director.after_variable_changed(var.descriptor_index, left, var.variable_name);
        score_director.after_variable_changed(var.descriptor_index, right, var.variable_name);

        let setter = var.setter;
        score_director.register_undo(Box::new(move |s: &mut S| {
            setter(s, left, left_value);
            setter(s, right, right_value);
        }));
        Ok(())
    }

    fn descriptor_index(&self) -> usize {
        self.variable.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        &self.entities
    }

    fn variable_name(&self) -> &str {
        self.variable.variable_name
    }

    fn signature(&self, score_director: &dyn ScoreDirector<S>) -> MoveSignature {
        let solution = score_director.working_solution();
        let (lo, hi) = (
            self.entities[0].min(self.entities[1]),
            self.entities[0].max(self.entities[1]),
        );
        let lo_value = self.variable.get(solution, lo);
        let hi_value = self.variable.get(solution, hi);
        MoveSignature::new(
            self.variable.descriptor_index,
            [lo, hi],
            state_hash("swap", &(&lo_value, &hi_value)),
            state_hash("swap", &(&hi_value, &lo_value)),
        )
    }
}
