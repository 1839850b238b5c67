//! ListSwapMove - exchanges two elements of list variables.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::signature::state_hash;
use super::{Move, MoveSignature};
use crate::heuristic::variable::{ListVariable, PlanningValue};

/// Swaps the elements at two positions, within one list or across two.
pub struct ListSwapMove<S, V> {
    variable: Arc<ListVariable<S, V>>,
    entities: [usize; 2],
    indices: [usize; 2],
}

impl<S, V> Clone for ListSwapMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            entities: self.entities,
            indices: self.indices,
        }
    }
}

impl<S, V> Debug for ListSwapMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSwapMove")
            .field("first", &(self.entities[0], self.indices[0]))
            .field("second", &(self.entities[1], self.indices[1]))
            .finish()
    }
}

impl<S, V> ListSwapMove<S, V> {
    pub fn new(
        variable: Arc<ListVariable<S, V>>,
        first_entity: usize,
        first_index: usize,
        second_entity: usize,
        second_index: usize,
    ) -> Self {
        Self {
            variable,
            entities: [first_entity, second_entity],
            indices: [first_index, second_index],
        }
    }

    fn is_intra_list(&self) -> bool {
        self.entities[0] == self.entities[1]
    }
}

impl<S, V> ListSwapMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn validate(&self, solution: &S) -> Result<(), MoveApplicationError> {
        for (&entity, &index) in self.entities.iter().zip(&self.indices) {
            self.variable.check_entity(solution, entity)?;
            self.variable.check_index(solution, entity, index, 0)?;
        }
        Ok(())
    }

    fn elements(&self, solution: &S) -> Option<(V, V)> {
        let first = self.variable.list(solution, self.entities[0]).get(self.indices[0])?;
        let second = self.variable.list(solution, self.entities[1]).get(self.indices[1])?;
        Some((first.clone(), second.clone()))
    }
}

// Swaps two positions in place. Positions are validated by the caller.
fn swap_positions<S, V>(
    list_mut: fn(&mut S, usize) -> &mut Vec<V>,
    solution: &mut S,
    (first_entity, first_index): (usize, usize),
    (second_entity, second_index): (usize, usize),
    first: V,
    second: V,
) {
    if first_entity == second_entity {
        list_mut(solution, first_entity).swap(first_index, second_index);
    } else {
        list_mut(solution, first_entity)[first_index] = second;
        list_mut(solution, second_entity)[second_index] = first;
    }
}

impl<S, V> Move<S> for ListSwapMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
        let solution = score_director.working_solution();
        if self.is_intra_list() && self.indices[0] == self.indices[1] {
            return false;
        }
        if self.validate(solution).is_err() {
            return false;
        }
        self.elements(solution).is_some_and(|(a, b)| a != b)
    }

    fn do_move(
        &self,
        score_director: &mut dyn ScoreDirector<S>,
    ) -> Result<(), MoveApplicationError> {
        let solution = score_director.working_solution();
        self.validate(solution)?;
        let Some((first, second)) = self.elements(solution) else {
            return Err(MoveApplicationError::NotDoable("swap positions vanished".into()));
        };
        let var = &self.variable;
        let a = (self.entities[0], self.indices[0]);
        let b = (self.entities[1], self.indices[1]);

        score_director.before_variable_changed(var.descriptor_index, a.0, var.variable_name);
        if !self.is_intra_list() {
            score_director.before_variable_changed(var.descriptor_index, b.0, var.variable_name);
        }
        swap_positions(
            var.list_mut,
            score_director.working_solution_mut(),
            a,
            b,
            first.clone(),
            second.clone(),
        );
        score_director.after_variable_changed(var.descriptor_index, a.0, var.variable_name);
        if !self.is_intra_list() {
            score_director.after_variable_changed(var.descriptor_index, b.0, var.variable_name);
        }

        let list_mut = var.list_mut;
        score_director.register_undo(Box::new(move |s: &mut S| {
            // The first position now holds `second`.
            swap_positions(list_mut, s, a, b, second, first);
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
        let elements = self.elements(score_director.working_solution());
        let mut a = (self.entities[0], self.indices[0]);
        let mut b = (self.entities[1], self.indices[1]);
        let (mut x, mut y) = match elements {
            Some((x, y)) => (Some(x), Some(y)),
            None => (None, None),
        };
        if b < a {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut x, &mut y);
        }
        MoveSignature::new(
            self.variable.descriptor_index,
            self.entities,
            state_hash("list_swap", &(a, &x, b, &y)),
            state_hash("list_swap", &(a, &y, b, &x)),
        )
    }
}
