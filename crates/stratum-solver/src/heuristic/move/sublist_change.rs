//! SubListChangeMove - relocates a contiguous sublist.
//!
//! Moves `from_entity[start..end]` to `to_index` of `to_entity`, where
//! `to_index` is a position in the destination after the sublist is taken
//! out. Within one list this is an Or-opt move.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::MoveApplicationError;
use stratum_scoring::ScoreDirector;

use super::signature::state_hash;
use super::{Move, MoveSignature};
use crate::heuristic::variable::{ListVariable, PlanningValue};

pub struct SubListChangeMove<S, V> {
    variable: Arc<ListVariable<S, V>>,
    entities: [usize; 2],
    start: usize,
    end: usize,
    to_index: usize,
}

impl<S, V> Clone for SubListChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            entities: self.entities,
            start: self.start,
            end: self.end,
            to_index: self.to_index,
        }
    }
}

impl<S, V> Debug for SubListChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubListChangeMove")
            .field("from_entity", &self.entities[0])
            .field("segment", &(self.start..self.end))
            .field("to_entity", &self.entities[1])
            .field("to_index", &self.to_index)
            .finish()
    }
}

impl<S, V> SubListChangeMove<S, V> {
    pub fn new(
        variable: Arc<ListVariable<S, V>>,
        from_entity: usize,
        start: usize,
        end: usize,
        to_entity: usize,
        to_index: usize,
    ) -> Self {
        Self {
            variable,
            entities: [from_entity, to_entity],
            start,
            end,
            to_index,
        }
    }

    pub fn sublist_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    fn is_intra_list(&self) -> bool {
        self.entities[0] == self.entities[1]
    }
}

impl<S, V> SubListChangeMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn validate(&self, solution: &S) -> Result<(), MoveApplicationError> {
        let var = &self.variable;
        let [from, to] = self.entities;
        var.check_entity(solution, from)?;
        var.check_entity(solution, to)?;
        if self.start >= self.end {
            return Err(MoveApplicationError::NotDoable(format!(
                "empty sublist {}..{}",
                self.start, self.end
            )));
        }
        var.check_index(solution, from, self.end, 1)?;
        let to_len = var.len(solution, to);
        let remaining = if self.is_intra_list() {
            to_len - self.sublist_len()
        } else {
            to_len
        };
        if self.to_index > remaining {
            return Err(MoveApplicationError::StaleIndex {
                entity_index: to,
                index: self.to_index,
                len: remaining,
            });
        }
        Ok(())
    }
}

fn insert_all<V>(list: &mut Vec<V>, at: usize, items: Vec<V>) {
    let tail = list.split_off(at);
    list.extend(items);
    list.extend(tail);
}

impl<S, V> Move<S> for SubListChangeMove<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn is_doable(&self, score_director: &dyn ScoreDirector<S>) -> bool {
        if self.is_intra_list() && self.to_index == self.start {
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
        let (start, end, to_index) = (self.start, self.end, self.to_index);
        let len = end - start;

        score_director.before_variable_changed(var.descriptor_index, from, var.variable_name);
        if !self.is_intra_list() {
            score_director.before_variable_changed(var.descriptor_index, to, var.variable_name);
        }
        let solution = score_director.working_solution_mut();
        let sublist: Vec<V> = (var.list_mut)(solution, from).drain(start..end).collect();
        insert_all((var.list_mut)(solution, to), to_index, sublist);
        score_director.after_variable_changed(var.descriptor_index, from, var.variable_name);
        if !self.is_intra_list() {
            score_director.after_variable_changed(var.descriptor_index, to, var.variable_name);
        }

        let list_mut = var.list_mut;
        score_director.register_undo(Box::new(move |s: &mut S| {
            let sublist: Vec<V> = list_mut(s, to).drain(to_index..to_index + len).collect();
            insert_all(list_mut(s, from), start, sublist);
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
        let list = self.variable.list(score_director.working_solution(), from);
        let sublist = list.get(self.start..self.end).unwrap_or_default();
        MoveSignature::new(
            self.variable.descriptor_index,
            self.entities,
            state_hash("sublist_change", &(from, self.start, sublist)),
            state_hash("sublist_change", &(to, self.to_index, sublist)),
        )
    }
}
