//! Problem changes applied to a running solver.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::{MoveApplicationError, SolverError};
use stratum_scoring::ScoreDirector;

use crate::heuristic::{BasicVariable, PlanningValue};

/// A structural edit of the problem, applied between steps.
///
/// Implementations mutate the working solution through the director and
/// bracket every edit with the matching `before_*`/`after_*` notification,
/// so the constraint graph retracts and re-inserts the affected elements.
///
/// A change that returns an error must leave the working solution as it
/// found it.
pub trait ProblemChange<S: PlanningSolution>: Send + Debug {
    fn apply(&self, score_director: &mut dyn ScoreDirector<S>) -> Result<(), SolverError>;
}

pub type BoxedProblemChange<S> = Box<dyn ProblemChange<S>>;

/// A problem change backed by a closure.
pub struct ClosureProblemChange<S, F> {
    name: &'static str,
    change_fn: F,
    _phantom: std::marker::PhantomData<fn() -> S>,
}

impl<S, F> ClosureProblemChange<S, F>
where
    S: PlanningSolution,
    F: Fn(&mut dyn ScoreDirector<S>) -> Result<(), SolverError> + Send,
{
    pub fn new(name: &'static str, change_fn: F) -> Self {
        Self {
            name,
            change_fn,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, F> Debug for ClosureProblemChange<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureProblemChange")
            .field("name", &self.name)
            .finish()
    }
}

impl<S, F> ProblemChange<S> for ClosureProblemChange<S, F>
where
    S: PlanningSolution,
    F: Fn(&mut dyn ScoreDirector<S>) -> Result<(), SolverError> + Send,
{
    fn apply(&self, score_director: &mut dyn ScoreDirector<S>) -> Result<(), SolverError> {
        (self.change_fn)(score_director)
    }
}

/// Appends an entity to the collection of entity descriptor
/// `descriptor_index`.
pub struct AddEntity<S, E> {
    descriptor_index: usize,
    entity: E,
    entities: fn(&mut S) -> &mut Vec<E>,
}

impl<S, E> AddEntity<S, E> {
    pub fn new(descriptor_index: usize, entity: E, entities: fn(&mut S) -> &mut Vec<E>) -> Self {
        Self {
            descriptor_index,
            entity,
            entities,
        }
    }
}

impl<S, E: Debug> Debug for AddEntity<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddEntity")
            .field("descriptor_index", &self.descriptor_index)
            .field("entity", &self.entity)
            .finish()
    }
}

impl<S, E> ProblemChange<S> for AddEntity<S, E>
where
    S: PlanningSolution,
    E: Clone + Debug + Send + Sync,
{
    fn apply(&self, score_director: &mut dyn ScoreDirector<S>) -> Result<(), SolverError> {
        let index = (self.entities)(score_director.working_solution_mut()).len();
        score_director.before_entity_added(self.descriptor_index, index);
        (self.entities)(score_director.working_solution_mut()).push(self.entity.clone());
        score_director.after_entity_added(self.descriptor_index, index);
        Ok(())
    }
}

/// Removes the entity at `entity_index`; later entities shift down.
///
/// Fails with [`MoveApplicationError::EntityOutOfBounds`] when the entity no
/// longer exists.
pub struct RemoveEntity<S, E> {
    descriptor_index: usize,
    entity_index: usize,
    entities: fn(&mut S) -> &mut Vec<E>,
}

impl<S, E> RemoveEntity<S, E> {
    pub fn new(
        descriptor_index: usize,
        entity_index: usize,
        entities: fn(&mut S) -> &mut Vec<E>,
    ) -> Self {
        Self {
            descriptor_index,
            entity_index,
            entities,
        }
    }
}

impl<S, E> Debug for RemoveEntity<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoveEntity")
            .field("descriptor_index", &self.descriptor_index)
            .field("entity_index", &self.entity_index)
            .finish()
    }
}

impl<S, E> ProblemChange<S> for RemoveEntity<S, E>
where
    S: PlanningSolution,
    E: Send + Sync,
{
    fn apply(&self, score_director: &mut dyn ScoreDirector<S>) -> Result<(), SolverError> {
        let entity_count = (self.entities)(score_director.working_solution_mut()).len();
        if self.entity_index >= entity_count {
            return Err(MoveApplicationError::EntityOutOfBounds {
                entity_index: self.entity_index,
                entity_count,
            }
            .into());
        }
        score_director.before_entity_removed(self.descriptor_index, self.entity_index);
        (self.entities)(score_director.working_solution_mut()).remove(self.entity_index);
        score_director.after_entity_removed(self.descriptor_index, self.entity_index);
        Ok(())
    }
}

/// Sets one planning variable of one entity.
///
/// The entity must exist and the value must lie in the variable's value
/// range; `None` is accepted only when the variable allows unassigned
/// entities. Pinned entities may be changed.
pub struct ChangeVariable<S, V> {
    variable: Arc<BasicVariable<S, V>>,
    entity_index: usize,
    value: Option<V>,
}

impl<S, V> ChangeVariable<S, V> {
    pub fn new(variable: Arc<BasicVariable<S, V>>, entity_index: usize, value: Option<V>) -> Self {
        Self {
            variable,
            entity_index,
            value,
        }
    }
}

impl<S, V: Debug> Debug for ChangeVariable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeVariable")
            .field("descriptor_index", &self.variable.descriptor_index)
            .field("entity_index", &self.entity_index)
            .field("variable_name", &self.variable.variable_name)
            .field("value", &self.value)
            .finish()
    }
}

impl<S, V> ProblemChange<S> for ChangeVariable<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    fn apply(&self, score_director: &mut dyn ScoreDirector<S>) -> Result<(), SolverError> {
        let variable = &self.variable;
        let solution = score_director.working_solution();
        let entity_count = variable.entity_count(solution);
        if self.entity_index >= entity_count {
            return Err(MoveApplicationError::EntityOutOfBounds {
                entity_index: self.entity_index,
                entity_count,
            }
            .into());
        }
        variable.check_value(solution, self.entity_index, self.value.as_ref())?;

        let (d, e, name) = (variable.descriptor_index, self.entity_index, variable.variable_name);
        score_director.before_variable_changed(d, e, name);
        (variable.setter)(score_director.working_solution_mut(), e, self.value.clone());
        score_director.after_variable_changed(d, e, name);
        Ok(())
    }
}

/// Appends a problem fact to the collection of fact descriptor
/// `descriptor_index`.
pub struct AddProblemFact<S, F> {
    descriptor_index: usize,
    fact: F,
    facts: fn(&mut S) -> &mut Vec<F>,
}

impl<S, F> AddProblemFact<S, F> {
    pub fn new(descriptor_index: usize, fact: F, facts: fn(&mut S) -> &mut Vec<F>) -> Self {
        Self {
            descriptor_index,
            fact,
            facts,
        }
    }
}

impl<S, F: Debug> Debug for AddProblemFact<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddProblemFact")
            .field("descriptor_index", &self.descriptor_index)
            .field("fact", &self.fact)
            .finish()
    }
}

impl<S, F> ProblemChange<S> for AddProblemFact<S, F>
where
    S: PlanningSolution,
    F: Clone + Debug + Send + Sync,
{
    fn apply(&self, score_director: &mut dyn ScoreDirector<S>) -> Result<(), SolverError> {
        let index = (self.facts)(score_director.working_solution_mut()).len();
        score_director.before_problem_fact_added(self.descriptor_index, index);
        (self.facts)(score_director.working_solution_mut()).push(self.fact.clone());
        score_director.after_problem_fact_added(self.descriptor_index, index);
        Ok(())
    }
}

/// Removes the problem fact at `fact_index`.
pub struct RemoveProblemFact<S, F> {
    descriptor_index: usize,
    fact_index: usize,
    facts: fn(&mut S) -> &mut Vec<F>,
}

impl<S, F> RemoveProblemFact<S, F> {
    pub fn new(
        descriptor_index: usize,
        fact_index: usize,
        facts: fn(&mut S) -> &mut Vec<F>,
    ) -> Self {
        Self {
            descriptor_index,
            fact_index,
            facts,
        }
    }
}

impl<S, F> Debug for RemoveProblemFact<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoveProblemFact")
            .field("descriptor_index", &self.descriptor_index)
            .field("fact_index", &self.fact_index)
            .finish()
    }
}

impl<S, F> ProblemChange<S> for RemoveProblemFact<S, F>
where
    S: PlanningSolution,
    F: Send + Sync,
{
    fn apply(&self, score_director: &mut dyn ScoreDirector<S>) -> Result<(), SolverError> {
        let len = (self.facts)(score_director.working_solution_mut()).len();
        if self.fact_index >= len {
            return Err(SolverError::InvalidState(format!(
                "problem fact {} of descriptor {} does not exist ({} facts)",
                self.fact_index, self.descriptor_index, len
            )));
        }
        score_director.before_problem_fact_removed(self.descriptor_index, self.fact_index);
        (self.facts)(score_director.working_solution_mut()).remove(self.fact_index);
        score_director.after_problem_fact_removed(self.descriptor_index, self.fact_index);
        Ok(())
    }
}
