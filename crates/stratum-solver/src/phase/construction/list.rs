//! Cheapest insertion for list variables.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;
use stratum_core::SolverError;
use stratum_scoring::ScoreDirector;

use crate::heuristic::r#move::{ListAssignMove, Move};
use crate::heuristic::variable::{ListVariable, PlanningValue};
use crate::phase::{evaluate_move, first_best, Phase};
use crate::scope::SolverScope;
use crate::termination::Termination;

/// Inserts every unassigned element at its cheapest position.
///
/// Elements are placed in element range order. Each step scores the
/// element at every position of every unpinned list.
pub struct ListConstructionPhase<S: PlanningSolution, V> {
    variable: Arc<ListVariable<S, V>>,
    termination: Option<Box<dyn Termination<S>>>,
}

impl<S, V> ListConstructionPhase<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    pub fn new(variable: Arc<ListVariable<S, V>>) -> Self {
        Self {
            variable,
            termination: None,
        }
    }

    pub fn with_termination(mut self, termination: impl Termination<S> + 'static) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_boxed_termination(mut self, termination: Option<Box<dyn Termination<S>>>) -> Self {
        self.termination = termination;
        self
    }

    fn insertions(&self, solution: &S, element: &V) -> Vec<ListAssignMove<S, V>> {
        let var = &self.variable;
        let mut moves = Vec::new();
        for entity in 0..var.entity_count(solution) {
            if var.is_pinned(solution, entity) {
                continue;
            }
            for index in 0..=var.len(solution, entity) {
                moves.push(ListAssignMove::new(Arc::clone(var), element.clone(), entity, index));
            }
        }
        moves
    }
}

impl<S: PlanningSolution, V> Debug for ListConstructionPhase<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConstructionPhase")
            .field("variable", &self.variable.variable_name)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S, D, V> Phase<S, D> for ListConstructionPhase<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: PlanningValue,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<'_, S, D>) -> Result<(), SolverError> {
        let elements = self.variable.unassigned_elements(solver_scope.working_solution());
        let assert_moves = solver_scope.environment_mode().asserts_moves();

        for element in elements {
            if solver_scope.is_phase_terminated(self.termination.as_deref()) {
                break;
            }
            solver_scope.step_started();

            let moves = self.insertions(solver_scope.working_solution(), &element);
            let director = solver_scope.score_director_mut();
            let mut scored = Vec::with_capacity(moves.len());
            for m in moves {
                let score = evaluate_move::<S, _>(&mut *director, &m, assert_moves)?;
                scored.push((m, score));
            }

            let evaluated = scored.len();
            let Some((m, _)) = first_best(scored) else {
                break;
            };
            for rank in 0..evaluated {
                solver_scope.record_move(rank == 0);
            }
            m.do_move(solver_scope.score_director_mut())?;
            let step_score = solver_scope.calculate_score();
            solver_scope.step_ended(step_score);
            solver_scope.assert_step()?;
        }

        solver_scope.update_best_solution();
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "ListConstruction"
    }
}
