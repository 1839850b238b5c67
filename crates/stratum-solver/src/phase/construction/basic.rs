//! Construction heuristic for basic variables.

use std::fmt::{self, Debug};
use std::sync::Arc;

use stratum_config::{ConstructionHeuristicType, SelectionOrder};
use stratum_core::domain::PlanningSolution;
use stratum_core::SolverError;
use stratum_scoring::ScoreDirector;
use tracing::debug;

use crate::heuristic::r#move::{ChangeMove, Move};
use crate::heuristic::selector::{EntitySelector, ValueSelector, ValueSorting};
use crate::heuristic::variable::{BasicVariable, PlanningValue};
use crate::phase::{evaluate_move, first_best, Phase};
use crate::scope::SolverScope;
use crate::termination::Termination;

/// Assigns each unassigned, unpinned entity of one basic variable.
///
/// | Type | Entity order | Value order |
/// |------|--------------|-------------|
/// | `FirstFit` | index | value range |
/// | `FirstFitDecreasing` | hardest first | value range |
/// | `WeakestFit` | index | weakest first |
/// | `WeakestFitDecreasing` | hardest first | weakest first |
/// | `StrongestFit` | index | strongest first |
/// | `StrongestFitDecreasing` | hardest first | strongest first |
///
/// Difficulty and strength come from the variable binding; without them
/// the sorted types fall back to index and value range order.
///
/// # Example
///
/// ```
/// use stratum_config::ConstructionHeuristicType;
/// use stratum_solver::heuristic::BasicVariable;
/// use stratum_solver::phase::construction::ConstructionHeuristicPhase;
/// use stratum_solver::phase::Phase;
/// use stratum_solver::scope::SolverScope;
/// use stratum_test::nqueens::{self, NQueensSolution};
/// use std::sync::Arc;
///
/// let row = Arc::new(BasicVariable::new(
///     0, "row", nqueens::queen_count, nqueens::get_queen_row, nqueens::set_queen_row,
///     nqueens::row_range(4),
/// ));
/// let mut phase = ConstructionHeuristicPhase::new(row, ConstructionHeuristicType::FirstFit);
/// let director = nqueens::simple_director(NQueensSolution::uninitialized(4)).unwrap();
/// let mut scope = SolverScope::new(director);
/// phase.solve(&mut scope).unwrap();
/// assert!(scope.best_solution().unwrap().rows().iter().all(Option::is_some));
/// ```
pub struct ConstructionHeuristicPhase<S: PlanningSolution, V> {
    variable: Arc<BasicVariable<S, V>>,
    construction_type: ConstructionHeuristicType,
    termination: Option<Box<dyn Termination<S>>>,
}

impl<S, V> ConstructionHeuristicPhase<S, V>
where
    S: PlanningSolution,
    V: PlanningValue,
{
    pub fn new(
        variable: Arc<BasicVariable<S, V>>,
        construction_type: ConstructionHeuristicType,
    ) -> Self {
        Self {
            variable,
            construction_type,
            termination: None,
        }
    }

    /// Phase termination, checked against phase progress.
    pub fn with_termination(mut self, termination: impl Termination<S> + 'static) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_boxed_termination(mut self, termination: Option<Box<dyn Termination<S>>>) -> Self {
        self.termination = termination;
        self
    }

    fn value_sorting(&self) -> ValueSorting {
        match self.construction_type {
            ConstructionHeuristicType::WeakestFit
            | ConstructionHeuristicType::WeakestFitDecreasing => ValueSorting::WeakestFirst,
            ConstructionHeuristicType::StrongestFit
            | ConstructionHeuristicType::StrongestFitDecreasing => ValueSorting::StrongestFirst,
            _ => ValueSorting::None,
        }
    }
}

impl<S: PlanningSolution, V> Debug for ConstructionHeuristicPhase<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionHeuristicPhase")
            .field("variable", &self.variable.variable_name)
            .field("construction_type", &self.construction_type)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S, D, V> Phase<S, D> for ConstructionHeuristicPhase<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: PlanningValue,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<'_, S, D>) -> Result<(), SolverError> {
        let var = Arc::clone(&self.variable);
        let entities = EntitySelector::new(SelectionOrder::Original).select_unassigned(
            &var,
            solver_scope.working_solution(),
            self.construction_type.sorts_entities(),
        );
        let value_selector = ValueSelector::sorted(self.value_sorting());
        let assert_moves = solver_scope.environment_mode().asserts_moves();

        for entity in entities {
            if solver_scope.is_phase_terminated(self.termination.as_deref()) {
                break;
            }
            solver_scope.step_started();

            let (director, rng) = solver_scope.director_and_rng();
            let values = value_selector.select(&var, director.working_solution(), entity, rng);
            let mut scored = Vec::with_capacity(values.len());
            for value in values {
                let m = ChangeMove::new(Arc::clone(&var), entity, value);
                if !m.is_doable(&*director) {
                    continue;
                }
                let score = evaluate_move::<S, _>(&mut *director, &m, assert_moves)?;
                scored.push((m, score));
            }

            let evaluated = scored.len();
            let Some((m, _)) = first_best(scored) else {
                debug!(event = "entity_skipped", entity, "No candidate value");
                continue;
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
        "ConstructionHeuristic"
    }
}
