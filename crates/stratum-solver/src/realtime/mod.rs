//! Real-time planning support.
//!
//! Allows submitting problem changes while the solver is running. Changes are
//! queued and applied between steps, each one announcing its edits through
//! the score director's before/after notifications.
//!
//! # Example
//!
//! ```
//! use stratum_solver::realtime::{AddEntity, SolverHandle};
//! use stratum_test::assignment::{Lesson, Timetable};
//!
//! let (handle, receiver) = SolverHandle::<Timetable>::new();
//! let noether = Lesson::new(9, "Noether", 12, 1);
//! handle.add_problem_change(AddEntity::new(0, noether, |t: &mut Timetable| &mut t.lessons));
//! assert_eq!(receiver.drain_pending().len(), 1);
//! ```

mod problem_change;
mod solver_handle;

pub use problem_change::{
    AddEntity, AddProblemFact, BoxedProblemChange, ChangeVariable, ClosureProblemChange,
    ProblemChange, RemoveEntity, RemoveProblemFact,
};
pub use solver_handle::{ProblemChangeReceiver, ProblemChangeResult, SolverHandle};
