//! Config-driven solver creation and concurrent job management.
//!
//! # Overview
//!
//! The manager module provides:
//! - [`SolverFactory`]: builds a [`Solver`](crate::solver::Solver) from a
//!   [`SolverConfig`](stratum_config::SolverConfig) and the domain bindings
//! - [`SolverManager`]: a registry of solving jobs keyed by [`JobId`], one
//!   thread, solver and solution per job
//!
//! # Runtime Configuration
//!
//! Config-built solvers hold their phases as `Box<dyn Phase<S, D>>` and their
//! termination as `Box<dyn Termination<S>>`. Solvers assembled in code keep
//! concrete phase tuples instead.

mod solver_factory;
mod solver_manager;

#[cfg(test)]
mod mod_tests_integration;

pub use solver_factory::{termination_from_config, ConfiguredSolver, SolverFactory, VariableBinding};
pub use solver_manager::{BestSolution, BestSolutionReceiver, JobId, SolverManager, SolverStatus};
