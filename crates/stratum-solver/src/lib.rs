//! Stratum Solver Engine
//!
//! This crate provides the main solver implementation including:
//! - Solver, SolverFactory and SolverManager
//! - Phases (construction heuristic, local search, exhaustive search)
//! - Move system and move selectors
//! - Termination conditions
//! - Event system for monitoring
//! - Real-time problem changes

pub mod event;
pub mod heuristic;
pub mod manager;
pub mod phase;
pub mod realtime;
pub mod scope;
pub mod solver;
pub mod stats;
pub mod termination;

#[cfg(test)]
pub(crate) mod test_utils;

pub use event::{
    CountingEventListener, LoggingEventListener, PhaseLifecycleListener, SolverEventListener,
    SolverEventSupport, StepLifecycleListener,
};
pub use heuristic::{
    BasicMove, BasicVariable, ChangeMove, ChangeMoveSelector, ListAssignMove, ListChangeMove,
    ListChangeMoveSelector, ListMove, ListReverseMove, ListReverseMoveSelector, ListSwapMove,
    ListSwapMoveSelector, ListVariable, Move, MoveArena, MoveSelector, PlanningValue,
    SelectionOrder, SubListChangeMove, SubListChangeMoveSelector, SwapMove, SwapMoveSelector,
    UnionMoveSelector,
};
pub use manager::{
    termination_from_config, BestSolution, BestSolutionReceiver, ConfiguredSolver, JobId,
    SolverFactory, SolverManager, SolverStatus, VariableBinding,
};
pub use phase::{
    construction::{ConstructionHeuristicPhase, ConstructionHeuristicType, ListConstructionPhase},
    exhaustive::{ExhaustiveSearchPhase, ExhaustiveSearchType, ExplorationType},
    localsearch::{
        acceptor_from_config, AcceptedCountForager, Acceptor, HillClimbingAcceptor,
        LateAcceptanceAcceptor, LocalSearchPhase, SimulatedAnnealingAcceptor, TabuSearchAcceptor,
    },
    Phase, PhaseList,
};
pub use realtime::{
    AddEntity, AddProblemFact, ChangeVariable, ProblemChange, ProblemChangeReceiver,
    ProblemChangeResult, RemoveEntity, RemoveProblemFact, SolverHandle,
};
pub use scope::{Progress, SolverScope};
pub use solver::{NoTermination, Solver};
pub use stats::{PhaseStats, SolverStats};
pub use termination::{
    AndTermination, BestScoreFeasibleTermination, BestScoreTermination, ExternalTermination,
    MoveCountTermination, OrTermination, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination, UnimprovedTimeTermination,
};
