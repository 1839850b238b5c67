//! Shared test fixtures for stratum crates.
//!
//! Each module is a small planning problem with a descriptor, stream
//! constraints, a full-recalculation reference score and ready-made
//! directors:
//!
//! - [`nqueens`] - one genuine integer variable, simple score
//! - [`assignment`] - a genuine variable over problem facts, hard/soft score
//! - [`routing`] - a list variable with cascading shadow variables
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! stratum-test = { workspace = true }
//! ```
//!
//! ```
//! use stratum_core::Score;
//! use stratum_scoring::director::ScoreDirector;
//! use stratum_test::assignment::{incremental_director, Timetable};
//!
//! let mut director = incremental_director(Timetable::small()).unwrap();
//! assert!(director.calculate_score().is_feasible());
//! ```

pub mod assignment;
pub mod nqueens;
pub mod routing;

pub use assignment::{Lesson, Room, Timetable};
pub use nqueens::{NQueensSolution, Queen};
pub use routing::{RoutingSolution, Vehicle, Visit};
