//! Score director implementations.
//!
//! The score director owns the working solution, keeps its score current and
//! recomputes shadow variables after genuine variables change.
//!
//! # Score Director Types
//!
//! - [`IncrementalScoreDirector`] - Graph-backed incremental scoring
//! - [`SimpleScoreDirector`] - Full recalculation (reference)
//! - [`RecordingScoreDirector`] - Undo tracking wrapper used to evaluate moves

mod incremental;
mod recording;
mod shadow;
mod simple;
mod traits;


pub use incremental::IncrementalScoreDirector;
pub use recording::RecordingScoreDirector;
pub use shadow::{ShadowCascade, ShadowListener};
pub use simple::SimpleScoreDirector;
pub use traits::{ScoreDirector, SolvableSolution};
