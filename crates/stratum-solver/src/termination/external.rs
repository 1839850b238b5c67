//! External cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stratum_core::domain::PlanningSolution;

use super::Termination;
use crate::scope::Progress;

/// Terminates once a shared flag is raised by another thread.
#[derive(Debug, Clone, Default)]
pub struct ExternalTermination {
    flag: Arc<AtomicBool>,
}

impl ExternalTermination {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    /// Returns a handle to the flag.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    pub fn terminate(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl<S: PlanningSolution> Termination<S> for ExternalTermination {
    fn is_terminated(&self, _progress: &Progress<S::Score>) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
