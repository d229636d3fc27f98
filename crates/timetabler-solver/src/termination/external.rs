//! External termination via an `AtomicBool` flag.

use std::sync::atomic::{AtomicBool, Ordering};

use super::{StopReason, Termination};
use crate::scope::RestartScope;

/// Terminates when an external flag is set.
///
/// The generator sets its flag when a restart meets the acceptance
/// threshold; callers may hand in their own flag to stop a run.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use timetabler_solver::termination::ExternalTermination;
///
/// let flag = AtomicBool::new(false);
/// let term = ExternalTermination::new(&flag);
/// flag.store(true, Ordering::SeqCst);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExternalTermination<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ExternalTermination<'a> {
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }
}

impl Termination for ExternalTermination<'_> {
    fn is_terminated(&self, _scope: &RestartScope) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn reason(&self) -> StopReason {
        StopReason::Cancelled
    }
}
