//! Wall-clock termination.

use std::time::{Duration, Instant};

use super::{StopReason, Termination};
use crate::scope::RestartScope;

/// Terminates at a deadline shared by every restart of a run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use timetabler_solver::termination::TimeTermination;
///
/// let term = TimeTermination::after(Duration::from_secs(30));
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeTermination {
    deadline: Instant,
}

impl TimeTermination {
    pub fn new(deadline: Instant) -> Self {
        Self { deadline }
    }

    /// Deadline `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self::new(Instant::now() + limit)
    }

    pub fn millis(ms: u64) -> Self {
        Self::after(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::after(Duration::from_secs(secs))
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, _scope: &RestartScope) -> bool {
        Instant::now() >= self.deadline
    }

    fn reason(&self) -> StopReason {
        StopReason::TimeLimit
    }
}
