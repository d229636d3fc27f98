//! Termination conditions for a restart.

mod composite;
mod external;
mod node_count;
mod time;

use std::fmt::{self, Debug};

use serde::Serialize;

use crate::scope::RestartScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Why a restart stopped before search ran to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The shared wall-clock budget ran out.
    TimeLimit,
    /// The restart expanded its node allowance.
    NodeLimit,
    /// Another restart met the acceptance threshold, or the caller asked
    /// to stop.
    Cancelled,
}

impl StopReason {
    /// True for the limits that count as an exceeded budget.
    pub fn is_budget(self) -> bool {
        matches!(self, StopReason::TimeLimit | StopReason::NodeLimit)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::TimeLimit => "time_limit",
            StopReason::NodeLimit => "node_limit",
            StopReason::Cancelled => "cancelled",
        })
    }
}

/// Decides when a restart must stop.
///
/// Checked before every node expansion and every refinement move.
pub trait Termination: Send + Debug {
    /// Returns true if the restart should stop.
    fn is_terminated(&self, scope: &RestartScope) -> bool;

    /// The reason reported when this condition fires.
    fn reason(&self) -> StopReason;

    /// Returns the reason to stop, if any.
    fn check(&self, scope: &RestartScope) -> Option<StopReason> {
        if self.is_terminated(scope) {
            Some(self.reason())
        } else {
            None
        }
    }
}

/// An absent condition never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &RestartScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }

    fn reason(&self) -> StopReason {
        self.as_ref().map_or(StopReason::Cancelled, Termination::reason)
    }

    fn check(&self, scope: &RestartScope) -> Option<StopReason> {
        self.as_ref().and_then(|t| t.check(scope))
    }
}

#[cfg(test)]
mod tests;
