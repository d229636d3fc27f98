//! Node-count termination.

use super::{StopReason, Termination};
use crate::scope::RestartScope;

/// Terminates once a restart has expanded `limit` nodes.
///
/// A limit of 0 stops before the first node.
#[derive(Debug, Clone, Copy)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &RestartScope) -> bool {
        scope.node_count() >= self.limit
    }

    fn reason(&self) -> StopReason {
        StopReason::NodeLimit
    }
}
