use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::*;
use crate::scope::RestartScope;

#[test]
fn test_node_count_termination() {
    let mut scope = RestartScope::new(0, 0);
    let term = NodeCountTermination::new(2);

    assert!(!term.is_terminated(&scope));
    scope.increment_node_count();
    assert!(!term.is_terminated(&scope));
    scope.increment_node_count();
    assert_eq!(term.check(&scope), Some(StopReason::NodeLimit));
}

#[test]
fn test_zero_node_limit_fires_immediately() {
    let scope = RestartScope::new(0, 0);
    assert!(NodeCountTermination::new(0).is_terminated(&scope));
}

#[test]
fn test_time_termination() {
    let scope = RestartScope::new(0, 0);
    assert!(TimeTermination::new(Instant::now()).is_terminated(&scope));
    assert!(!TimeTermination::after(Duration::from_secs(3600)).is_terminated(&scope));
    assert_eq!(TimeTermination::millis(0).check(&scope), Some(StopReason::TimeLimit));
}

#[test]
fn test_external_termination() {
    let scope = RestartScope::new(0, 0);
    let flag = AtomicBool::new(false);
    let term = ExternalTermination::new(&flag);

    assert!(!term.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert_eq!(term.check(&scope), Some(StopReason::Cancelled));
}

#[test]
fn test_absent_termination_never_fires() {
    let scope = RestartScope::new(0, 0);
    let term: Option<NodeCountTermination> = None;
    assert!(!term.is_terminated(&scope));
    assert_eq!(term.check(&scope), None);
    assert!(Some(NodeCountTermination::new(0)).is_terminated(&scope));
}

#[test]
fn test_or_termination_reports_first_firing_child() {
    let mut scope = RestartScope::new(0, 0);
    let flag = AtomicBool::new(false);
    let term = OrTermination((
        None::<TimeTermination>,
        NodeCountTermination::new(1),
        ExternalTermination::new(&flag),
    ));

    assert_eq!(term.check(&scope), None);
    flag.store(true, Ordering::SeqCst);
    assert_eq!(term.check(&scope), Some(StopReason::Cancelled));
    scope.increment_node_count();
    assert_eq!(term.check(&scope), Some(StopReason::NodeLimit));
}

#[test]
fn test_budget_reasons() {
    assert!(StopReason::TimeLimit.is_budget());
    assert!(StopReason::NodeLimit.is_budget());
    assert!(!StopReason::Cancelled.is_budget());
    assert_eq!(StopReason::NodeLimit.to_string(), "node_limit");
}
