use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use timetabler_config::{GeneratorConfig, ThreadCount};
use timetabler_core::{CourseSpec, RoomKind, SectionId, SectionSpec, SlotId};
use timetabler_scoring::audit;

use super::*;
use crate::event::{ChannelProgressListener, CountingProgressListener};

fn config() -> GeneratorConfig {
    GeneratorConfig::new()
        .with_random_seed(42)
        .with_node_limit(50_000)
        .with_thread_count(ThreadCount::None)
}

fn generate(domain: &TermDomain, config: GeneratorConfig) -> GenerationResult {
    TimetableGenerator::new(config).unwrap().generate(domain)
}

#[test]
fn test_single_section_complete() {
    let domain = timetabler_test::scenario_a();
    let result = generate(&domain, config());

    assert!(result.is_complete());
    assert!(result.is_feasible());
    assert!(!result.budget_exceeded);
    assert_eq!(result.schedule.len(), 2);
    let slots: Vec<SlotId> = result.schedule.iter().map(|p| p.slot).collect();
    assert_ne!(slots[0], slots[1]);
    assert_eq!(result.restarts.len(), 4);
}

#[test]
fn test_shared_batch_reports_one_unresolved() {
    let domain = timetabler_test::scenario_b();
    let result = generate(&domain, config());

    assert_eq!(result.schedule.len(), 1);
    assert_eq!(result.unresolved_sections.len(), 1);
    let unresolved = &result.unresolved_sections[0];
    assert_eq!(unresolved.required_hours, 1);
    assert_eq!(unresolved.placed_hours, 0);
    assert_eq!(unresolved.reason, UnresolvedReason::SearchExhausted);
    assert_eq!(result.cost().hard(), 1);
    assert!(!result.budget_exceeded);
}

#[test]
fn test_preferred_window_respected() {
    let domain = timetabler_test::scenario_c();
    let result = generate(&domain, config());

    assert_eq!(result.schedule.placements()[0].slot, SlotId(0));
    assert_eq!(result.cost().soft(), 0.0);
}

#[test]
fn test_zero_budget_returns_immediately() {
    let domain = timetabler_test::scenario_a();
    let result = generate(&domain, config().with_node_limit(0));

    assert!(result.budget_exceeded);
    assert!(result.schedule.is_empty());
    assert_eq!(
        result.unresolved_sections[0].reason,
        UnresolvedReason::BudgetExceeded
    );
    assert!(result.restarts.iter().all(|r| r.statistics.nodes_expanded == 0));
}

#[test]
fn test_statically_infeasible_section_reported() {
    let spec = timetabler_test::scenario_a_spec()
        .with_course(CourseSpec::new("LAB1", RoomKind::Lab))
        .with_section(SectionSpec::new("LAB1-A", "LAB1", 1));
    let domain = spec.into_domain().unwrap();
    let result = generate(&domain, config());

    assert_eq!(result.schedule.hours_for(SectionId(0)), 2);
    assert_eq!(result.unresolved_sections.len(), 1);
    assert_eq!(result.unresolved_sections[0].key, "LAB1-A");
    assert_eq!(
        result.unresolved_sections[0].reason,
        UnresolvedReason::NoCompatibleRoom
    );
}

#[test]
fn test_campus_complete_and_clash_free() {
    let domain = timetabler_test::campus();
    let result = generate(&domain, config().with_restart_count(2));

    assert!(result.is_complete());
    assert!(result.is_feasible());
    assert!(audit(&domain, &result.schedule).is_empty());
    assert_eq!(result.schedule.len(), domain.total_weekly_hours());
    assert_eq!(result.entries(&domain).len(), result.schedule.len());
}

#[test]
fn test_same_seed_same_result_across_thread_counts() {
    let domain = timetabler_test::campus();
    let sequential = generate(&domain, config().with_restart_count(3));
    let parallel = generate(
        &domain,
        config()
            .with_restart_count(3)
            .with_thread_count(ThreadCount::Count(3)),
    );

    assert_eq!(sequential.schedule, parallel.schedule);
    assert_eq!(sequential.best_restart, parallel.best_restart);
    assert_eq!(sequential.cost(), parallel.cost());
}

#[test]
fn test_best_is_minimum_over_restarts() {
    let domain = timetabler_test::campus();
    let result = generate(&domain, config().with_restart_count(3));

    let min = result.restarts.iter().map(|r| r.cost).min().unwrap();
    assert_eq!(result.cost(), min);
    assert_eq!(result.restarts[result.best_restart].cost, min);
}

#[test]
fn test_progress_events() {
    let domain = timetabler_test::scenario_b();
    let counter = Arc::new(CountingProgressListener::new());
    let (channel, mut receiver) = ChannelProgressListener::channel();
    let result = TimetableGenerator::new(config().with_restart_count(3))
        .unwrap()
        .with_listener(counter.clone())
        .with_listener(Arc::new(channel))
        .generate(&domain);

    assert_eq!(counter.started_count(), 1);
    assert_eq!(counter.restart_count(), 3);
    assert_eq!(counter.finished_count(), 1);

    let mut best = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        if let ProgressEvent::RestartCompleted { best_cost, .. } = event {
            best.push(best_cost);
        }
    }
    assert_eq!(best.len(), 3);
    assert!(best.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(best.last().copied(), Some(result.cost()));
}

#[test]
fn test_threshold_cancels_remaining_restarts() {
    let domain = timetabler_test::scenario_a();
    let result = generate(&domain, config().with_soft_cost_threshold(1e12));

    assert!(result.is_complete());
    assert_eq!(result.best_restart, 0);
    assert!(result.restarts[1..]
        .iter()
        .all(|r| r.status == SearchStatus::Stopped(StopReason::Cancelled)));
    assert!(!result.budget_exceeded);
}

#[test]
fn test_stop_flag_cancels_run() {
    let domain = timetabler_test::scenario_a();
    let flag = Arc::new(AtomicBool::new(true));
    let result = TimetableGenerator::new(config())
        .unwrap()
        .with_stop_flag(flag)
        .generate(&domain);

    assert!(result.schedule.is_empty());
    assert!(!result.budget_exceeded);
    assert_eq!(
        result.unresolved_sections[0].reason,
        UnresolvedReason::Cancelled
    );
}

#[test]
fn test_invalid_config_rejected() {
    let config = GeneratorConfig::new().with_restart_count(0);
    assert!(TimetableGenerator::new(config).is_err());
}

#[test]
fn test_default_config_exhausts_oversubscribed_batch() {
    let domain = timetabler_test::oversubscribed_batch(6);
    let config = GeneratorConfig::default();
    assert!(config.time_limit().is_some());

    let result = generate(&domain, config);
    assert!(!result.budget_exceeded);
    assert_eq!(result.schedule.len(), 5);
    assert_eq!(result.unresolved_sections.len(), 1);
    assert_eq!(
        result.unresolved_sections[0].reason,
        UnresolvedReason::SearchExhausted
    );
}

#[test]
fn test_time_budget_bounds_oversubscribed_batch() {
    let domain = timetabler_test::oversubscribed_batch(12);
    let config = GeneratorConfig::default()
        .with_random_seed(3)
        .with_termination_millis(200);
    let result = generate(&domain, config);

    assert!(result.budget_exceeded);
    assert_eq!(result.schedule.len(), 11);
    assert_eq!(result.unresolved_sections.len(), 1);
    assert_eq!(
        result.unresolved_sections[0].reason,
        UnresolvedReason::BudgetExceeded
    );
    assert!(result.statistics.total_duration < std::time::Duration::from_secs(5));
}
