use std::sync::Arc;

use timetabler::{spawn_generation, GeneratorConfig, ProgressEvent, ThreadCount};

#[test]
fn background_run_streams_events_then_result() {
    let domain = Arc::new(timetabler_test::scenario_b());
    let config = GeneratorConfig::new()
        .with_random_seed(4)
        .with_node_limit(10_000)
        .with_restart_count(2)
        .with_thread_count(ThreadCount::None);
    let mut handle = spawn_generation(domain, config).unwrap();

    let mut events = Vec::new();
    while let Some(event) = handle.events.blocking_recv() {
        let done = matches!(event, ProgressEvent::GenerationFinished { .. });
        events.push(event);
        if done {
            break;
        }
    }
    let result = handle.wait().unwrap();

    assert_eq!(events.len(), 4);
    assert!(matches!(
        events[0],
        ProgressEvent::GenerationStarted { restarts: 2, .. }
    ));
    assert_eq!(result.schedule.len(), 1);
}

#[test]
fn terminate_early_still_returns_a_result() {
    let domain = Arc::new(timetabler_test::campus());
    let config = GeneratorConfig::new()
        .with_random_seed(4)
        .with_node_limit(1_000_000);
    let handle = spawn_generation(domain.clone(), config).unwrap();
    handle.terminate_early();

    let result = handle.wait().unwrap();
    assert!(result.schedule.len() <= domain.total_weekly_hours());
    assert!(!result.budget_exceeded);
}

#[test]
fn invalid_config_starts_nothing() {
    let domain = Arc::new(timetabler_test::scenario_a());
    let config = GeneratorConfig::new().with_restart_count(0);
    assert!(spawn_generation(domain, config).is_err());
}
