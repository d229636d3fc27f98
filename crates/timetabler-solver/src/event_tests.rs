//! Tests for progress events.

use super::*;

fn restart_event(restart: usize, cost: HardSoftCost) -> ProgressEvent {
    ProgressEvent::RestartCompleted {
        restart,
        completed: restart + 1,
        restarts: 4,
        status: SearchStatus::Solved,
        cost,
        best_cost: cost,
    }
}

#[test]
fn test_support_new() {
    let support = ProgressEventSupport::new();
    assert_eq!(support.listener_count(), 0);
    assert!(!support.has_listeners());
}

#[test]
fn test_support_fires_to_every_listener() {
    let a = Arc::new(CountingProgressListener::new());
    let b = Arc::new(CountingProgressListener::new());
    let mut support = ProgressEventSupport::new();
    support.add_listener(a.clone());
    support.add_listener(b.clone());

    support.fire(&ProgressEvent::GenerationStarted {
        sections: 3,
        weekly_hours: 7,
        restarts: 4,
        seed: 0,
    });
    support.fire(&restart_event(0, HardSoftCost::ZERO));
    support.fire(&restart_event(1, HardSoftCost::ZERO));

    for listener in [&a, &b] {
        assert_eq!(listener.started_count(), 1);
        assert_eq!(listener.restart_count(), 2);
        assert_eq!(listener.finished_count(), 0);
    }
}

#[test]
fn test_support_clear() {
    let mut support = ProgressEventSupport::new();
    support.add_listener(Arc::new(LoggingProgressListener::new()));
    support.clear();
    assert!(!support.has_listeners());
}

#[test]
fn test_counting_listener_reset() {
    let listener = CountingProgressListener::new();
    listener.on_event(&restart_event(0, HardSoftCost::ZERO));
    listener.reset();
    assert_eq!(listener.restart_count(), 0);
}

#[test]
fn test_channel_listener_forwards_in_order() {
    let (listener, mut receiver) = ChannelProgressListener::channel();
    listener.on_event(&restart_event(0, HardSoftCost::of(1, 0.0)));
    listener.on_event(&restart_event(1, HardSoftCost::ZERO));

    assert_eq!(
        receiver.try_recv().ok(),
        Some(restart_event(0, HardSoftCost::of(1, 0.0)))
    );
    assert_eq!(receiver.try_recv().ok(), Some(restart_event(1, HardSoftCost::ZERO)));
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_channel_listener_survives_dropped_receiver() {
    let (listener, receiver) = ChannelProgressListener::channel();
    drop(receiver);
    listener.on_event(&restart_event(0, HardSoftCost::ZERO));
}

#[test]
fn test_logging_listener_handles_every_event() {
    let listener = LoggingProgressListener::new();
    listener.on_event(&restart_event(0, HardSoftCost::ZERO));
    listener.on_event(&ProgressEvent::GenerationFinished {
        cost: HardSoftCost::ZERO,
        best_restart: 0,
        budget_exceeded: false,
        elapsed: Duration::from_millis(5),
    });
}
