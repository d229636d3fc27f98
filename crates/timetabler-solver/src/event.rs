//! Progress events for monitoring a generation run.
//!
//! Listeners are registered on a [`ProgressEventSupport`] and receive every
//! event in the order the generator fires them. `RestartCompleted` events
//! carry the best cost so far, which never increases from one event to the
//! next.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use timetabler_solver::event::{CountingProgressListener, ProgressEventSupport};
//!
//! let counter = Arc::new(CountingProgressListener::new());
//! let mut support = ProgressEventSupport::new();
//! support.add_listener(counter.clone());
//! assert!(support.has_listeners());
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use timetabler_core::HardSoftCost;

use crate::search::SearchStatus;

/// An event fired by the generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    GenerationStarted {
        sections: usize,
        weekly_hours: usize,
        restarts: usize,
        seed: u64,
    },
    RestartCompleted {
        restart: usize,
        /// Restarts finished so far, this one included.
        completed: usize,
        restarts: usize,
        status: SearchStatus,
        cost: HardSoftCost,
        /// Best cost over every restart finished so far.
        best_cost: HardSoftCost,
    },
    GenerationFinished {
        cost: HardSoftCost,
        best_restart: usize,
        budget_exceeded: bool,
        elapsed: Duration,
    },
}

/// Receives progress events.
pub trait ProgressListener: Send + Sync + Debug {
    fn on_event(&self, event: &ProgressEvent);
}

/// Broadcasts events to registered listeners.
#[derive(Clone, Default)]
pub struct ProgressEventSupport {
    listeners: Vec<Arc<dyn ProgressListener>>,
}

impl ProgressEventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ProgressListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn fire(&self, event: &ProgressEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }
}

impl Debug for ProgressEventSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingProgressListener;

impl LoggingProgressListener {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressListener for LoggingProgressListener {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::GenerationStarted {
                sections,
                weekly_hours,
                restarts,
                seed,
            } => {
                debug!(
                    event = "generation_started",
                    sections, weekly_hours, restarts, seed,
                );
            }
            ProgressEvent::RestartCompleted {
                restart,
                completed,
                restarts,
                status,
                cost,
                best_cost,
            } => {
                debug!(
                    event = "restart_completed",
                    restart,
                    completed,
                    restarts,
                    status = %status,
                    cost = %cost,
                    best_cost = %best_cost,
                );
            }
            ProgressEvent::GenerationFinished {
                cost,
                best_restart,
                budget_exceeded,
                elapsed,
            } => {
                info!(
                    event = "generation_finished",
                    cost = %cost,
                    best_restart,
                    budget_exceeded,
                    duration_ms = elapsed.as_millis() as u64,
                );
            }
        }
    }
}

/// Counts events by kind. Useful in tests.
#[derive(Debug, Default)]
pub struct CountingProgressListener {
    started: AtomicUsize,
    restarts: AtomicUsize,
    finished: AtomicUsize,
}

impl CountingProgressListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn finished_count(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.started.store(0, Ordering::SeqCst);
        self.restarts.store(0, Ordering::SeqCst);
        self.finished.store(0, Ordering::SeqCst);
    }
}

impl ProgressListener for CountingProgressListener {
    fn on_event(&self, event: &ProgressEvent) {
        let counter = match event {
            ProgressEvent::GenerationStarted { .. } => &self.started,
            ProgressEvent::RestartCompleted { .. } => &self.restarts,
            ProgressEvent::GenerationFinished { .. } => &self.finished,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Forwards events into an unbounded channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgressListener {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgressListener {
    pub fn new(sender: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }

    /// Creates a listener with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl ProgressListener for ChannelProgressListener {
    fn on_event(&self, event: &ProgressEvent) {
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
