//! Generation entry points that hide the generator wiring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use timetabler_config::{ConfigError, GeneratorConfig};
use timetabler_core::TermDomain;
use timetabler_solver::{ChannelProgressListener, GenerationResult, ProgressEvent, TimetableGenerator};
use tokio::sync::{mpsc, oneshot};

/// Config file read by [`generate`] when present.
const CONFIG_FILE: &str = "timetabler.toml";

/// Generates a timetable for `domain` with `timetabler.toml` from the
/// working directory, or the defaults when that file is missing.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file exists but does not parse or
/// validate.
pub fn generate(domain: &TermDomain) -> Result<GenerationResult, ConfigError> {
    let config = match GeneratorConfig::load(CONFIG_FILE) {
        Ok(config) => config,
        Err(ConfigError::Io(_)) => GeneratorConfig::default(),
        Err(err) => return Err(err),
    };
    Ok(TimetableGenerator::new(config)?.generate(domain))
}

/// A generation running on its own thread.
///
/// Progress events stream through [`events`](Self::events) while the run
/// is in flight; the result arrives once on [`result`](Self::result).
#[derive(Debug)]
pub struct GenerationHandle {
    pub events: mpsc::UnboundedReceiver<ProgressEvent>,
    pub result: oneshot::Receiver<GenerationResult>,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl GenerationHandle {
    /// Asks every restart to stop at its next node.
    ///
    /// The run still delivers its best schedule so far.
    pub fn terminate_early(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Blocks until the run ends. Returns `None` if the generation thread
    /// died without a result.
    ///
    /// Must not be called from inside an async runtime; await
    /// [`result`](Self::result) there instead.
    pub fn wait(self) -> Option<GenerationResult> {
        let result = self.result.blocking_recv().ok();
        let _ = self.thread.join();
        result
    }
}

/// Starts a generation in the background.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if `config` fails validation; no thread
/// is started in that case.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use timetabler::{spawn_generation, GeneratorConfig, ProgressEvent};
///
/// let domain = Arc::new(timetabler_test::scenario_a());
/// let config = GeneratorConfig::new().with_random_seed(3).with_node_limit(5_000);
/// let mut handle = spawn_generation(domain, config).unwrap();
///
/// let first = handle.events.blocking_recv();
/// assert!(matches!(first, Some(ProgressEvent::GenerationStarted { .. })));
///
/// let result = handle.wait().unwrap();
/// assert!(result.is_complete());
/// ```
pub fn spawn_generation(
    domain: Arc<TermDomain>,
    config: GeneratorConfig,
) -> Result<GenerationHandle, ConfigError> {
    let stop = Arc::new(AtomicBool::new(false));
    let (listener, events) = ChannelProgressListener::channel();
    let generator = TimetableGenerator::new(config)?
        .with_listener(Arc::new(listener))
        .with_stop_flag(stop.clone());
    let (sender, result) = oneshot::channel();

    let thread = std::thread::spawn(move || {
        let _ = sender.send(generator.generate(&domain));
    });

    Ok(GenerationHandle {
        events,
        result,
        stop,
        thread,
    })
}
