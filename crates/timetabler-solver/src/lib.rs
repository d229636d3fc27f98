//! Timetabler search engine
//!
//! This crate turns a resolved term into a schedule:
//! - Backtracking search with MRV ordering and conflict-directed backjumping
//! - Hill-climbing refinement of complete schedules
//! - Budget and cancellation terminations
//! - Restart orchestration on a rayon pool
//! - Progress events for monitoring

pub mod complete;
pub mod event;
pub mod feasibility;
pub mod generator;
pub mod refine;
pub mod scope;
pub mod search;
pub mod statistics;
pub mod termination;

pub use event::{
    ChannelProgressListener, CountingProgressListener, LoggingProgressListener, ProgressEvent,
    ProgressEventSupport, ProgressListener,
};
pub use generator::{
    GenerationResult, RestartSummary, TimetableGenerator, UnresolvedReason, UnresolvedSection,
};
pub use refine::Refiner;
pub use scope::RestartScope;
pub use search::{SearchEngine, SearchState, SearchStatus};
pub use statistics::{GenerationStatistics, SearchStatistics, StatisticsCollector};
pub use termination::{StopReason, Termination};
