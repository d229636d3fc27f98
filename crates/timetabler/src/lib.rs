//! Timetabler - institutional timetable generation in Rust
//!
//! Describe a term, hand it to a generator, get a clash-free schedule back.
//!
//! # Example
//!
//! ```rust
//! use timetabler::prelude::*;
//!
//! let domain = TermSpec::new()
//!     .with_course(CourseSpec::new("CS101", RoomKind::Lecture))
//!     .with_faculty(FacultySpec::new("ada").qualified_for(["CS101"]))
//!     .with_room(RoomSpec::new("R1", RoomKind::Lecture, 40))
//!     .with_batch(BatchSpec::new("cse-1", 30))
//!     .with_section(SectionSpec::new("CS101-A", "CS101", 3).with_batches(["cse-1"]))
//!     .into_domain()
//!     .unwrap();
//!
//! let config = GeneratorConfig::new().with_random_seed(7).with_node_limit(10_000);
//! let result = TimetableGenerator::new(config).unwrap().generate(&domain);
//!
//! assert!(result.is_complete());
//! assert_eq!(result.schedule.len(), 3);
//! ```

// Domain model
pub use timetabler_core::{
    entries_of, Batch, BatchId, BatchSpec, Course, CourseId, CourseSpec, Enrollment,
    EnrollmentSpec, Faculty, FacultyId, FacultySpec, HardSoftCost, LoadError, Placement, Room,
    RoomId, RoomKind, RoomSpec, Schedule, Section, SectionId, SectionSpec, SlotGrid, SlotId,
    Student, StudentId, StudentSpec, TermDomain, TermSpec, TermStats, TimeOfDay, TimeSlot,
    TimeWindow, TimetableEntry, Weekday,
};

// Configuration
pub use timetabler_config::{
    AcceptanceConfig, ConfigError, GeneratorConfig, SearchConfig, TerminationConfig, ThreadCount,
    WeightsConfig,
};

// Constraints and scoring
pub use timetabler_scoring::{
    audit, AssignmentStore, HardConstraint, HardViolation, ScheduleReport, Scorer, SoftConstraint,
};

// Search and orchestration
pub use timetabler_solver::{
    ChannelProgressListener, CountingProgressListener, GenerationResult, LoggingProgressListener,
    ProgressEvent, ProgressListener, SearchStatus, StopReason, TimetableGenerator,
    UnresolvedReason, UnresolvedSection,
};

mod generation;
pub use generation::{generate, spawn_generation, GenerationHandle};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        BatchSpec, CourseSpec, EnrollmentSpec, FacultySpec, RoomKind, RoomSpec, SectionSpec,
        SlotGrid, StudentSpec, TermDomain, TermSpec, TimeOfDay, TimeWindow, Weekday,
    };
    pub use super::{GenerationResult, GeneratorConfig, ThreadCount, TimetableGenerator};
    pub use super::{HardSoftCost, Placement, Schedule};
}
