//! Timetabler Core - domain model for institutional timetabling
//!
//! This crate provides the read-only inputs and value outputs of the engine:
//! - Domain entities (courses, sections, faculty, rooms, batches, students)
//! - The weekly slot grid and time-of-day arithmetic
//! - `TermDomain`, the validated domain graph with its lookup indices
//! - `Placement` and `Schedule`, the artifacts handed back to callers
//! - `HardSoftCost` for ranking schedules

pub mod cost;
pub mod domain;
pub mod error;
pub mod schedule;

pub use cost::HardSoftCost;
pub use domain::{
    Batch, BatchId, BatchSpec, Course, CourseId, CourseSpec, Enrollment, EnrollmentSpec,
    EntityKind, Faculty, FacultyId, FacultySpec, Room, RoomId, RoomKind, RoomSpec, Section,
    SectionId, SectionSpec, SlotGrid, SlotId, Student, StudentId, StudentSpec, TermDomain,
    TermSpec, TermStats, TimeOfDay, TimeParseError, TimeSlot, TimeWindow, Weekday,
};
pub use error::LoadError;
pub use schedule::{entries_of, Placement, Schedule, TimetableEntry};
