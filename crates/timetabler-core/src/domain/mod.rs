//! Domain model for a timetabling term.
//!
//! Entities are created once per term from a [`TermSpec`] and never change
//! during generation. [`TermDomain`] owns them all together with the
//! pre-computed indices the constraint catalog and search engine rely on.

mod calendar;
mod entity;
mod ids;
mod spec;
mod term;

pub use calendar::{SlotGrid, TimeOfDay, TimeParseError, TimeSlot, TimeWindow, Weekday};
pub use entity::{Batch, Course, Enrollment, Faculty, Room, RoomKind, Section, Student};
pub use ids::{BatchId, CourseId, FacultyId, RoomId, SectionId, SlotId, StudentId};
pub use spec::{
    BatchSpec, CourseSpec, EnrollmentSpec, FacultySpec, RoomSpec, SectionSpec, StudentSpec,
    TermSpec,
};
pub use term::{BranchStats, TermDomain, TermStats};

use std::fmt;

/// Entity kinds, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Section,
    Faculty,
    Room,
    Batch,
    Student,
    Enrollment,
    SlotGrid,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Course => "course",
            EntityKind::Section => "section",
            EntityKind::Faculty => "faculty",
            EntityKind::Room => "room",
            EntityKind::Batch => "batch",
            EntityKind::Student => "student",
            EntityKind::Enrollment => "enrollment",
            EntityKind::SlotGrid => "slot grid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests;
