//! Resolved domain entities.
//!
//! These hold dense ids instead of string references; they are produced by
//! [`TermDomain`](super::TermDomain) from a validated `TermSpec`.

use serde::{Deserialize, Serialize};

use super::calendar::{TimeWindow, Weekday};
use super::ids::{BatchId, CourseId, FacultyId, RoomId, SectionId, StudentId};

/// Kind of room a course needs, and kind of room a room is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Lecture hall for theory courses.
    #[default]
    #[serde(alias = "lecture_hall", alias = "theory")]
    Lecture,
    /// Laboratory.
    Lab,
}

/// A catalog course.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub credits: u8,
    pub branch: Option<String>,
    pub year: Option<u8>,
    pub kind: RoomKind,
}

/// A schedulable offering of a course for one or more batches.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub key: String,
    pub course: CourseId,
    /// Weekly contact hours; one placement per hour.
    pub weekly_hours: u16,
    /// Batches declared on the section itself.
    pub batches: Vec<BatchId>,
    /// Explicit faculty candidates. Empty means every faculty member
    /// qualified for the course.
    pub faculty_candidates: Vec<FacultyId>,
}

/// A teaching staff member and their preferences.
///
/// Preferences feed the scorer only; they never block a placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Faculty {
    pub id: FacultyId,
    pub key: String,
    pub name: String,
    pub department: Option<String>,
    pub max_hours_per_day: u16,
    /// Empty means no day preference.
    pub preferred_days: Vec<Weekday>,
    pub preferred_window: Option<TimeWindow>,
    pub qualified_courses: Vec<CourseId>,
}

impl Faculty {
    /// Returns true if teaching on `day` goes against a stated preference.
    pub fn dislikes_day(&self, day: Weekday) -> bool {
        !self.preferred_days.is_empty() && !self.preferred_days.contains(&day)
    }

    pub fn is_qualified_for(&self, course: CourseId) -> bool {
        self.qualified_courses.contains(&course)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub key: String,
    pub capacity: u32,
    pub kind: RoomKind,
    /// Branch that owns the room, if any.
    pub branch: Option<String>,
}

/// A cohort of students that attends classes together.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub id: BatchId,
    pub key: String,
    pub size: u32,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub key: String,
    pub name: String,
    pub batch: BatchId,
}

/// Student-section membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Enrollment {
    pub student: StudentId,
    pub section: SectionId,
}
