//! Term specification: the ingestion boundary of the engine.
//!
//! Upstream collaborators (CSV importers, admin tools) produce a `TermSpec`
//! whose entities refer to each other by string key. [`TermSpec::into_domain`]
//! resolves the keys and validates referential integrity.
//!
//! # Examples
//!
//! ```
//! use timetabler_core::{CourseSpec, FacultySpec, RoomKind, RoomSpec, SectionSpec, TermSpec};
//!
//! let spec = TermSpec::new()
//!     .with_course(CourseSpec::new("CS101", RoomKind::Lecture))
//!     .with_faculty(FacultySpec::new("f-ada").qualified_for(["CS101"]))
//!     .with_room(RoomSpec::new("R1", RoomKind::Lecture, 60))
//!     .with_section(SectionSpec::new("CS101-A", "CS101", 3));
//!
//! let domain = spec.into_domain().unwrap();
//! assert_eq!(domain.sections().len(), 1);
//! assert_eq!(domain.slots().len(), 54);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::calendar::{SlotGrid, TimeWindow, Weekday};
use super::entity::RoomKind;
use super::term::TermDomain;
use crate::error::LoadError;

fn default_max_hours_per_day() -> u16 {
    4
}

/// A complete, unresolved term description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TermSpec {
    pub name: Option<String>,
    pub slot_grid: SlotGrid,
    pub courses: Vec<CourseSpec>,
    pub sections: Vec<SectionSpec>,
    pub faculty: Vec<FacultySpec>,
    pub rooms: Vec<RoomSpec>,
    pub batches: Vec<BatchSpec>,
    pub students: Vec<StudentSpec>,
    pub enrollments: Vec<EnrollmentSpec>,
}

impl TermSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a term specification from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a term specification from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Resolves keys and validates the specification.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`] found; see [`TermDomain::from_spec`].
    pub fn into_domain(self) -> Result<TermDomain, LoadError> {
        TermDomain::from_spec(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_slot_grid(mut self, grid: SlotGrid) -> Self {
        self.slot_grid = grid;
        self
    }

    pub fn with_course(mut self, course: CourseSpec) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_faculty(mut self, faculty: FacultySpec) -> Self {
        self.faculty.push(faculty);
        self
    }

    pub fn with_room(mut self, room: RoomSpec) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_batch(mut self, batch: BatchSpec) -> Self {
        self.batches.push(batch);
        self
    }

    pub fn with_student(mut self, student: StudentSpec) -> Self {
        self.students.push(student);
        self
    }

    pub fn with_enrollment(mut self, student: impl Into<String>, section: impl Into<String>) -> Self {
        self.enrollments.push(EnrollmentSpec {
            student: student.into(),
            section: section.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CourseSpec {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credits: u8,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
    #[serde(default, alias = "type")]
    pub kind: RoomKind,
}

impl CourseSpec {
    pub fn new(code: impl Into<String>, kind: RoomKind) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            credits: 0,
            branch: None,
            year: None,
            kind,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_credits(mut self, credits: u8) -> Self {
        self.credits = credits;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SectionSpec {
    pub key: String,
    pub course: String,
    pub weekly_hours: u16,
    #[serde(default)]
    pub batches: Vec<String>,
    /// Candidate faculty keys; empty means every qualified faculty member.
    #[serde(default)]
    pub faculty: Vec<String>,
}

impl SectionSpec {
    pub fn new(key: impl Into<String>, course: impl Into<String>, weekly_hours: u16) -> Self {
        Self {
            key: key.into(),
            course: course.into(),
            weekly_hours,
            batches: Vec::new(),
            faculty: Vec::new(),
        }
    }

    pub fn with_batches<I, K>(mut self, batches: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.batches.extend(batches.into_iter().map(Into::into));
        self
    }

    pub fn with_faculty<I, K>(mut self, faculty: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.faculty.extend(faculty.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FacultySpec {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_max_hours_per_day")]
    pub max_hours_per_day: u16,
    #[serde(default)]
    pub preferred_days: Vec<Weekday>,
    #[serde(default)]
    pub preferred_window: Option<TimeWindow>,
    #[serde(default)]
    pub qualified_courses: Vec<String>,
}

impl FacultySpec {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: String::new(),
            department: None,
            max_hours_per_day: default_max_hours_per_day(),
            preferred_days: Vec::new(),
            preferred_window: None,
            qualified_courses: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn in_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn qualified_for<I, K>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.qualified_courses
            .extend(courses.into_iter().map(Into::into));
        self
    }

    pub fn with_max_hours_per_day(mut self, hours: u16) -> Self {
        self.max_hours_per_day = hours;
        self
    }

    pub fn with_preferred_days(mut self, days: impl Into<Vec<Weekday>>) -> Self {
        self.preferred_days = days.into();
        self
    }

    pub fn with_preferred_window(mut self, window: TimeWindow) -> Self {
        self.preferred_window = Some(window);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoomSpec {
    pub key: String,
    #[serde(default, alias = "room_type")]
    pub kind: RoomKind,
    pub capacity: u32,
    #[serde(default)]
    pub branch: Option<String>,
}

impl RoomSpec {
    pub fn new(key: impl Into<String>, kind: RoomKind, capacity: u32) -> Self {
        Self {
            key: key.into(),
            kind,
            capacity,
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchSpec {
    pub key: String,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub branch: Option<String>,
}

impl BatchSpec {
    pub fn new(key: impl Into<String>, size: u32) -> Self {
        Self {
            key: key.into(),
            size,
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StudentSpec {
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub batch: String,
}

impl StudentSpec {
    pub fn new(key: impl Into<String>, batch: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: String::new(),
            batch: batch.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EnrollmentSpec {
    pub student: String,
    pub section: String,
}
