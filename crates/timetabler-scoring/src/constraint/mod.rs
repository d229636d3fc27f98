//! Constraint catalog.
//!
//! Hard constraints decide whether a placement may enter the working
//! schedule; soft constraints price a schedule. Both sets are closed enums so
//! the search engine's hot path dispatches with a `match`, not a vtable.

mod hard;
mod soft;

pub use hard::HardConstraintSet;
pub use soft::{SoftConstraintSet, WeightedConstraint};

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use timetabler_core::Placement;

/// Hard constraints. A violation makes a placement illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardConstraint {
    /// The faculty member is not qualified for the section's course.
    FacultyQualification,
    /// The room kind differs from the kind the course needs.
    RoomKind,
    /// The room has fewer seats than the section's headcount.
    RoomCapacity,
    /// The section already holds all of its weekly hours, or (in an audit)
    /// holds more or fewer than required.
    Completeness,
    /// The section already meets in this slot.
    DuplicateSlot,
    /// Another hour of the section is taught by a different faculty member.
    FacultyConsistency,
    RoomClash,
    FacultyClash,
    BatchClash,
}

impl HardConstraint {
    /// Every hard constraint, in the order the store checks them.
    pub const ALL: [HardConstraint; 9] = [
        HardConstraint::FacultyQualification,
        HardConstraint::RoomKind,
        HardConstraint::RoomCapacity,
        HardConstraint::Completeness,
        HardConstraint::DuplicateSlot,
        HardConstraint::FacultyConsistency,
        HardConstraint::RoomClash,
        HardConstraint::FacultyClash,
        HardConstraint::BatchClash,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            HardConstraint::FacultyQualification => "faculty_qualification",
            HardConstraint::RoomKind => "room_kind",
            HardConstraint::RoomCapacity => "room_capacity",
            HardConstraint::Completeness => "completeness",
            HardConstraint::DuplicateSlot => "duplicate_slot",
            HardConstraint::FacultyConsistency => "faculty_consistency",
            HardConstraint::RoomClash => "room_clash",
            HardConstraint::FacultyClash => "faculty_clash",
            HardConstraint::BatchClash => "batch_clash",
        }
    }

    /// Returns true if the constraint depends only on the candidate and the
    /// domain, never on other placements.
    pub const fn is_static(self) -> bool {
        matches!(
            self,
            HardConstraint::FacultyQualification
                | HardConstraint::RoomKind
                | HardConstraint::RoomCapacity
        )
    }
}

impl fmt::Display for HardConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why `try_assign` refused a placement.
///
/// `blocker` names the placement already in the store that caused the
/// conflict, when there is one. The search engine uses it to jump straight
/// back to the decision that made the placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{constraint} violated{}", blocker_suffix(.blocker))]
pub struct ConstraintViolation {
    pub constraint: HardConstraint,
    pub blocker: Option<Placement>,
}

fn blocker_suffix(blocker: &Option<Placement>) -> String {
    match blocker {
        Some(p) => format!(" by {} at {}", p.section, p.slot),
        None => String::new(),
    }
}

impl ConstraintViolation {
    pub const fn new(constraint: HardConstraint) -> Self {
        Self {
            constraint,
            blocker: None,
        }
    }

    pub const fn blocked_by(constraint: HardConstraint, blocker: Placement) -> Self {
        Self {
            constraint,
            blocker: Some(blocker),
        }
    }
}

/// Soft constraints. Each yields a non-negative raw penalty that the
/// catalog multiplies by its configured weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftConstraint {
    /// Minutes taught outside the faculty member's preferred window.
    TimeWindow,
    /// Hours taught on days the faculty member did not ask for.
    DayPreference,
    /// Per faculty member: squared hours over the daily maximum plus the
    /// variance of hours across the teaching days.
    DailyLoad,
    /// Idle slots between a batch's first and last class of a day.
    BatchGaps,
    /// Hours held in a room owned by a different branch than the course.
    RoomAffinity,
}

impl SoftConstraint {
    pub const ALL: [SoftConstraint; 5] = [
        SoftConstraint::TimeWindow,
        SoftConstraint::DayPreference,
        SoftConstraint::DailyLoad,
        SoftConstraint::BatchGaps,
        SoftConstraint::RoomAffinity,
    ];

    /// Name used in configuration and reports.
    pub const fn name(self) -> &'static str {
        match self {
            SoftConstraint::TimeWindow => "time_window",
            SoftConstraint::DayPreference => "day_preference",
            SoftConstraint::DailyLoad => "daily_load",
            SoftConstraint::BatchGaps => "batch_gaps",
            SoftConstraint::RoomAffinity => "room_affinity",
        }
    }
}

impl fmt::Display for SoftConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
