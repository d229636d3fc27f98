//! Generation output: placements, schedules, and timetable views.

use serde::{Deserialize, Serialize};

use crate::domain::{
    BatchId, FacultyId, RoomId, RoomKind, SectionId, SlotId, StudentId, TermDomain, TimeOfDay,
    Weekday,
};

/// One contact hour of a section: who teaches it, where, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub section: SectionId,
    pub slot: SlotId,
    pub room: RoomId,
    pub faculty: FacultyId,
}

impl Placement {
    pub const fn new(section: SectionId, slot: SlotId, room: RoomId, faculty: FacultyId) -> Self {
        Self {
            section,
            slot,
            room,
            faculty,
        }
    }
}

/// An immutable set of placements, ordered by section then slot.
///
/// A schedule is a plain value: it does not borrow the domain it was built
/// against, so the views that need entity data take the domain explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    placements: Vec<Placement>,
}

impl Schedule {
    pub fn from_placements(mut placements: Vec<Placement>) -> Self {
        placements.sort();
        placements.dedup();
        Self { placements }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    /// Number of hours placed for a section.
    pub fn hours_for(&self, section: SectionId) -> usize {
        self.for_section(section).count()
    }

    pub fn for_section(&self, section: SectionId) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.section == section)
    }

    pub fn for_faculty(&self, faculty: FacultyId) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.faculty == faculty)
    }

    pub fn for_room(&self, room: RoomId) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.room == room)
    }

    pub fn for_slot(&self, slot: SlotId) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.slot == slot)
    }

    /// Placements attended by a batch, including sections its students
    /// join through individual enrollment.
    pub fn for_batch<'a>(
        &'a self,
        domain: &'a TermDomain,
        batch: BatchId,
    ) -> impl Iterator<Item = &'a Placement> + 'a {
        let sections = domain.sections_for_batch(batch);
        self.placements
            .iter()
            .filter(move |p| sections.contains(&p.section))
    }

    /// Placements a single student attends.
    pub fn for_student<'a>(
        &'a self,
        domain: &'a TermDomain,
        student: StudentId,
    ) -> impl Iterator<Item = &'a Placement> + 'a {
        let sections = domain.sections_for_student(student);
        self.placements
            .iter()
            .filter(move |p| sections.contains(&p.section))
    }

    /// Flattens the schedule into display rows ordered by day, start time
    /// and section key.
    pub fn entries(&self, domain: &TermDomain) -> Vec<TimetableEntry> {
        entries_of(domain, self.placements.iter())
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

/// A human-readable timetable row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    pub section: String,
    pub course_code: String,
    pub course_name: String,
    pub faculty: String,
    pub room: String,
    pub kind: RoomKind,
    pub day: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Builds display rows for any subset of placements.
pub fn entries_of<'a, I>(domain: &TermDomain, placements: I) -> Vec<TimetableEntry>
where
    I: IntoIterator<Item = &'a Placement>,
{
    let mut rows: Vec<TimetableEntry> = placements
        .into_iter()
        .map(|p| {
            let section = domain.section(p.section);
            let course = domain.course(section.course);
            let slot = domain.slot(p.slot);
            TimetableEntry {
                section: section.key.clone(),
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                faculty: domain.faculty_member(p.faculty).key.clone(),
                room: domain.room(p.room).key.clone(),
                kind: course.kind,
                day: slot.day,
                start: slot.start,
                end: slot.end,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.day, a.start, &a.section).cmp(&(b.day, b.start, &b.section))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseSpec, FacultySpec, RoomSpec, SectionSpec, TermSpec};

    fn domain() -> TermDomain {
        TermSpec::new()
            .with_course(CourseSpec::new("CS101", RoomKind::Lecture).named("Programming"))
            .with_faculty(FacultySpec::new("ada").qualified_for(["CS101"]))
            .with_room(RoomSpec::new("R1", RoomKind::Lecture, 40))
            .with_section(SectionSpec::new("CS101-A", "CS101", 2))
            .into_domain()
            .unwrap()
    }

    fn placement(slot: u32) -> Placement {
        Placement::new(SectionId(0), SlotId(slot), RoomId(0), FacultyId(0))
    }

    #[test]
    fn test_from_placements_sorts_and_dedupes() {
        let schedule = Schedule::from_placements(vec![placement(9), placement(1), placement(9)]);
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.placements()[0].slot, SlotId(1));
        assert_eq!(schedule.hours_for(SectionId(0)), 2);
        assert_eq!(schedule.hours_for(SectionId(1)), 0);
    }

    #[test]
    fn test_entries_ordered_by_day_and_time() {
        let d = domain();
        // slot 9 is Tuesday 08:00, slot 1 is Monday 09:00
        let schedule = Schedule::from_placements(vec![placement(9), placement(1)]);
        let rows = schedule.entries(&d);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day, Weekday::Mon);
        assert_eq!(rows[0].start, TimeOfDay::hm(9, 0));
        assert_eq!(rows[1].day, Weekday::Tue);
        assert_eq!(rows[1].course_name, "Programming");
        assert_eq!(rows[1].room, "R1");
    }

    #[test]
    fn test_serializes_as_list() {
        let schedule = Schedule::from_placements(vec![placement(3)]);
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#"[{"section":0,"slot":3,"room":0,"faculty":0}]"#);
    }
}
