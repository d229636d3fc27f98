//! The validated domain graph for one term.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::calendar::{SlotGrid, TimeSlot, Weekday};
use super::entity::{Batch, Course, Enrollment, Faculty, Room, Section, Student};
use super::ids::{BatchId, CourseId, FacultyId, RoomId, SectionId, SlotId, StudentId};
use super::spec::TermSpec;
use super::EntityKind;
use crate::error::LoadError;

/// Read-only domain graph shared by every search restart.
///
/// Holds all entities of a term together with the indices the constraint
/// catalog and search engine query on their hot paths:
/// - section → qualified faculty, compatible rooms, conflict batches, headcount
/// - faculty → sections it may teach
/// - batch → sections it attends
/// - day → slots of that day
///
/// Construction validates referential integrity and fails with [`LoadError`];
/// afterwards the domain never changes.
#[derive(Debug, Clone)]
pub struct TermDomain {
    name: Option<String>,
    courses: Vec<Course>,
    sections: Vec<Section>,
    faculty: Vec<Faculty>,
    rooms: Vec<Room>,
    batches: Vec<Batch>,
    students: Vec<Student>,
    enrollments: Vec<Enrollment>,
    slots: Vec<TimeSlot>,
    days: Vec<Weekday>,
    slots_by_day: [Vec<SlotId>; Weekday::COUNT],

    section_faculty: Vec<Vec<FacultyId>>,
    section_rooms: Vec<Vec<RoomId>>,
    section_batches: Vec<Vec<BatchId>>,
    section_headcount: Vec<u32>,
    faculty_sections: Vec<Vec<SectionId>>,
    batch_sections: Vec<Vec<SectionId>>,
    student_sections: Vec<Vec<SectionId>>,

    course_keys: HashMap<String, usize>,
    section_keys: HashMap<String, usize>,
    faculty_keys: HashMap<String, usize>,
    room_keys: HashMap<String, usize>,
    batch_keys: HashMap<String, usize>,
    student_keys: HashMap<String, usize>,
}

/// Headline numbers for a term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermStats {
    pub students: usize,
    pub faculty: usize,
    pub courses: usize,
    pub rooms: usize,
    pub sections: usize,
    pub weekly_hours: usize,
    pub slots: usize,
    pub branches: BTreeMap<String, BranchStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchStats {
    pub students: usize,
    pub faculty: usize,
    pub courses: usize,
}

fn index_keys<'a, I>(kind: EntityKind, keys: I) -> Result<HashMap<String, usize>, LoadError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut map = HashMap::new();
    for (i, key) in keys.into_iter().enumerate() {
        if key.trim().is_empty() {
            return Err(LoadError::invalid(kind, key, "key must not be empty"));
        }
        if map.insert(key.to_string(), i).is_some() {
            return Err(LoadError::duplicate(kind, key));
        }
    }
    Ok(map)
}

fn resolve(
    keys: &HashMap<String, usize>,
    kind: EntityKind,
    key: &str,
    referenced_kind: EntityKind,
    referenced: &str,
) -> Result<usize, LoadError> {
    keys.get(referenced)
        .copied()
        .ok_or_else(|| LoadError::unknown(kind, key, referenced_kind, referenced))
}

fn validate_grid(grid: &SlotGrid) -> Result<(), LoadError> {
    let key = "grid";
    if grid.step_minutes == 0 || grid.step_minutes > 24 * 60 {
        return Err(LoadError::invalid(
            EntityKind::SlotGrid,
            key,
            format!("step of {} minutes", grid.step_minutes),
        ));
    }
    if grid.day_start >= grid.day_end {
        return Err(LoadError::invalid(
            EntityKind::SlotGrid,
            key,
            format!("day starts at {} but ends at {}", grid.day_start, grid.day_end),
        ));
    }
    if let Some(b) = grid.breaks.iter().find(|b| !b.is_valid()) {
        return Err(LoadError::invalid(
            EntityKind::SlotGrid,
            key,
            format!("break {}-{} is empty", b.start, b.end),
        ));
    }
    Ok(())
}

fn sorted_unique<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort();
    items.dedup();
    items
}

impl TermDomain {
    /// Resolves and validates a term specification.
    ///
    /// # Errors
    ///
    /// - [`LoadError::DuplicateKey`] when two entities of a kind share a key
    /// - [`LoadError::UnknownReference`] when a key points nowhere
    /// - [`LoadError::InvalidValue`] for zero weekly hours, zero room capacity,
    ///   zero daily faculty load, empty preference windows, or a malformed grid
    /// - [`LoadError::EmptySlotGrid`] when the grid yields no slots
    pub fn from_spec(spec: TermSpec) -> Result<Self, LoadError> {
        validate_grid(&spec.slot_grid)?;
        let slots = spec.slot_grid.slots();
        if slots.is_empty() {
            return Err(LoadError::EmptySlotGrid);
        }

        let course_keys = index_keys(
            EntityKind::Course,
            spec.courses.iter().map(|c| c.code.as_str()),
        )?;
        let batch_keys = index_keys(
            EntityKind::Batch,
            spec.batches.iter().map(|b| b.key.as_str()),
        )?;
        let room_keys = index_keys(EntityKind::Room, spec.rooms.iter().map(|r| r.key.as_str()))?;
        let faculty_keys = index_keys(
            EntityKind::Faculty,
            spec.faculty.iter().map(|f| f.key.as_str()),
        )?;
        let section_keys = index_keys(
            EntityKind::Section,
            spec.sections.iter().map(|s| s.key.as_str()),
        )?;
        let student_keys = index_keys(
            EntityKind::Student,
            spec.students.iter().map(|s| s.key.as_str()),
        )?;

        let courses: Vec<Course> = spec
            .courses
            .into_iter()
            .enumerate()
            .map(|(i, c)| Course {
                id: CourseId::from_index(i),
                code: c.code,
                name: c.name,
                credits: c.credits,
                branch: c.branch,
                year: c.year,
                kind: c.kind,
            })
            .collect();

        let batches: Vec<Batch> = spec
            .batches
            .into_iter()
            .enumerate()
            .map(|(i, b)| Batch {
                id: BatchId::from_index(i),
                key: b.key,
                size: b.size,
                branch: b.branch,
            })
            .collect();

        let mut rooms = Vec::with_capacity(spec.rooms.len());
        for (i, r) in spec.rooms.into_iter().enumerate() {
            if r.capacity == 0 {
                return Err(LoadError::invalid(EntityKind::Room, &r.key, "capacity is zero"));
            }
            rooms.push(Room {
                id: RoomId::from_index(i),
                key: r.key,
                capacity: r.capacity,
                kind: r.kind,
                branch: r.branch,
            });
        }

        let mut faculty = Vec::with_capacity(spec.faculty.len());
        for (i, f) in spec.faculty.into_iter().enumerate() {
            if f.max_hours_per_day == 0 {
                return Err(LoadError::invalid(
                    EntityKind::Faculty,
                    &f.key,
                    "max_hours_per_day is zero",
                ));
            }
            if let Some(w) = f.preferred_window.filter(|w| !w.is_valid()) {
                return Err(LoadError::invalid(
                    EntityKind::Faculty,
                    &f.key,
                    format!("preferred window {}-{} is empty", w.start, w.end),
                ));
            }
            let mut qualified = Vec::with_capacity(f.qualified_courses.len());
            for code in &f.qualified_courses {
                let idx = resolve(&course_keys, EntityKind::Faculty, &f.key, EntityKind::Course, code)?;
                qualified.push(CourseId::from_index(idx));
            }
            faculty.push(Faculty {
                id: FacultyId::from_index(i),
                key: f.key,
                name: f.name,
                department: f.department,
                max_hours_per_day: f.max_hours_per_day,
                preferred_days: sorted_unique(f.preferred_days),
                preferred_window: f.preferred_window,
                qualified_courses: sorted_unique(qualified),
            });
        }

        let mut sections = Vec::with_capacity(spec.sections.len());
        for (i, s) in spec.sections.into_iter().enumerate() {
            let course = resolve(&course_keys, EntityKind::Section, &s.key, EntityKind::Course, &s.course)?;
            if s.weekly_hours == 0 {
                return Err(LoadError::invalid(EntityKind::Section, &s.key, "weekly_hours is zero"));
            }
            let mut section_batches = Vec::with_capacity(s.batches.len());
            for key in &s.batches {
                let idx = resolve(&batch_keys, EntityKind::Section, &s.key, EntityKind::Batch, key)?;
                section_batches.push(BatchId::from_index(idx));
            }
            let mut candidates = Vec::with_capacity(s.faculty.len());
            for key in &s.faculty {
                let idx = resolve(&faculty_keys, EntityKind::Section, &s.key, EntityKind::Faculty, key)?;
                candidates.push(FacultyId::from_index(idx));
            }
            sections.push(Section {
                id: SectionId::from_index(i),
                key: s.key,
                course: CourseId::from_index(course),
                weekly_hours: s.weekly_hours,
                batches: sorted_unique(section_batches),
                faculty_candidates: sorted_unique(candidates),
            });
        }

        let mut students = Vec::with_capacity(spec.students.len());
        for (i, s) in spec.students.into_iter().enumerate() {
            let batch = resolve(&batch_keys, EntityKind::Student, &s.key, EntityKind::Batch, &s.batch)?;
            students.push(Student {
                id: StudentId::from_index(i),
                key: s.key,
                name: s.name,
                batch: BatchId::from_index(batch),
            });
        }

        let mut enrollments = Vec::with_capacity(spec.enrollments.len());
        let mut seen = HashSet::new();
        for e in &spec.enrollments {
            let label = format!("{}/{}", e.student, e.section);
            let student = resolve(&student_keys, EntityKind::Enrollment, &label, EntityKind::Student, &e.student)?;
            let section = resolve(&section_keys, EntityKind::Enrollment, &label, EntityKind::Section, &e.section)?;
            if seen.insert((student, section)) {
                enrollments.push(Enrollment {
                    student: StudentId::from_index(student),
                    section: SectionId::from_index(section),
                });
            }
        }

        let mut domain = TermDomain {
            name: spec.name,
            days: sorted_unique(slots.iter().map(|s| s.day).collect()),
            slots_by_day: std::array::from_fn(|_| Vec::new()),
            slots,
            section_faculty: Vec::new(),
            section_rooms: Vec::new(),
            section_batches: Vec::new(),
            section_headcount: Vec::new(),
            faculty_sections: vec![Vec::new(); faculty.len()],
            batch_sections: vec![Vec::new(); batches.len()],
            student_sections: vec![Vec::new(); students.len()],
            courses,
            sections,
            faculty,
            rooms,
            batches,
            students,
            enrollments,
            course_keys,
            section_keys,
            faculty_keys,
            room_keys,
            batch_keys,
            student_keys,
        };
        domain.build_indices();
        Ok(domain)
    }

    fn build_indices(&mut self) {
        for slot in &self.slots {
            self.slots_by_day[slot.day.index()].push(slot.id);
        }

        let mut enrolled: Vec<Vec<StudentId>> = vec![Vec::new(); self.sections.len()];
        for e in &self.enrollments {
            enrolled[e.section.index()].push(e.student);
        }

        for section in &self.sections {
            let course = &self.courses[section.course.index()];

            let mut conflict_batches = section.batches.clone();
            let mut extra_students = 0u32;
            for student in &enrolled[section.id.index()] {
                let batch = self.students[student.index()].batch;
                if !section.batches.contains(&batch) {
                    extra_students += 1;
                    conflict_batches.push(batch);
                }
            }
            let conflict_batches = sorted_unique(conflict_batches);
            let declared: u32 = section
                .batches
                .iter()
                .map(|b| self.batches[b.index()].size)
                .sum();
            let headcount = declared + extra_students;

            let qualified: Vec<FacultyId> = if section.faculty_candidates.is_empty() {
                self.faculty
                    .iter()
                    .filter(|f| f.is_qualified_for(course.id))
                    .map(|f| f.id)
                    .collect()
            } else {
                section
                    .faculty_candidates
                    .iter()
                    .copied()
                    .filter(|f| self.faculty[f.index()].is_qualified_for(course.id))
                    .collect()
            };

            let rooms: Vec<RoomId> = self
                .rooms
                .iter()
                .filter(|r| r.kind == course.kind && r.capacity >= headcount)
                .map(|r| r.id)
                .collect();

            for f in &qualified {
                self.faculty_sections[f.index()].push(section.id);
            }
            for b in &conflict_batches {
                self.batch_sections[b.index()].push(section.id);
            }

            self.section_faculty.push(qualified);
            self.section_rooms.push(rooms);
            self.section_batches.push(conflict_batches);
            self.section_headcount.push(headcount);
        }

        for student in &self.students {
            let mut sections: Vec<SectionId> = self.batch_sections[student.batch.index()]
                .iter()
                .copied()
                .filter(|s| self.sections[s.index()].batches.contains(&student.batch))
                .collect();
            sections.extend(
                self.enrollments
                    .iter()
                    .filter(|e| e.student == student.id)
                    .map(|e| e.section),
            );
            self.student_sections[student.id.index()] = sorted_unique(sections);
        }
    }

    // === Entities ===

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn faculty(&self) -> &[Faculty] {
        &self.faculty
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    #[inline]
    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id.index()]
    }

    #[inline]
    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.index()]
    }

    #[inline]
    pub fn faculty_member(&self, id: FacultyId) -> &Faculty {
        &self.faculty[id.index()]
    }

    #[inline]
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    #[inline]
    pub fn batch(&self, id: BatchId) -> &Batch {
        &self.batches[id.index()]
    }

    #[inline]
    pub fn student(&self, id: StudentId) -> &Student {
        &self.students[id.index()]
    }

    #[inline]
    pub fn slot(&self, id: SlotId) -> &TimeSlot {
        &self.slots[id.index()]
    }

    /// Course of a section.
    #[inline]
    pub fn section_course(&self, id: SectionId) -> &Course {
        self.course(self.section(id).course)
    }

    // === Lookups by key ===

    pub fn find_course(&self, code: &str) -> Option<CourseId> {
        self.course_keys.get(code).map(|&i| CourseId::from_index(i))
    }

    pub fn find_section(&self, key: &str) -> Option<SectionId> {
        self.section_keys.get(key).map(|&i| SectionId::from_index(i))
    }

    pub fn find_faculty(&self, key: &str) -> Option<FacultyId> {
        self.faculty_keys.get(key).map(|&i| FacultyId::from_index(i))
    }

    pub fn find_room(&self, key: &str) -> Option<RoomId> {
        self.room_keys.get(key).map(|&i| RoomId::from_index(i))
    }

    pub fn find_batch(&self, key: &str) -> Option<BatchId> {
        self.batch_keys.get(key).map(|&i| BatchId::from_index(i))
    }

    pub fn find_student(&self, key: &str) -> Option<StudentId> {
        self.student_keys.get(key).map(|&i| StudentId::from_index(i))
    }

    // === Indices ===

    /// Faculty members allowed to teach a section: its candidates that are
    /// qualified for the section's course.
    #[inline]
    pub fn qualified_faculty(&self, section: SectionId) -> &[FacultyId] {
        &self.section_faculty[section.index()]
    }

    /// Rooms of the right kind with enough seats for the section.
    #[inline]
    pub fn compatible_rooms(&self, section: SectionId) -> &[RoomId] {
        &self.section_rooms[section.index()]
    }

    /// Batches whose students attend the section. Declared batches plus the
    /// batches of individually enrolled students.
    #[inline]
    pub fn conflict_batches(&self, section: SectionId) -> &[BatchId] {
        &self.section_batches[section.index()]
    }

    /// Number of seats the section needs.
    #[inline]
    pub fn headcount(&self, section: SectionId) -> u32 {
        self.section_headcount[section.index()]
    }

    #[inline]
    pub fn sections_for_faculty(&self, faculty: FacultyId) -> &[SectionId] {
        &self.faculty_sections[faculty.index()]
    }

    #[inline]
    pub fn sections_for_batch(&self, batch: BatchId) -> &[SectionId] {
        &self.batch_sections[batch.index()]
    }

    #[inline]
    pub fn sections_for_student(&self, student: StudentId) -> &[SectionId] {
        &self.student_sections[student.index()]
    }

    /// Teaching days present in the slot grid, in calendar order.
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Slots of one day, ordered by start time.
    #[inline]
    pub fn slots_on(&self, day: Weekday) -> &[SlotId] {
        &self.slots_by_day[day.index()]
    }

    /// Total number of placements a complete schedule holds.
    pub fn total_weekly_hours(&self) -> usize {
        self.sections.iter().map(|s| s.weekly_hours as usize).sum()
    }

    /// Summary counts with a per-branch breakdown.
    pub fn stats(&self) -> TermStats {
        let mut branches: BTreeMap<String, BranchStats> = BTreeMap::new();
        for student in &self.students {
            if let Some(branch) = &self.batches[student.batch.index()].branch {
                branches.entry(branch.clone()).or_default().students += 1;
            }
        }
        for f in &self.faculty {
            if let Some(dept) = &f.department {
                branches.entry(dept.clone()).or_default().faculty += 1;
            }
        }
        for c in &self.courses {
            if let Some(branch) = &c.branch {
                branches.entry(branch.clone()).or_default().courses += 1;
            }
        }

        TermStats {
            students: self.students.len(),
            faculty: self.faculty.len(),
            courses: self.courses.len(),
            rooms: self.rooms.len(),
            sections: self.sections.len(),
            weekly_hours: self.total_weekly_hours(),
            slots: self.slots.len(),
            branches,
        }
    }
}
