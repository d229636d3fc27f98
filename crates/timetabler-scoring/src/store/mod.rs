//! The mutable working schedule of one search restart.

use smallvec::SmallVec;
use timetabler_core::{
    BatchId, FacultyId, Placement, RoomId, Schedule, SectionId, SlotId, TermDomain, Weekday,
};

use crate::constraint::{ConstraintViolation, HardConstraintSet};

/// Working schedule with O(1) occupancy indices.
///
/// Occupancy is kept in flat vectors indexed by `entity * slot_count + slot`
/// for rooms, faculty and batches. Each cell holds the placement occupying it
/// so a refused candidate can name its blocker. A store is exclusively owned
/// by one restart; the domain is shared read-only.
///
/// # Examples
///
/// ```
/// use timetabler_core::{Placement, SlotId};
/// use timetabler_scoring::{AssignmentStore, HardConstraint};
///
/// let domain = timetabler_test::scenario_a();
/// let section = domain.sections()[0].id;
/// let room = domain.compatible_rooms(section)[0];
/// let faculty = domain.qualified_faculty(section)[0];
///
/// let mut store = AssignmentStore::new(&domain);
/// store.try_assign(Placement::new(section, SlotId(0), room, faculty)).unwrap();
///
/// let clash = store
///     .try_assign(Placement::new(section, SlotId(0), room, faculty))
///     .unwrap_err();
/// assert_eq!(clash.constraint, HardConstraint::DuplicateSlot);
/// assert_eq!(store.placed_hours(section), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentStore<'d> {
    domain: &'d TermDomain,
    constraints: HardConstraintSet,
    slot_count: usize,
    room_slots: Vec<Option<Placement>>,
    faculty_slots: Vec<Option<Placement>>,
    batch_slots: Vec<Option<Placement>>,
    sections: Vec<SmallVec<[Placement; 4]>>,
    faculty_day_hours: Vec<u16>,
    placed: usize,
    required: usize,
}

impl<'d> AssignmentStore<'d> {
    /// Creates an empty store checking every hard constraint.
    pub fn new(domain: &'d TermDomain) -> Self {
        Self::with_constraints(domain, HardConstraintSet::standard())
    }

    /// Creates an empty store checking the given hard constraints.
    pub fn with_constraints(domain: &'d TermDomain, constraints: HardConstraintSet) -> Self {
        let slot_count = domain.slots().len();
        Self {
            domain,
            constraints,
            slot_count,
            room_slots: vec![None; domain.rooms().len() * slot_count],
            faculty_slots: vec![None; domain.faculty().len() * slot_count],
            batch_slots: vec![None; domain.batches().len() * slot_count],
            sections: vec![SmallVec::new(); domain.sections().len()],
            faculty_day_hours: vec![0; domain.faculty().len() * Weekday::COUNT],
            placed: 0,
            required: domain.total_weekly_hours(),
        }
    }

    pub fn domain(&self) -> &'d TermDomain {
        self.domain
    }

    pub fn constraints(&self) -> &HardConstraintSet {
        &self.constraints
    }

    /// Checks every hard constraint against the current state without
    /// changing anything.
    pub fn check(&self, candidate: &Placement) -> Result<(), ConstraintViolation> {
        self.constraints.check(self, candidate)
    }

    /// Adds a placement if it violates no hard constraint.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, and the placement that blocks
    /// the candidate if there is one. The store is unchanged on error.
    pub fn try_assign(&mut self, candidate: Placement) -> Result<(), ConstraintViolation> {
        self.check(&candidate)?;
        self.insert(candidate);
        Ok(())
    }

    fn insert(&mut self, p: Placement) {
        let slot = p.slot.index();
        self.room_slots[p.room.index() * self.slot_count + slot] = Some(p);
        self.faculty_slots[p.faculty.index() * self.slot_count + slot] = Some(p);
        for batch in self.domain.conflict_batches(p.section) {
            self.batch_slots[batch.index() * self.slot_count + slot] = Some(p);
        }
        let hours = &mut self.sections[p.section.index()];
        let at = hours.partition_point(|q| q.slot < p.slot);
        hours.insert(at, p);

        let day = self.domain.slot(p.slot).day;
        self.faculty_day_hours[p.faculty.index() * Weekday::COUNT + day.index()] += 1;
        self.placed += 1;
    }

    /// Removes the placement of `section` at `slot`, if any.
    pub fn unassign(&mut self, section: SectionId, slot: SlotId) -> Option<Placement> {
        let hours = &mut self.sections[section.index()];
        let at = hours.iter().position(|p| p.slot == slot)?;
        let p = hours.remove(at);

        let s = slot.index();
        clear_if(&mut self.room_slots[p.room.index() * self.slot_count + s], &p);
        clear_if(&mut self.faculty_slots[p.faculty.index() * self.slot_count + s], &p);
        for batch in self.domain.conflict_batches(section) {
            clear_if(&mut self.batch_slots[batch.index() * self.slot_count + s], &p);
        }

        let day = self.domain.slot(slot).day;
        self.faculty_day_hours[p.faculty.index() * Weekday::COUNT + day.index()] -= 1;
        self.placed -= 1;
        Some(p)
    }

    /// Removes every placement.
    pub fn clear(&mut self) {
        self.room_slots.fill(None);
        self.faculty_slots.fill(None);
        self.batch_slots.fill(None);
        self.sections.iter_mut().for_each(SmallVec::clear);
        self.faculty_day_hours.fill(0);
        self.placed = 0;
    }

    /// Returns true when every section holds all of its weekly hours.
    pub fn is_complete(&self) -> bool {
        self.placed == self.required
    }

    /// Total placements currently held.
    pub fn len(&self) -> usize {
        self.placed
    }

    pub fn is_empty(&self) -> bool {
        self.placed == 0
    }

    pub fn placed_hours(&self, section: SectionId) -> usize {
        self.sections[section.index()].len()
    }

    pub fn remaining_hours(&self, section: SectionId) -> usize {
        let required = self.domain.section(section).weekly_hours as usize;
        required.saturating_sub(self.placed_hours(section))
    }

    /// Placements of a section, ordered by slot.
    pub fn placements_of(&self, section: SectionId) -> &[Placement] {
        &self.sections[section.index()]
    }

    /// The placement of `section` at `slot`, if any.
    pub fn section_at(&self, section: SectionId, slot: SlotId) -> Option<Placement> {
        self.placements_of(section)
            .iter()
            .find(|p| p.slot == slot)
            .copied()
    }

    /// Faculty member already teaching the section, if any hour is placed.
    pub fn section_faculty(&self, section: SectionId) -> Option<FacultyId> {
        self.placements_of(section).first().map(|p| p.faculty)
    }

    #[inline]
    pub fn room_at(&self, room: RoomId, slot: SlotId) -> Option<Placement> {
        self.room_slots[room.index() * self.slot_count + slot.index()]
    }

    #[inline]
    pub fn faculty_at(&self, faculty: FacultyId, slot: SlotId) -> Option<Placement> {
        self.faculty_slots[faculty.index() * self.slot_count + slot.index()]
    }

    #[inline]
    pub fn batch_at(&self, batch: BatchId, slot: SlotId) -> Option<Placement> {
        self.batch_slots[batch.index() * self.slot_count + slot.index()]
    }

    /// Hours the faculty member teaches on `day`.
    #[inline]
    pub fn faculty_hours_on(&self, faculty: FacultyId, day: Weekday) -> u16 {
        self.faculty_day_hours[faculty.index() * Weekday::COUNT + day.index()]
    }

    /// Iterates all placements, section by section.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.sections.iter().flat_map(|hours| hours.iter())
    }

    /// Freezes the current state into an immutable schedule.
    pub fn freeze(&self) -> Schedule {
        Schedule::from_placements(self.iter().copied().collect())
    }
}

fn clear_if(cell: &mut Option<Placement>, p: &Placement) {
    if cell.as_ref() == Some(p) {
        *cell = None;
    }
}
