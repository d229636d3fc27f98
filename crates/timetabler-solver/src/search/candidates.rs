//! Variable and value ordering.

use rand::Rng;
use smallvec::{smallvec, SmallVec};
use timetabler_core::{FacultyId, Placement, SectionId, SlotId};
use timetabler_scoring::{AssignmentStore, HardConstraint};

use super::decision::ConflictSet;
use super::SearchEngine;
use crate::scope::RestartScope;
use crate::termination::Termination;

/// Faculty a further hour of `section` may use.
fn faculty_options(
    store: &AssignmentStore<'_>,
    section: SectionId,
) -> SmallVec<[FacultyId; 4]> {
    let consistent = store
        .constraints()
        .contains(HardConstraint::FacultyConsistency);
    match store.section_faculty(section) {
        Some(faculty) if consistent => smallvec![faculty],
        _ => SmallVec::from_slice(store.domain().qualified_faculty(section)),
    }
}

/// Returns true if `blocker` rules out `candidate` through its slot alone:
/// both belong to one section or share a batch, and meet in the same slot.
pub(super) fn slot_bound(
    store: &AssignmentStore<'_>,
    blocker: &Placement,
    candidate: &Placement,
) -> bool {
    if blocker.slot != candidate.slot {
        return false;
    }
    let hard = store.constraints();
    if blocker.section == candidate.section {
        return hard.contains(HardConstraint::DuplicateSlot);
    }
    let domain = store.domain();
    let theirs = domain.conflict_batches(blocker.section);
    hard.contains(HardConstraint::BatchClash)
        && domain
            .conflict_batches(candidate.section)
            .iter()
            .any(|b| theirs.contains(b))
}

/// Every placement of one more hour of `section` the store would accept,
/// in (slot, room, faculty) order.
pub(crate) fn legal_placements(store: &AssignmentStore<'_>, section: SectionId) -> Vec<Placement> {
    let domain = store.domain();
    let faculty = faculty_options(store, section);
    let mut legal = Vec::new();
    for slot in domain.slots() {
        for &room in domain.compatible_rooms(section) {
            for &f in &faculty {
                let p = Placement::new(section, slot.id, room, f);
                if store.check(&p).is_ok() {
                    legal.push(p);
                }
            }
        }
    }
    legal
}

impl<T: Termination> SearchEngine<'_, T> {
    /// Slot after which the next hour of `section` must go.
    fn last_slot(&self, section: SectionId) -> Option<SlotId> {
        self.store.placements_of(section).last().map(|p| p.slot)
    }

    /// Counts the (slot, room, faculty) options left for the next hour of
    /// `section`. Returns 0 when fewer usable slots remain than hours.
    pub(super) fn option_count(&self, section: SectionId) -> usize {
        let domain = self.store.domain();
        let remaining = self.store.remaining_hours(section);
        let after = self.last_slot(section);
        let faculty = faculty_options(&self.store, section);

        let mut options = 0;
        let mut open_slots = 0;
        for slot in domain.slots() {
            if after.is_some_and(|a| slot.id <= a) {
                continue;
            }
            let batch_busy = domain
                .conflict_batches(section)
                .iter()
                .any(|&b| self.store.batch_at(b, slot.id).is_some());
            if batch_busy {
                continue;
            }
            let rooms = domain
                .compatible_rooms(section)
                .iter()
                .filter(|&&r| self.store.room_at(r, slot.id).is_none())
                .count();
            let teachers = faculty
                .iter()
                .filter(|&&f| self.store.faculty_at(f, slot.id).is_none())
                .count();
            if rooms * teachers > 0 {
                open_slots += 1;
                options += rooms * teachers;
            }
        }
        if open_slots < remaining {
            0
        } else {
            options
        }
    }

    /// Picks the unplaced section with the fewest options (MRV).
    ///
    /// Ties go to the restart's random section priority.
    pub(super) fn most_constrained(&self) -> Option<(SectionId, usize)> {
        let mut best: Option<(usize, u64, SectionId)> = None;
        for section in self.store.domain().sections() {
            let i = section.id.index();
            if !self.active[i] || self.store.remaining_hours(section.id) == 0 {
                continue;
            }
            let options = self.option_count(section.id);
            let key = (options, self.priority[i]);
            if best.map_or(true, |(o, p, _)| key < (o, p)) {
                best = Some((options, self.priority[i], section.id));
                if options == 0 {
                    break;
                }
            }
        }
        best.map(|(options, _, section)| (section, options))
    }

    /// Legal candidates for the next hour of `section`, cheapest soft
    /// marginal first, with the levels that ruled out the rest.
    pub(super) fn candidates(
        &self,
        section: SectionId,
        scope: &mut RestartScope,
    ) -> (Vec<Placement>, ConflictSet) {
        let domain = self.store.domain();
        let remaining = self.store.remaining_hours(section);
        let after = self.last_slot(section);
        let faculty = faculty_options(&self.store, section);

        // earlier hours fix the slot order, and the faculty when consistent
        let pinned = self
            .store
            .constraints()
            .contains(HardConstraint::FacultyConsistency);
        let mut conflicts = ConflictSet::default();
        for p in self.store.placements_of(section) {
            if let Some(level) = self.level_of(p) {
                conflicts.insert(level, !pinned);
            }
        }
        let mut legal = Vec::new();
        let mut open: Vec<SlotId> = Vec::new();

        for slot in domain.slots() {
            if after.is_some_and(|a| slot.id <= a) {
                continue;
            }
            let before = legal.len();
            for &room in domain.compatible_rooms(section) {
                for &f in &faculty {
                    let p = Placement::new(section, slot.id, room, f);
                    match self.store.check(&p) {
                        Ok(()) => legal.push(p),
                        Err(violation) => {
                            if let Some(b) = violation.blocker {
                                if let Some(level) = self.level_of(&b) {
                                    conflicts.insert(level, slot_bound(&self.store, &b, &p));
                                }
                            }
                        }
                    }
                }
            }
            if legal.len() > before {
                open.push(slot.id);
            }
        }

        // leave enough open slots after this hour for the rest
        if open.len() < remaining {
            legal.clear();
        } else if remaining > 0 {
            let latest = open[open.len() - remaining];
            legal.retain(|p| p.slot <= latest);
        }

        let mut keyed: Vec<(f64, u64, Placement)> = legal
            .into_iter()
            .map(|p| (self.soft.marginal(&self.store, &p), scope.rng().random(), p))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        (keyed.into_iter().map(|(_, _, p)| p).collect(), conflicts)
    }
}
