use std::collections::BTreeSet;

use timetabler_core::{Placement, SectionId, SlotId};

/// Earlier levels that ruled out options at one level.
///
/// A level is slot-bound when every option it ruled out was lost to the
/// slot it placed in: another room or faculty member in that slot would
/// rule out the same options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ConflictSet {
    levels: BTreeSet<usize>,
    /// Levels with at least one reason that is not slot-bound.
    loose: BTreeSet<usize>,
}

impl ConflictSet {
    pub(crate) fn insert(&mut self, level: usize, slot_bound: bool) {
        self.levels.insert(level);
        if !slot_bound {
            self.loose.insert(level);
        }
    }

    pub(crate) fn deepest(&self) -> Option<usize> {
        self.levels.last().copied()
    }

    pub(crate) fn is_slot_bound(&self, level: usize) -> bool {
        self.levels.contains(&level) && !self.loose.contains(&level)
    }

    /// Adds the levels of `other` below `level`.
    fn absorb(&mut self, other: ConflictSet, level: usize) {
        self.levels.extend(other.levels.into_iter().filter(|&l| l < level));
        self.loose.extend(other.loose.into_iter().filter(|&l| l < level));
    }
}

/// One level of the decision stack: the section hour being placed, its
/// ordered candidates, and the earlier levels that constrain it.
#[derive(Debug, Clone)]
pub struct Decision {
    section: SectionId,
    candidates: Vec<Placement>,
    next: usize,
    placed: Option<Placement>,
    conflicts: ConflictSet,
}

impl Decision {
    pub(crate) fn new(
        section: SectionId,
        candidates: Vec<Placement>,
        conflicts: ConflictSet,
    ) -> Self {
        Self {
            section,
            candidates,
            next: 0,
            placed: None,
            conflicts,
        }
    }

    pub fn section(&self) -> SectionId {
        self.section
    }

    /// Candidates in trial order.
    pub fn candidates(&self) -> &[Placement] {
        &self.candidates
    }

    /// Candidates not yet tried.
    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.next
    }

    /// The candidate currently committed at this level.
    pub fn placed(&self) -> Option<Placement> {
        self.placed
    }

    /// Earlier levels whose placements removed options from this one.
    pub fn conflicts(&self) -> &BTreeSet<usize> {
        &self.conflicts.levels
    }

    pub(crate) fn into_conflicts(self) -> ConflictSet {
        self.conflicts
    }

    pub(crate) fn next_candidate(&mut self) -> Option<Placement> {
        let candidate = self.candidates.get(self.next).copied()?;
        self.next += 1;
        Some(candidate)
    }

    pub(crate) fn commit(&mut self, placement: Placement) {
        self.placed = Some(placement);
    }

    pub(crate) fn take_placed(&mut self) -> Option<Placement> {
        self.placed.take()
    }

    pub(crate) fn add_conflict(&mut self, level: usize, slot_bound: bool) {
        self.conflicts.insert(level, slot_bound);
    }

    /// Merges the conflicts of a dead end below this level.
    pub(crate) fn absorb(&mut self, conflicts: ConflictSet, level: usize) {
        self.conflicts.absorb(conflicts, level);
    }

    /// Drops the untried candidates in `slot`. Returns how many went.
    pub(crate) fn discard_slot(&mut self, slot: SlotId) -> usize {
        let before = self.candidates.len();
        let mut i = 0;
        let tried = self.next;
        self.candidates.retain(|p| {
            let keep = i < tried || p.slot != slot;
            i += 1;
            keep
        });
        before - self.candidates.len()
    }
}
