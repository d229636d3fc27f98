use timetabler_config::SearchConfig;
use timetabler_core::{Placement, TermDomain};

use super::{ConstraintViolation, HardConstraint};
use crate::store::AssignmentStore;

impl HardConstraint {
    /// Checks a candidate placement against the working schedule.
    #[inline]
    pub fn check(
        self,
        store: &AssignmentStore<'_>,
        candidate: &Placement,
    ) -> Result<(), ConstraintViolation> {
        let domain = store.domain();
        let p = candidate;
        match self {
            HardConstraint::FacultyQualification
            | HardConstraint::RoomKind
            | HardConstraint::RoomCapacity => self.check_static(domain, p),
            HardConstraint::Completeness => {
                if store.remaining_hours(p.section) == 0 {
                    Err(ConstraintViolation::new(self))
                } else {
                    Ok(())
                }
            }
            HardConstraint::DuplicateSlot => match store.section_at(p.section, p.slot) {
                Some(existing) => Err(ConstraintViolation::blocked_by(self, existing)),
                None => Ok(()),
            },
            HardConstraint::FacultyConsistency => match store.placements_of(p.section).first() {
                Some(first) if first.faculty != p.faculty => {
                    Err(ConstraintViolation::blocked_by(self, *first))
                }
                _ => Ok(()),
            },
            HardConstraint::RoomClash => match store.room_at(p.room, p.slot) {
                Some(existing) => Err(ConstraintViolation::blocked_by(self, existing)),
                None => Ok(()),
            },
            HardConstraint::FacultyClash => match store.faculty_at(p.faculty, p.slot) {
                Some(existing) => Err(ConstraintViolation::blocked_by(self, existing)),
                None => Ok(()),
            },
            HardConstraint::BatchClash => {
                for &batch in domain.conflict_batches(p.section) {
                    if let Some(existing) = store.batch_at(batch, p.slot) {
                        return Err(ConstraintViolation::blocked_by(self, existing));
                    }
                }
                Ok(())
            }
        }
    }

    /// Checks the constraints that need only the domain. Returns `Ok` for
    /// constraints that depend on other placements.
    pub fn check_static(
        self,
        domain: &TermDomain,
        candidate: &Placement,
    ) -> Result<(), ConstraintViolation> {
        let section = candidate.section;
        let ok = match self {
            HardConstraint::FacultyQualification => {
                domain.qualified_faculty(section).contains(&candidate.faculty)
            }
            HardConstraint::RoomKind => {
                domain.room(candidate.room).kind == domain.section_course(section).kind
            }
            HardConstraint::RoomCapacity => {
                domain.room(candidate.room).capacity >= domain.headcount(section)
            }
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ConstraintViolation::new(self))
        }
    }
}

/// The hard constraints a store enforces, in check order.
///
/// Static constraints come first so a hopeless candidate is refused before
/// any occupancy lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardConstraintSet {
    constraints: Vec<HardConstraint>,
}

impl Default for HardConstraintSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl HardConstraintSet {
    /// Every hard constraint.
    pub fn standard() -> Self {
        Self {
            constraints: HardConstraint::ALL.to_vec(),
        }
    }

    /// Every hard constraint the search configuration enables.
    pub fn from_config(search: &SearchConfig) -> Self {
        let set = Self::standard();
        if search.same_faculty_per_section {
            set
        } else {
            set.without(HardConstraint::FacultyConsistency)
        }
    }

    pub fn without(mut self, constraint: HardConstraint) -> Self {
        self.constraints.retain(|&c| c != constraint);
        self
    }

    pub fn contains(&self, constraint: HardConstraint) -> bool {
        self.constraints.contains(&constraint)
    }

    pub fn iter(&self) -> impl Iterator<Item = HardConstraint> + '_ {
        self.constraints.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Runs every constraint in order; stops at the first violation.
    pub fn check(
        &self,
        store: &AssignmentStore<'_>,
        candidate: &Placement,
    ) -> Result<(), ConstraintViolation> {
        for constraint in &self.constraints {
            constraint.check(store, candidate)?;
        }
        Ok(())
    }

    /// Runs only the static constraints.
    pub fn check_static(
        &self,
        domain: &TermDomain,
        candidate: &Placement,
    ) -> Result<(), ConstraintViolation> {
        for constraint in self.constraints.iter().filter(|c| c.is_static()) {
            constraint.check_static(domain, candidate)?;
        }
        Ok(())
    }
}
