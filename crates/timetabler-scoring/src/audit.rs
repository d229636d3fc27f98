//! Exhaustive hard-constraint audit of a frozen schedule.

use serde::Serialize;
use timetabler_core::{Placement, Schedule, SectionId, TermDomain};

use crate::constraint::{HardConstraint, HardConstraintSet};

/// One hard-constraint violation found in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardViolation {
    pub constraint: HardConstraint,
    /// Section the violation concerns, for per-section constraints.
    pub section: Option<SectionId>,
    /// Placements involved: one for static violations, two for clashes,
    /// none for missing hours.
    pub placements: Vec<Placement>,
    /// Units of hard cost. Missing or surplus hours for completeness, 1
    /// otherwise.
    pub count: u64,
}

impl HardViolation {
    fn single(constraint: HardConstraint, p: Placement) -> Self {
        Self {
            constraint,
            section: Some(p.section),
            placements: vec![p],
            count: 1,
        }
    }

    fn pair(constraint: HardConstraint, a: Placement, b: Placement) -> Self {
        Self {
            constraint,
            section: None,
            placements: vec![a, b],
            count: 1,
        }
    }
}

/// Re-checks every hard constraint against a schedule.
///
/// ```
/// use timetabler_core::{FacultyId, Placement, RoomId, Schedule, SectionId, SlotId};
/// use timetabler_scoring::{audit, HardConstraint};
///
/// let domain = timetabler_test::scenario_a();
/// // one of two required hours
/// let schedule = Schedule::from_placements(vec![
///     Placement::new(SectionId(0), SlotId(0), RoomId(0), FacultyId(0)),
/// ]);
/// let violations = audit(&domain, &schedule);
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].constraint, HardConstraint::Completeness);
/// assert_eq!(violations[0].count, 1);
/// ```
pub fn audit(domain: &TermDomain, schedule: &Schedule) -> Vec<HardViolation> {
    audit_with(domain, schedule, &HardConstraintSet::standard())
}

/// Re-checks the given hard constraints against a schedule.
///
/// Every pair of placements sharing a slot is compared; pairs in different
/// slots cannot clash.
pub fn audit_with(
    domain: &TermDomain,
    schedule: &Schedule,
    constraints: &HardConstraintSet,
) -> Vec<HardViolation> {
    let mut violations = Vec::new();

    for p in schedule.iter() {
        for constraint in constraints.iter().filter(|c| c.is_static()) {
            if constraint.check_static(domain, p).is_err() {
                violations.push(HardViolation::single(constraint, *p));
            }
        }
    }

    let mut by_slot: Vec<Vec<Placement>> = vec![Vec::new(); domain.slots().len()];
    for p in schedule.iter() {
        by_slot[p.slot.index()].push(*p);
    }
    for placements in &by_slot {
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                pair_violations(domain, constraints, *a, *b, &mut violations);
            }
        }
    }

    for section in domain.sections() {
        let hours: Vec<&Placement> = schedule.for_section(section.id).collect();

        if constraints.contains(HardConstraint::FacultyConsistency) {
            if let Some(first) = hours.first() {
                for p in hours.iter().filter(|p| p.faculty != first.faculty) {
                    violations.push(HardViolation::single(
                        HardConstraint::FacultyConsistency,
                        **p,
                    ));
                }
            }
        }

        if constraints.contains(HardConstraint::Completeness) {
            let required = section.weekly_hours as u64;
            let placed = hours.len() as u64;
            if placed != required {
                violations.push(HardViolation {
                    constraint: HardConstraint::Completeness,
                    section: Some(section.id),
                    placements: Vec::new(),
                    count: placed.abs_diff(required),
                });
            }
        }
    }

    violations
}

fn pair_violations(
    domain: &TermDomain,
    constraints: &HardConstraintSet,
    a: Placement,
    b: Placement,
    out: &mut Vec<HardViolation>,
) {
    if a.section == b.section && constraints.contains(HardConstraint::DuplicateSlot) {
        out.push(HardViolation {
            section: Some(a.section),
            ..HardViolation::pair(HardConstraint::DuplicateSlot, a, b)
        });
        return;
    }
    if a.room == b.room && constraints.contains(HardConstraint::RoomClash) {
        out.push(HardViolation::pair(HardConstraint::RoomClash, a, b));
    }
    if a.faculty == b.faculty && constraints.contains(HardConstraint::FacultyClash) {
        out.push(HardViolation::pair(HardConstraint::FacultyClash, a, b));
    }
    if constraints.contains(HardConstraint::BatchClash) {
        let theirs = domain.conflict_batches(b.section);
        let shared = domain
            .conflict_batches(a.section)
            .iter()
            .any(|batch| theirs.contains(batch));
        if shared {
            out.push(HardViolation::pair(HardConstraint::BatchClash, a, b));
        }
    }
}

/// Total hard cost of a list of violations.
pub fn hard_cost(violations: &[HardViolation]) -> u64 {
    violations.iter().map(|v| v.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetabler_core::{FacultyId, RoomId, SlotId};

    fn place(section: u32, slot: u32, room: u32, faculty: u32) -> Placement {
        Placement::new(SectionId(section), SlotId(slot), RoomId(room), FacultyId(faculty))
    }

    #[test]
    fn test_missing_hour_reported() {
        let domain = timetabler_test::scenario_b();
        let schedule = Schedule::from_placements(vec![place(0, 0, 0, 0)]);
        let violations = audit(&domain, &schedule);
        // only the missing hour of the second section
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].section, Some(SectionId(1)));
        assert_eq!(hard_cost(&violations), 1);
    }

    #[test]
    fn test_pairwise_clashes_found() {
        let domain = timetabler_test::scenario_b();
        // same room, same batch, different faculty
        let schedule = Schedule::from_placements(vec![place(0, 0, 0, 0), place(1, 0, 0, 1)]);
        let violations = audit(&domain, &schedule);
        let kinds: Vec<HardConstraint> = violations.iter().map(|v| v.constraint).collect();
        assert_eq!(
            kinds,
            vec![HardConstraint::RoomClash, HardConstraint::BatchClash]
        );
        assert_eq!(violations[0].placements.len(), 2);
    }

    #[test]
    fn test_static_and_consistency_violations() {
        let domain = timetabler_test::scenario_b();
        // curie is not qualified for maths and is booked twice at 09:00
        let schedule = Schedule::from_placements(vec![place(0, 0, 0, 1), place(1, 0, 1, 1)]);
        let violations = audit(&domain, &schedule);
        assert!(violations
            .iter()
            .any(|v| v.constraint == HardConstraint::FacultyQualification));
        assert!(violations
            .iter()
            .any(|v| v.constraint == HardConstraint::FacultyClash));
    }

    #[test]
    fn test_surplus_hours_counted() {
        let domain = timetabler_test::scenario_a();
        let schedule = Schedule::from_placements(vec![
            place(0, 0, 0, 0),
            place(0, 1, 0, 0),
            place(0, 2, 0, 0),
        ]);
        let violations = audit(&domain, &schedule);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint, HardConstraint::Completeness);
        assert_eq!(violations[0].count, 1);
    }

    #[test]
    fn test_audit_with_skips_disabled_constraints() {
        let domain = timetabler_test::scenario_a();
        let schedule = Schedule::from_placements(vec![place(0, 0, 0, 0)]);
        let set = HardConstraintSet::standard().without(HardConstraint::Completeness);
        assert!(audit_with(&domain, &schedule, &set).is_empty());
    }
}
