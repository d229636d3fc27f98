//! Relaxed completion of an exhausted search.

use tracing::debug;

use timetabler_core::SectionId;
use timetabler_scoring::{AssignmentStore, SoftConstraintSet};

use crate::search::legal_placements;

/// Greedily adds every hour that still fits, cheapest soft marginal first.
///
/// Sections are visited in the given order; each missing hour takes the
/// legal placement with the lowest marginal, ties going to the earliest
/// (slot, room, faculty). Returns the number of hours added.
pub fn complete_greedily(
    store: &mut AssignmentStore<'_>,
    soft: &SoftConstraintSet,
    sections: &[SectionId],
) -> usize {
    let mut added = 0;
    for &section in sections {
        while store.remaining_hours(section) > 0 {
            let cheapest = legal_placements(store, section)
                .into_iter()
                .map(|p| (soft.marginal(store, &p), p))
                .min_by(|a, b| a.0.total_cmp(&b.0));
            let Some((_, p)) = cheapest else {
                break;
            };
            if store.try_assign(p).is_err() {
                break;
            }
            added += 1;
        }
    }
    debug!(event = "relaxed_completion", added, placed = store.len());
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetabler_core::{FacultyId, Placement, RoomId, SlotId};

    #[test]
    fn test_fills_what_fits() {
        let domain = timetabler_test::scenario_b();
        let mut store = AssignmentStore::new(&domain);
        let added = complete_greedily(
            &mut store,
            &SoftConstraintSet::default(),
            &[SectionId(0), SectionId(1)],
        );
        // one slot, one shared batch
        assert_eq!(added, 1);
        assert_eq!(store.placed_hours(SectionId(0)), 1);
        assert_eq!(store.placed_hours(SectionId(1)), 0);
    }

    #[test]
    fn test_keeps_existing_placements() {
        let domain = timetabler_test::scenario_a();
        let mut store = AssignmentStore::new(&domain);
        store
            .try_assign(Placement::new(SectionId(0), SlotId(2), RoomId(0), FacultyId(0)))
            .unwrap();

        let added = complete_greedily(&mut store, &SoftConstraintSet::default(), &[SectionId(0)]);
        assert_eq!(added, 1);
        assert!(store.is_complete());
        assert!(store.section_at(SectionId(0), SlotId(2)).is_some());
    }
}
