//! Hill-climbing refinement of a complete schedule.

use tracing::{debug, trace};

use timetabler_core::Placement;
use timetabler_scoring::{AssignmentStore, SoftConstraintSet};

use crate::scope::RestartScope;
use crate::search::legal_placements;
use crate::termination::{StopReason, Termination};

const EPSILON: f64 = 1e-9;

/// Relocates single hours to cheaper legal (slot, room, faculty) options.
///
/// Each pass visits every placement once: the hour is lifted out, the
/// cheapest legal spot for it is found by soft marginal, and the hour moves
/// only if that strictly lowers the soft cost. Passes repeat until one
/// makes no move or the pass limit is reached. Hard feasibility is never
/// given up.
#[derive(Debug, Clone, Copy)]
pub struct Refiner<'s> {
    soft: &'s SoftConstraintSet,
    pass_limit: usize,
}

impl<'s> Refiner<'s> {
    pub fn new(soft: &'s SoftConstraintSet, pass_limit: usize) -> Self {
        Self { soft, pass_limit }
    }

    /// Refines `store` in place.
    ///
    /// Every relocation attempt counts as a node against `termination`.
    /// Returns the reason refinement was cut short, if it was.
    pub fn refine<T: Termination>(
        &self,
        store: &mut AssignmentStore<'_>,
        termination: &T,
        scope: &mut RestartScope,
    ) -> Option<StopReason> {
        for pass in 0..self.pass_limit {
            let hours: Vec<Placement> = store.iter().copied().collect();
            let mut moves = 0u64;

            for p in hours {
                if let Some(reason) = termination.check(scope) {
                    debug!(event = "refine_stopped", pass, reason = %reason);
                    return Some(reason);
                }
                scope.increment_node_count();
                if self.relocate(store, p) {
                    moves += 1;
                }
            }

            scope.statistics_mut().refinement_moves += moves;
            debug!(event = "refine_pass", restart = scope.restart(), pass, moves);
            if moves == 0 {
                break;
            }
        }
        None
    }

    /// Moves `p` to its cheapest legal spot. Returns true if it moved.
    fn relocate(&self, store: &mut AssignmentStore<'_>, p: Placement) -> bool {
        let Some(current) = store.unassign(p.section, p.slot) else {
            return false;
        };
        let stay = self.soft.marginal(store, &current);

        let mut best = (stay, current);
        for candidate in legal_placements(store, current.section) {
            let cost = self.soft.marginal(store, &candidate);
            if cost < best.0 - EPSILON {
                best = (cost, candidate);
            }
        }

        let (cost, target) = best;
        match store.try_assign(target) {
            Ok(()) if target != current => {
                trace!(
                    event = "relocate",
                    section = current.section.0,
                    from = current.slot.0,
                    to = target.slot.0,
                    saving = stay - cost,
                );
                true
            }
            Ok(()) => false,
            Err(_) => {
                let restored = store.try_assign(current);
                debug_assert!(restored.is_ok(), "lifted hour refused: {restored:?}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetabler_core::{FacultyId, RoomId, SectionId, SlotId};
    use timetabler_scoring::Scorer;

    use crate::termination::NodeCountTermination;

    #[test]
    fn test_afternoon_hour_moves_to_morning() {
        let domain = timetabler_test::scenario_c();
        let soft = SoftConstraintSet::default();
        let mut store = AssignmentStore::new(&domain);
        store
            .try_assign(Placement::new(SectionId(0), SlotId(1), RoomId(0), FacultyId(0)))
            .unwrap();

        let mut scope = RestartScope::new(0, 0);
        let stopped = Refiner::new(&soft, 4).refine(&mut store, &None::<NodeCountTermination>, &mut scope);

        assert_eq!(stopped, None);
        assert_eq!(store.placements_of(SectionId(0))[0].slot, SlotId(0));
        assert_eq!(scope.statistics().refinement_moves, 1);
    }

    #[test]
    fn test_refinement_never_raises_cost() {
        let domain = timetabler_test::campus();
        let scorer = Scorer::default();
        let mut engine = crate::search::SearchEngine::new(
            &domain,
            scorer.hard_constraints().clone(),
            scorer.soft_constraints().clone(),
            &Default::default(),
            NodeCountTermination::new(100_000),
        );
        let mut scope = RestartScope::new(0, 5);
        assert!(engine.run(&mut scope).is_solved());
        let mut store = engine.into_best_store();
        let before = scorer.score(&domain, &store.freeze());

        Refiner::new(scorer.soft_constraints(), 2).refine(&mut store, &None::<NodeCountTermination>, &mut scope);
        let after = scorer.score(&domain, &store.freeze());

        assert!(after.is_feasible());
        assert!(after.cost <= before.cost);
    }

    #[test]
    fn test_zero_passes_is_a_no_op() {
        let domain = timetabler_test::scenario_c();
        let soft = SoftConstraintSet::default();
        let mut store = AssignmentStore::new(&domain);
        store
            .try_assign(Placement::new(SectionId(0), SlotId(1), RoomId(0), FacultyId(0)))
            .unwrap();

        let mut scope = RestartScope::new(0, 0);
        Refiner::new(&soft, 0).refine(&mut store, &None::<NodeCountTermination>, &mut scope);
        assert_eq!(store.placements_of(SectionId(0))[0].slot, SlotId(1));
    }

    #[test]
    fn test_budget_cuts_refinement() {
        let domain = timetabler_test::scenario_c();
        let soft = SoftConstraintSet::default();
        let mut store = AssignmentStore::new(&domain);
        store
            .try_assign(Placement::new(SectionId(0), SlotId(1), RoomId(0), FacultyId(0)))
            .unwrap();

        let mut scope = RestartScope::new(0, 0);
        let stopped = Refiner::new(&soft, 4).refine(&mut store, &NodeCountTermination::new(0), &mut scope);
        assert_eq!(stopped, Some(StopReason::NodeLimit));
        assert_eq!(store.len(), 1);
    }
}
