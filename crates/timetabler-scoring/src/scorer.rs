//! Schedule scoring and cost reports.

use serde::Serialize;
use timetabler_config::GeneratorConfig;
use timetabler_core::{HardSoftCost, Schedule, TermDomain};

use crate::audit::{audit_with, hard_cost, HardViolation};
use crate::constraint::{HardConstraint, HardConstraintSet, SoftConstraint, SoftConstraintSet};

/// Cost contributed by one soft constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConstraintCost {
    pub constraint: SoftConstraint,
    pub weight: f64,
    /// Unweighted penalty.
    pub raw: f64,
    /// `weight * raw`.
    pub cost: f64,
}

/// Cost of a schedule with its per-constraint breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub cost: HardSoftCost,
    pub breakdown: Vec<ConstraintCost>,
    pub violations: Vec<HardViolation>,
}

impl ScheduleReport {
    pub fn is_feasible(&self) -> bool {
        self.cost.is_feasible()
    }

    pub fn cost_of(&self, constraint: SoftConstraint) -> Option<&ConstraintCost> {
        self.breakdown.iter().find(|c| c.constraint == constraint)
    }

    /// Contact hours still missing across all sections.
    pub fn missing_hours(&self) -> u64 {
        self.violations
            .iter()
            .filter(|v| v.constraint == HardConstraint::Completeness)
            .map(|v| v.count)
            .sum()
    }
}

/// Prices schedules: hard cost from an exhaustive audit, soft cost from the
/// weighted soft constraints.
///
/// # Examples
///
/// ```
/// use timetabler_core::{FacultyId, Placement, RoomId, Schedule, SectionId, SlotId};
/// use timetabler_scoring::Scorer;
///
/// let domain = timetabler_test::scenario_a();
/// let schedule = Schedule::from_placements(vec![
///     Placement::new(SectionId(0), SlotId(0), RoomId(0), FacultyId(0)),
///     Placement::new(SectionId(0), SlotId(1), RoomId(0), FacultyId(0)),
/// ]);
/// let report = Scorer::default().score(&domain, &schedule);
/// assert!(report.is_feasible());
/// assert_eq!(report.breakdown.len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scorer {
    hard: HardConstraintSet,
    soft: SoftConstraintSet,
}

impl Scorer {
    pub fn new(hard: HardConstraintSet, soft: SoftConstraintSet) -> Self {
        Self { hard, soft }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            hard: HardConstraintSet::from_config(&config.search),
            soft: SoftConstraintSet::from_weights(&config.weights),
        }
    }

    pub fn hard_constraints(&self) -> &HardConstraintSet {
        &self.hard
    }

    pub fn soft_constraints(&self) -> &SoftConstraintSet {
        &self.soft
    }

    /// Weighted soft cost only.
    pub fn soft_cost(&self, domain: &TermDomain, schedule: &Schedule) -> f64 {
        self.soft.cost(domain, schedule.placements())
    }

    /// Full cost of a schedule.
    pub fn score(&self, domain: &TermDomain, schedule: &Schedule) -> ScheduleReport {
        let violations = audit_with(domain, schedule, &self.hard);
        let breakdown: Vec<ConstraintCost> = self
            .soft
            .iter()
            .map(|t| {
                let raw = t.constraint.penalty(domain, schedule.placements());
                ConstraintCost {
                    constraint: t.constraint,
                    weight: t.weight,
                    raw,
                    cost: t.weight * raw,
                }
            })
            .collect();
        let soft: f64 = breakdown.iter().map(|c| c.cost).sum();

        ScheduleReport {
            cost: HardSoftCost::of(hard_cost(&violations), soft),
            breakdown,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetabler_config::WeightsConfig;
    use timetabler_core::{FacultyId, Placement, RoomId, SectionId, SlotId};

    fn place(section: u32, slot: u32, room: u32, faculty: u32) -> Placement {
        Placement::new(SectionId(section), SlotId(slot), RoomId(room), FacultyId(faculty))
    }

    #[test]
    fn test_morning_placement_costs_less() {
        let domain = timetabler_test::scenario_c();
        let scorer = Scorer::default();
        let morning = Schedule::from_placements(vec![place(0, 0, 0, 0)]);
        let afternoon = Schedule::from_placements(vec![place(0, 1, 0, 0)]);

        let m = scorer.score(&domain, &morning);
        let a = scorer.score(&domain, &afternoon);
        assert!(m.is_feasible() && a.is_feasible());
        assert!(m.cost < a.cost);
        assert_eq!(a.cost_of(SoftConstraint::TimeWindow).map(|c| c.raw), Some(60.0));
        assert!((a.cost.soft() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_hours_are_hard_cost() {
        let domain = timetabler_test::scenario_b();
        let report = Scorer::default().score(&domain, &Schedule::default());
        assert_eq!(report.cost.hard(), 2);
        assert_eq!(report.missing_hours(), 2);
        assert!(!report.is_feasible());
    }

    #[test]
    fn test_weights_from_config() {
        let config = GeneratorConfig::new().with_weights(WeightsConfig {
            time_window: 1.0,
            ..WeightsConfig::default()
        });
        let scorer = Scorer::from_config(&config);
        let domain = timetabler_test::scenario_c();
        let afternoon = Schedule::from_placements(vec![place(0, 1, 0, 0)]);
        assert!((scorer.soft_cost(&domain, &afternoon) - 60.0).abs() < 1e-9);
    }
}
