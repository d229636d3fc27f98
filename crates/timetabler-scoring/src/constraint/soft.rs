use serde::Serialize;
use timetabler_config::WeightsConfig;
use timetabler_core::{FacultyId, Placement, SlotId, TermDomain, Weekday};

use super::SoftConstraint;
use crate::store::AssignmentStore;

impl SoftConstraint {
    /// Raw penalty of a set of placements.
    pub fn penalty(self, domain: &TermDomain, placements: &[Placement]) -> f64 {
        match self {
            SoftConstraint::TimeWindow
            | SoftConstraint::DayPreference
            | SoftConstraint::RoomAffinity => placements
                .iter()
                .map(|p| self.placement_penalty(domain, p))
                .sum(),
            SoftConstraint::DailyLoad => daily_load_penalty(domain, placements),
            SoftConstraint::BatchGaps => batch_gaps_penalty(domain, placements),
        }
    }

    /// Exact change of the raw penalty if `candidate` were added to the store.
    ///
    /// Summing the marginals of placements in insertion order reproduces
    /// [`penalty`](Self::penalty) of the final set.
    pub fn marginal(self, store: &AssignmentStore<'_>, candidate: &Placement) -> f64 {
        let domain = store.domain();
        match self {
            SoftConstraint::TimeWindow
            | SoftConstraint::DayPreference
            | SoftConstraint::RoomAffinity => self.placement_penalty(domain, candidate),
            SoftConstraint::DailyLoad => {
                let day = domain.slot(candidate.slot).day;
                let faculty = candidate.faculty;
                let before = faculty_load(domain, faculty, |d| store.faculty_hours_on(faculty, d));
                let after = faculty_load(domain, faculty, |d| {
                    store.faculty_hours_on(faculty, d) + u16::from(d == day)
                });
                after - before
            }
            SoftConstraint::BatchGaps => {
                let day = domain.slot(candidate.slot).day;
                let day_slots = domain.slots_on(day);
                let mut delta = 0.0;
                for &batch in domain.conflict_batches(candidate.section) {
                    let occupied = |s: SlotId| store.batch_at(batch, s).is_some();
                    let before = day_gaps(day_slots, occupied);
                    let after = day_gaps(day_slots, |s| s == candidate.slot || occupied(s));
                    delta += after as f64 - before as f64;
                }
                delta
            }
        }
    }

    fn placement_penalty(self, domain: &TermDomain, p: &Placement) -> f64 {
        match self {
            SoftConstraint::TimeWindow => {
                let slot = domain.slot(p.slot);
                domain
                    .faculty_member(p.faculty)
                    .preferred_window
                    .map_or(0.0, |w| w.minutes_outside(slot.start, slot.end) as f64)
            }
            SoftConstraint::DayPreference => {
                let day = domain.slot(p.slot).day;
                if domain.faculty_member(p.faculty).dislikes_day(day) {
                    1.0
                } else {
                    0.0
                }
            }
            SoftConstraint::RoomAffinity => {
                let course = domain.section_course(p.section);
                match &domain.room(p.room).branch {
                    Some(owner) if course.branch.as_ref() != Some(owner) => 1.0,
                    _ => 0.0,
                }
            }
            SoftConstraint::DailyLoad | SoftConstraint::BatchGaps => 0.0,
        }
    }
}

/// Squared overload above the daily maximum plus the population variance of
/// hours across the grid's teaching days.
fn faculty_load(domain: &TermDomain, faculty: FacultyId, hours_on: impl Fn(Weekday) -> u16) -> f64 {
    let max = domain.faculty_member(faculty).max_hours_per_day;
    let days = domain.days();
    let n = days.len() as f64;

    let mut overload = 0.0;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for &day in days {
        let h = hours_on(day);
        let excess = h.saturating_sub(max) as f64;
        overload += excess * excess;
        sum += h as f64;
        sum_sq += (h as f64) * (h as f64);
    }
    if sum == 0.0 {
        return overload;
    }
    let mean = sum / n;
    overload + (sum_sq / n - mean * mean).max(0.0)
}

fn daily_load_penalty(domain: &TermDomain, placements: &[Placement]) -> f64 {
    let mut hours = vec![0u16; domain.faculty().len() * Weekday::COUNT];
    for p in placements {
        let day = domain.slot(p.slot).day;
        hours[p.faculty.index() * Weekday::COUNT + day.index()] += 1;
    }
    domain
        .faculty()
        .iter()
        .map(|f| {
            let row = f.id.index() * Weekday::COUNT;
            faculty_load(domain, f.id, |d| hours[row + d.index()])
        })
        .sum()
}

/// Idle slots between the first and last occupied slot of one day.
fn day_gaps(day_slots: &[SlotId], occupied: impl Fn(SlotId) -> bool) -> usize {
    let mut first = None;
    let mut last = 0;
    let mut count = 0;
    for (i, &slot) in day_slots.iter().enumerate() {
        if occupied(slot) {
            first.get_or_insert(i);
            last = i;
            count += 1;
        }
    }
    match first {
        Some(first) => last - first + 1 - count,
        None => 0,
    }
}

fn batch_gaps_penalty(domain: &TermDomain, placements: &[Placement]) -> f64 {
    let slot_count = domain.slots().len();
    let mut occupied = vec![false; domain.batches().len() * slot_count];
    for p in placements {
        for batch in domain.conflict_batches(p.section) {
            occupied[batch.index() * slot_count + p.slot.index()] = true;
        }
    }
    let mut gaps = 0;
    for batch in domain.batches() {
        let row = batch.id.index() * slot_count;
        for &day in domain.days() {
            gaps += day_gaps(domain.slots_on(day), |s| occupied[row + s.index()]);
        }
    }
    gaps as f64
}

/// A soft constraint with its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedConstraint {
    pub constraint: SoftConstraint,
    pub weight: f64,
}

/// The soft constraints a scorer prices, with their weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftConstraintSet {
    terms: Vec<WeightedConstraint>,
}

impl Default for SoftConstraintSet {
    fn default() -> Self {
        Self::from_weights(&WeightsConfig::default())
    }
}

impl SoftConstraintSet {
    /// Every soft constraint with the configured weights.
    pub fn from_weights(weights: &WeightsConfig) -> Self {
        let weight_of = |c: SoftConstraint| match c {
            SoftConstraint::TimeWindow => weights.time_window,
            SoftConstraint::DayPreference => weights.day_preference,
            SoftConstraint::DailyLoad => weights.daily_load,
            SoftConstraint::BatchGaps => weights.batch_gaps,
            SoftConstraint::RoomAffinity => weights.room_affinity,
        };
        Self {
            terms: SoftConstraint::ALL
                .into_iter()
                .map(|constraint| WeightedConstraint {
                    constraint,
                    weight: weight_of(constraint),
                })
                .collect(),
        }
    }

    /// Every soft constraint with weight 1.
    pub fn unweighted() -> Self {
        Self {
            terms: SoftConstraint::ALL
                .into_iter()
                .map(|constraint| WeightedConstraint {
                    constraint,
                    weight: 1.0,
                })
                .collect(),
        }
    }

    pub fn with_weight(mut self, constraint: SoftConstraint, weight: f64) -> Self {
        for term in &mut self.terms {
            if term.constraint == constraint {
                term.weight = weight;
            }
        }
        self
    }

    pub fn weight(&self, constraint: SoftConstraint) -> f64 {
        self.terms
            .iter()
            .find(|t| t.constraint == constraint)
            .map_or(0.0, |t| t.weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedConstraint> {
        self.terms.iter()
    }

    /// Weighted change in soft cost if `candidate` were added to the store.
    pub fn marginal(&self, store: &AssignmentStore<'_>, candidate: &Placement) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.weight != 0.0)
            .map(|t| t.weight * t.constraint.marginal(store, candidate))
            .sum()
    }

    /// Weighted soft cost of a set of placements.
    pub fn cost(&self, domain: &TermDomain, placements: &[Placement]) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.weight != 0.0)
            .map(|t| t.weight * t.constraint.penalty(domain, placements))
            .sum()
    }
}
