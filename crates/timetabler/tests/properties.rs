//! Whole-engine properties checked through the public facade.

use std::collections::HashSet;
use std::sync::Arc;

use timetabler::prelude::*;
use timetabler::{
    audit, ChannelProgressListener, ProgressEvent, Scorer, SectionId, SlotId, UnresolvedReason,
};

fn config(seed: u64) -> GeneratorConfig {
    GeneratorConfig::new()
        .with_random_seed(seed)
        .with_node_limit(50_000)
        .with_thread_count(ThreadCount::None)
}

fn generate(domain: &TermDomain, config: GeneratorConfig) -> GenerationResult {
    TimetableGenerator::new(config).unwrap().generate(domain)
}

#[test]
fn no_room_faculty_or_batch_is_double_booked() {
    let domain = timetabler_test::campus();
    for seed in [1, 2, 3] {
        let result = generate(&domain, config(seed).with_restart_count(2));
        assert!(audit(&domain, &result.schedule).is_empty());

        let placements = result.schedule.placements();
        let mut rooms = HashSet::new();
        let mut faculty = HashSet::new();
        let mut batches = HashSet::new();
        for p in placements {
            assert!(rooms.insert((p.room, p.slot)));
            assert!(faculty.insert((p.faculty, p.slot)));
            for &batch in domain.conflict_batches(p.section) {
                assert!(batches.insert((batch, p.slot)));
            }
        }
    }
}

#[test]
fn resolved_sections_get_exact_weekly_hours() {
    let domain = timetabler_test::campus();
    let result = generate(&domain, config(11));

    let unresolved: HashSet<SectionId> = result
        .unresolved_sections
        .iter()
        .map(|u| u.section)
        .collect();
    for section in domain.sections() {
        if !unresolved.contains(&section.id) {
            assert_eq!(
                result.schedule.hours_for(section.id),
                section.weekly_hours as usize,
                "section {}",
                section.key
            );
        }
    }
}

#[test]
fn same_seed_gives_same_schedule() {
    let domain = timetabler_test::campus();
    let first = generate(&domain, config(99));
    let second = generate(&domain, config(99));

    assert_eq!(first.schedule, second.schedule);
    assert_eq!(first.cost(), second.cost());
}

#[test]
fn best_cost_so_far_never_increases() {
    let domain = timetabler_test::campus();
    let (listener, mut events) = ChannelProgressListener::channel();
    TimetableGenerator::new(config(5).with_restart_count(6))
        .unwrap()
        .with_listener(Arc::new(listener))
        .generate(&domain);

    let mut best = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ProgressEvent::RestartCompleted { best_cost, cost, .. } = event {
            assert!(best_cost <= cost);
            best.push(best_cost);
        }
    }
    assert_eq!(best.len(), 6);
    assert!(best.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn scenario_a_places_two_distinct_slots() {
    let domain = timetabler_test::scenario_a();
    let result = generate(&domain, config(1));

    assert!(result.is_complete());
    assert_eq!(result.schedule.len(), 2);
    let slots: HashSet<SlotId> = result.schedule.iter().map(|p| p.slot).collect();
    assert_eq!(slots.len(), 2);
}

#[test]
fn scenario_b_leaves_one_section_unresolved() {
    let domain = timetabler_test::scenario_b();
    let result = generate(&domain, config(1));

    assert_eq!(result.schedule.len(), 1);
    assert_eq!(result.unresolved_sections.len(), 1);
    assert_eq!(
        result.unresolved_sections[0].reason,
        UnresolvedReason::SearchExhausted
    );
}

#[test]
fn scenario_c_prefers_the_morning_slot() {
    let domain = timetabler_test::scenario_c();
    let section = SectionId(0);
    let room = domain.compatible_rooms(section)[0];
    let faculty = domain.qualified_faculty(section)[0];
    let scorer = Scorer::default();

    let at = |slot| {
        let placement = Placement::new(section, slot, room, faculty);
        scorer
            .score(&domain, &Schedule::from_placements(vec![placement]))
            .cost
    };
    assert!(at(SlotId(0)) < at(SlotId(1)));

    let result = generate(&domain, config(1));
    assert_eq!(result.schedule.placements()[0].slot, SlotId(0));
}

#[test]
fn scenario_d_zero_budget_returns_immediately() {
    let domain = timetabler_test::campus();
    let result = generate(&domain, config(1).with_node_limit(0));

    assert!(result.budget_exceeded);
    assert!(result.schedule.is_empty());
    assert_eq!(result.unresolved_sections.len(), domain.sections().len());
}
