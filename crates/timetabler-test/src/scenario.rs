//! The small acceptance scenarios.
//!
//! Every scenario uses a single teaching day so its slot ids are easy to
//! reason about: slot `i` is the `i`-th period of Monday.

use timetabler_core::{
    BatchSpec, CourseSpec, FacultySpec, RoomKind, RoomSpec, SectionSpec, SlotGrid, TermDomain,
    TermSpec, TimeOfDay, TimeWindow, Weekday,
};

fn monday(start: u8, end: u8) -> SlotGrid {
    SlotGrid::new(
        vec![Weekday::Mon],
        TimeOfDay::hm(start, 0),
        TimeOfDay::hm(end, 0),
    )
}

/// One 2-hour section, one qualified faculty member, one compatible room,
/// three slots (Mon 09:00, 10:00, 11:00).
pub fn scenario_a_spec() -> TermSpec {
    TermSpec::new()
        .with_name("scenario-a")
        .with_slot_grid(monday(9, 12))
        .with_course(CourseSpec::new("CS101", RoomKind::Lecture).named("Programming"))
        .with_faculty(FacultySpec::new("ada").qualified_for(["CS101"]))
        .with_room(RoomSpec::new("R1", RoomKind::Lecture, 40))
        .with_batch(BatchSpec::new("cse-1", 30))
        .with_section(SectionSpec::new("CS101-A", "CS101", 2).with_batches(["cse-1"]))
}

pub fn scenario_a() -> TermDomain {
    scenario_a_spec()
        .into_domain()
        .expect("scenario A is a valid term")
}

/// Two 1-hour sections attended by the same batch and a single slot
/// (Mon 09:00). Rooms and faculty are plentiful; only the batch clashes.
pub fn scenario_b_spec() -> TermSpec {
    TermSpec::new()
        .with_name("scenario-b")
        .with_slot_grid(monday(9, 10))
        .with_course(CourseSpec::new("MA101", RoomKind::Lecture))
        .with_course(CourseSpec::new("PH101", RoomKind::Lecture))
        .with_faculty(FacultySpec::new("gauss").qualified_for(["MA101"]))
        .with_faculty(FacultySpec::new("curie").qualified_for(["PH101"]))
        .with_room(RoomSpec::new("R1", RoomKind::Lecture, 60))
        .with_room(RoomSpec::new("R2", RoomKind::Lecture, 60))
        .with_batch(BatchSpec::new("sci-1", 50))
        .with_section(SectionSpec::new("MA101-A", "MA101", 1).with_batches(["sci-1"]))
        .with_section(SectionSpec::new("PH101-A", "PH101", 1).with_batches(["sci-1"]))
}

pub fn scenario_b() -> TermDomain {
    scenario_b_spec()
        .into_domain()
        .expect("scenario B is a valid term")
}

/// One 1-hour section whose only faculty member prefers 09:00-12:00. The
/// grid has exactly two slots, Mon 09:00 and Mon 16:00.
pub fn scenario_c_spec() -> TermSpec {
    let morning = TimeWindow::new(TimeOfDay::hm(9, 0), TimeOfDay::hm(12, 0));
    let gap = TimeWindow::new(TimeOfDay::hm(10, 0), TimeOfDay::hm(16, 0));
    TermSpec::new()
        .with_name("scenario-c")
        .with_slot_grid(monday(9, 17).with_break(gap))
        .with_course(CourseSpec::new("EE201", RoomKind::Lecture))
        .with_faculty(
            FacultySpec::new("tesla")
                .qualified_for(["EE201"])
                .with_preferred_window(morning),
        )
        .with_room(RoomSpec::new("R1", RoomKind::Lecture, 40))
        .with_batch(BatchSpec::new("ece-2", 35))
        .with_section(SectionSpec::new("EE201-A", "EE201", 1).with_batches(["ece-2"]))
}

pub fn scenario_c() -> TermDomain {
    scenario_c_spec()
        .into_domain()
        .expect("scenario C is a valid term")
}

/// `sections` 1-hour sections of one course attended by a single batch,
/// with one slot fewer than sections (Mon from 09:00). Three rooms and three
/// faculty members fit every section; only the batch runs out of slots.
pub fn oversubscribed_batch_spec(sections: u8) -> TermSpec {
    let slots = sections.saturating_sub(1).max(1);
    let mut spec = TermSpec::new()
        .with_name("oversubscribed-batch")
        .with_slot_grid(monday(9, 9 + slots))
        .with_course(CourseSpec::new("GE101", RoomKind::Lecture))
        .with_batch(BatchSpec::new("gen-1", 40));
    for key in ["R1", "R2", "R3"] {
        spec = spec.with_room(RoomSpec::new(key, RoomKind::Lecture, 60));
    }
    for key in ["hopper", "lovelace", "turing"] {
        spec = spec.with_faculty(FacultySpec::new(key).qualified_for(["GE101"]));
    }
    for i in 0..sections {
        spec = spec.with_section(
            SectionSpec::new(format!("GE101-{i}"), "GE101", 1).with_batches(["gen-1"]),
        );
    }
    spec
}

pub fn oversubscribed_batch(sections: u8) -> TermDomain {
    oversubscribed_batch_spec(sections)
        .into_domain()
        .expect("an oversubscribed batch is a valid term")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_shapes() {
        assert_eq!(scenario_a().slots().len(), 3);
        assert_eq!(scenario_b().slots().len(), 1);

        let c = scenario_c();
        let starts: Vec<_> = c.slots().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![TimeOfDay::hm(9, 0), TimeOfDay::hm(16, 0)]);

        let pigeonhole = oversubscribed_batch(6);
        assert_eq!(pigeonhole.sections().len(), 6);
        assert_eq!(pigeonhole.slots().len(), 5);
    }
}
