use crate::domain::{
    BatchSpec, CourseSpec, EntityKind, FacultySpec, RoomKind, RoomSpec, SectionSpec, SlotGrid,
    StudentSpec, TermSpec, TimeOfDay, TimeWindow, Weekday,
};
use crate::error::LoadError;

fn small_term() -> TermSpec {
    TermSpec::new()
        .with_name("autumn")
        .with_course(CourseSpec::new("CS101", RoomKind::Lecture).with_branch("CSE"))
        .with_course(CourseSpec::new("CS101L", RoomKind::Lab).with_branch("CSE"))
        .with_faculty(
            FacultySpec::new("ada")
                .in_department("CSE")
                .qualified_for(["CS101", "CS101L"]),
        )
        .with_faculty(FacultySpec::new("bob").qualified_for(["CS101"]))
        .with_faculty(FacultySpec::new("cy"))
        .with_room(RoomSpec::new("R1", RoomKind::Lecture, 60).with_branch("CSE"))
        .with_room(RoomSpec::new("R2", RoomKind::Lecture, 20))
        .with_room(RoomSpec::new("L1", RoomKind::Lab, 40))
        .with_batch(BatchSpec::new("cse-1", 30).with_branch("CSE"))
        .with_batch(BatchSpec::new("ece-1", 25).with_branch("ECE"))
        .with_student(StudentSpec::new("s1", "cse-1"))
        .with_student(StudentSpec::new("s2", "ece-1"))
        .with_section(SectionSpec::new("CS101-A", "CS101", 3).with_batches(["cse-1"]))
        .with_section(
            SectionSpec::new("CS101L-A", "CS101L", 2)
                .with_batches(["cse-1"])
                .with_faculty(["ada", "cy"]),
        )
}

#[test]
fn test_load_resolves_entities() {
    let domain = small_term().into_domain().unwrap();
    assert_eq!(domain.name(), Some("autumn"));
    assert_eq!(domain.sections().len(), 2);
    assert_eq!(domain.slots().len(), 54);
    assert_eq!(domain.days().len(), 6);
    assert_eq!(domain.total_weekly_hours(), 5);

    let section = domain.find_section("CS101-A").unwrap();
    assert_eq!(domain.section_course(section).code, "CS101");
    assert_eq!(domain.find_room("L1").map(|r| domain.room(r).kind), Some(RoomKind::Lab));
    assert!(domain.find_faculty("nobody").is_none());
}

#[test]
fn test_qualified_faculty_intersects_candidates() {
    let domain = small_term().into_domain().unwrap();
    let lecture = domain.find_section("CS101-A").unwrap();
    let lab = domain.find_section("CS101L-A").unwrap();
    let ada = domain.find_faculty("ada").unwrap();
    let bob = domain.find_faculty("bob").unwrap();

    assert_eq!(domain.qualified_faculty(lecture), &[ada, bob]);
    // cy is a candidate but not qualified for the lab
    assert_eq!(domain.qualified_faculty(lab), &[ada]);
    assert_eq!(domain.sections_for_faculty(ada), &[lecture, lab]);
    assert_eq!(domain.sections_for_faculty(bob), &[lecture]);
}

#[test]
fn test_compatible_rooms_check_kind_and_capacity() {
    let domain = small_term().into_domain().unwrap();
    let lecture = domain.find_section("CS101-A").unwrap();
    let lab = domain.find_section("CS101L-A").unwrap();

    assert_eq!(domain.headcount(lecture), 30);
    assert_eq!(domain.compatible_rooms(lecture), &[domain.find_room("R1").unwrap()]);
    assert_eq!(domain.compatible_rooms(lab), &[domain.find_room("L1").unwrap()]);
}

#[test]
fn test_enrollment_adds_conflict_batch_and_headcount() {
    let domain = small_term()
        .with_enrollment("s2", "CS101-A")
        .with_enrollment("s2", "CS101-A")
        .into_domain()
        .unwrap();
    let lecture = domain.find_section("CS101-A").unwrap();
    let cse = domain.find_batch("cse-1").unwrap();
    let ece = domain.find_batch("ece-1").unwrap();
    let s1 = domain.find_student("s1").unwrap();
    let s2 = domain.find_student("s2").unwrap();

    assert_eq!(domain.enrollments().len(), 1);
    assert_eq!(domain.conflict_batches(lecture), &[cse, ece]);
    assert_eq!(domain.headcount(lecture), 31);
    assert_eq!(domain.sections_for_batch(ece), &[lecture]);
    assert_eq!(domain.sections_for_student(s2), &[lecture]);
    assert_eq!(domain.sections_for_student(s1).len(), 2);
}

#[test]
fn test_slots_on_day() {
    let domain = small_term().into_domain().unwrap();
    let wed = domain.slots_on(Weekday::Wed);
    assert_eq!(wed.len(), 9);
    assert!(wed
        .windows(2)
        .all(|w| domain.slot(w[0]).start < domain.slot(w[1]).start));
}

#[test]
fn test_stats_per_branch() {
    let domain = small_term().into_domain().unwrap();
    let stats = domain.stats();
    assert_eq!(stats.students, 2);
    assert_eq!(stats.faculty, 3);
    assert_eq!(stats.rooms, 3);
    assert_eq!(stats.weekly_hours, 5);

    let cse = &stats.branches["CSE"];
    assert_eq!(cse.students, 1);
    assert_eq!(cse.faculty, 1);
    assert_eq!(cse.courses, 2);
    assert_eq!(stats.branches["ECE"].students, 1);
}

#[test]
fn test_duplicate_key_rejected() {
    let err = small_term()
        .with_room(RoomSpec::new("R1", RoomKind::Lab, 10))
        .into_domain()
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::DuplicateKey { kind: EntityKind::Room, ref key } if key == "R1"
    ));
}

#[test]
fn test_unknown_reference_rejected() {
    let err = small_term()
        .with_section(SectionSpec::new("X-A", "X999", 2))
        .into_domain()
        .unwrap_err();
    match err {
        LoadError::UnknownReference {
            kind,
            key,
            referenced_kind,
            referenced,
        } => {
            assert_eq!(kind, EntityKind::Section);
            assert_eq!(key, "X-A");
            assert_eq!(referenced_kind, EntityKind::Course);
            assert_eq!(referenced, "X999");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_enrollment_student_rejected() {
    let err = small_term()
        .with_enrollment("ghost", "CS101-A")
        .into_domain()
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::UnknownReference { referenced_kind: EntityKind::Student, .. }
    ));
}

#[test]
fn test_zero_hours_rejected() {
    let err = small_term()
        .with_section(SectionSpec::new("CS101-B", "CS101", 0))
        .into_domain()
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidValue { kind: EntityKind::Section, .. }));
}

#[test]
fn test_empty_preference_window_rejected() {
    let window = TimeWindow::new(TimeOfDay::hm(12, 0), TimeOfDay::hm(9, 0));
    let err = small_term()
        .with_faculty(FacultySpec::new("dee").with_preferred_window(window))
        .into_domain()
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidValue { kind: EntityKind::Faculty, .. }));
}

#[test]
fn test_empty_grid_rejected() {
    let grid = SlotGrid::new(Vec::new(), TimeOfDay::hm(8, 0), TimeOfDay::hm(9, 0));
    let err = small_term().with_slot_grid(grid).into_domain().unwrap_err();
    assert!(matches!(err, LoadError::EmptySlotGrid));
}

#[test]
fn test_inverted_grid_rejected() {
    let grid = SlotGrid::new(vec![Weekday::Mon], TimeOfDay::hm(18, 0), TimeOfDay::hm(8, 0));
    let err = small_term().with_slot_grid(grid).into_domain().unwrap_err();
    assert!(matches!(err, LoadError::InvalidValue { kind: EntityKind::SlotGrid, .. }));
}

#[test]
fn test_load_from_json() {
    let json = r#"{
        "courses": [{"code": "MA201", "name": "Linear Algebra", "type": "theory"}],
        "faculty": [{"key": "f1", "qualified_courses": ["MA201"], "preferred_days": ["monday", "tue"]}],
        "rooms": [{"key": "H1", "room_type": "lecture_hall", "capacity": 80}],
        "batches": [{"key": "b1", "size": 50}],
        "sections": [{"key": "MA201-A", "course": "MA201", "weekly_hours": 4, "batches": ["b1"]}]
    }"#;
    let domain = TermSpec::from_json_str(json).unwrap().into_domain().unwrap();
    let f1 = domain.find_faculty("f1").unwrap();
    assert_eq!(domain.faculty_member(f1).max_hours_per_day, 4);
    assert_eq!(
        domain.faculty_member(f1).preferred_days,
        vec![Weekday::Mon, Weekday::Tue]
    );
    assert_eq!(domain.headcount(domain.find_section("MA201-A").unwrap()), 50);
}

#[test]
fn test_bad_json_is_load_error() {
    assert!(matches!(
        TermSpec::from_json_str("{\"courses\": 3}"),
        Err(LoadError::Json(_))
    ));
}
