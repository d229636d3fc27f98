//! A mid-sized realistic term.
//!
//! Three branches with two year-batches each. Every batch takes four theory
//! courses of three hours and one two-hour lab on the default Mon-Sat grid.
//! Second-year CSE and ECE share an elective, and two students cross into
//! another branch's course.

use timetabler_core::{
    BatchSpec, CourseSpec, FacultySpec, RoomKind, RoomSpec, SectionSpec, StudentSpec,
    TermDomain, TermSpec, TimeOfDay, TimeWindow, Weekday,
};

const BRANCHES: [&str; 3] = ["CSE", "ECE", "ME"];
const YEARS: [u8; 2] = [1, 2];

/// The campus term as an unresolved specification.
pub fn campus_spec() -> TermSpec {
    let mut spec = TermSpec::new().with_name("campus");

    for (b, branch) in BRANCHES.iter().enumerate() {
        let mut theory = Vec::new();
        let mut labs = Vec::new();

        for year in YEARS {
            let batch = format!("{}-{}", branch.to_lowercase(), year);
            spec = spec.with_batch(BatchSpec::new(&batch, 40 + 5 * b as u32 + year as u32).with_branch(*branch));
            for n in 0..2 {
                spec = spec.with_student(StudentSpec::new(format!("{batch}-s{n}"), &batch));
            }

            for c in 1..=4 {
                let code = format!("{branch}{year}0{c}");
                spec = spec
                    .with_course(
                        CourseSpec::new(&code, RoomKind::Lecture)
                            .named(format!("{branch} course {year}.{c}"))
                            .with_branch(*branch)
                            .with_credits(3),
                    )
                    .with_section(
                        SectionSpec::new(format!("{code}-A"), &code, 3).with_batches([batch.as_str()]),
                    );
                theory.push(code);
            }

            let lab = format!("{branch}{year}9L");
            spec = spec
                .with_course(
                    CourseSpec::new(&lab, RoomKind::Lab)
                        .named(format!("{branch} lab {year}"))
                        .with_branch(*branch)
                        .with_credits(2),
                )
                .with_section(SectionSpec::new(format!("{lab}-A"), &lab, 2).with_batches([batch.as_str()]));
            labs.push(lab);
        }

        for f in 0..4 {
            let mut faculty = FacultySpec::new(format!("{}-f{f}", branch.to_lowercase()))
                .named(format!("{branch} faculty {f}"))
                .in_department(*branch)
                .qualified_for(theory.iter().map(String::as_str));
            if f < 2 {
                faculty = faculty.qualified_for(labs.iter().map(String::as_str));
            }
            match f {
                0 => {
                    faculty = faculty.with_preferred_window(TimeWindow::new(
                        TimeOfDay::hm(9, 0),
                        TimeOfDay::hm(13, 0),
                    ))
                }
                1 => {
                    faculty = faculty
                        .with_preferred_days(vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu])
                }
                _ => {}
            }
            spec = spec.with_faculty(faculty);
        }
    }

    spec = spec
        .with_course(
            CourseSpec::new("EL201", RoomKind::Lecture)
                .named("Signals and Systems for Computing")
                .with_credits(2),
        )
        .with_section(SectionSpec::new("EL201-A", "EL201", 2).with_batches(["cse-2", "ece-2"]))
        .with_faculty(
            FacultySpec::new("visiting")
                .named("Visiting lecturer")
                .qualified_for(["EL201"])
                .with_max_hours_per_day(2),
        )
        .with_enrollment("me-1-s0", "CSE101-A")
        .with_enrollment("ece-1-s1", "ME104-A");

    spec = spec
        .with_room(RoomSpec::new("H1", RoomKind::Lecture, 60).with_branch("CSE"))
        .with_room(RoomSpec::new("H2", RoomKind::Lecture, 60).with_branch("ECE"))
        .with_room(RoomSpec::new("H3", RoomKind::Lecture, 120))
        .with_room(RoomSpec::new("H4", RoomKind::Lecture, 80))
        .with_room(RoomSpec::new("LAB1", RoomKind::Lab, 60))
        .with_room(RoomSpec::new("LAB2", RoomKind::Lab, 60).with_branch("ME"));

    spec
}

/// The campus term, resolved.
pub fn campus() -> TermDomain {
    campus_spec()
        .into_domain()
        .expect("campus is a valid term")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campus_counts() {
        let domain = campus();
        let stats = domain.stats();
        assert_eq!(stats.sections, 31);
        assert_eq!(stats.weekly_hours, 6 * 14 + 2);
        assert_eq!(stats.faculty, 13);
        assert_eq!(stats.slots, 54);
        assert_eq!(stats.branches["CSE"].faculty, 4);
        assert_eq!(stats.branches["ME"].courses, 10);
    }

    #[test]
    fn test_cross_branch_enrollment_widens_conflicts() {
        let domain = campus();
        let section = domain.find_section("CSE101-A").unwrap();
        assert_eq!(domain.conflict_batches(section).len(), 2);
        assert_eq!(domain.headcount(section), 41 + 1);
    }
}
