//! Sections no search can place.

use tracing::debug;

use timetabler_core::{SectionId, TermDomain};

use crate::generator::UnresolvedReason;

/// Why `section` cannot be placed in any schedule, if it cannot.
pub fn static_infeasibility(domain: &TermDomain, section: SectionId) -> Option<UnresolvedReason> {
    if domain.compatible_rooms(section).is_empty() {
        Some(UnresolvedReason::NoCompatibleRoom)
    } else if domain.qualified_faculty(section).is_empty() {
        Some(UnresolvedReason::NoQualifiedFaculty)
    } else if domain.section(section).weekly_hours as usize > domain.slots().len() {
        Some(UnresolvedReason::NotEnoughSlots)
    } else {
        None
    }
}

/// Every statically infeasible section with its reason, in section order.
pub fn infeasible_sections(domain: &TermDomain) -> Vec<(SectionId, UnresolvedReason)> {
    let found: Vec<(SectionId, UnresolvedReason)> = domain
        .sections()
        .iter()
        .filter_map(|s| static_infeasibility(domain, s.id).map(|reason| (s.id, reason)))
        .collect();
    for (section, reason) in &found {
        debug!(
            event = "section_infeasible",
            section = %domain.section(*section).key,
            reason = %reason,
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetabler_core::{CourseSpec, FacultySpec, RoomKind, RoomSpec, SectionSpec, TermSpec};

    fn term(room_capacity: u32, hours: u16, qualified: bool) -> TermDomain {
        let mut faculty = FacultySpec::new("f");
        if qualified {
            faculty = faculty.qualified_for(["C1"]);
        }
        TermSpec::new()
            .with_course(CourseSpec::new("C1", RoomKind::Lecture))
            .with_section(SectionSpec::new("C1-A", "C1", hours))
            .with_faculty(faculty)
            .with_room(RoomSpec::new("R", RoomKind::Lecture, room_capacity))
            .into_domain()
            .unwrap()
    }

    #[test]
    fn test_feasible_section() {
        let domain = term(30, 3, true);
        assert_eq!(static_infeasibility(&domain, SectionId(0)), None);
        assert!(infeasible_sections(&domain).is_empty());
    }

    #[test]
    fn test_no_qualified_faculty() {
        let domain = term(30, 3, false);
        assert_eq!(
            static_infeasibility(&domain, SectionId(0)),
            Some(UnresolvedReason::NoQualifiedFaculty)
        );
    }

    #[test]
    fn test_more_hours_than_slots() {
        let domain = term(30, 60, true);
        assert_eq!(
            infeasible_sections(&domain),
            vec![(SectionId(0), UnresolvedReason::NotEnoughSlots)]
        );
    }
}
