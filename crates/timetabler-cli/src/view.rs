//! Per-person and per-room slices of a schedule.

use std::str::FromStr;

use timetabler::{entries_of, Placement, Schedule, TermDomain, TimetableEntry};

use crate::error::CliError;

/// Whose timetable to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Faculty(String),
    Room(String),
    Batch(String),
    Student(String),
}

impl FromStr for View {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, key) = s
            .split_once(':')
            .filter(|(_, key)| !key.is_empty())
            .ok_or_else(|| CliError::InvalidView(s.to_string()))?;
        let key = key.to_string();
        match kind {
            "faculty" => Ok(View::Faculty(key)),
            "room" => Ok(View::Room(key)),
            "batch" => Ok(View::Batch(key)),
            "student" => Ok(View::Student(key)),
            _ => Err(CliError::InvalidView(s.to_string())),
        }
    }
}

impl View {
    /// Rows of `schedule` that belong to this view.
    pub fn entries(
        &self,
        domain: &TermDomain,
        schedule: &Schedule,
    ) -> Result<Vec<TimetableEntry>, CliError> {
        let placements: Vec<&Placement> = match self {
            View::Faculty(key) => {
                let id = domain
                    .find_faculty(key)
                    .ok_or_else(|| unknown("faculty", key))?;
                schedule.for_faculty(id).collect()
            }
            View::Room(key) => {
                let id = domain.find_room(key).ok_or_else(|| unknown("room", key))?;
                schedule.for_room(id).collect()
            }
            View::Batch(key) => {
                let id = domain.find_batch(key).ok_or_else(|| unknown("batch", key))?;
                schedule.for_batch(domain, id).collect()
            }
            View::Student(key) => {
                let id = domain
                    .find_student(key)
                    .ok_or_else(|| unknown("student", key))?;
                schedule.for_student(domain, id).collect()
            }
        };
        Ok(entries_of(domain, placements))
    }
}

fn unknown(kind: &'static str, key: &str) -> CliError {
    CliError::UnknownKey {
        kind,
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_views() {
        assert_eq!(
            "faculty:ada".parse::<View>().unwrap(),
            View::Faculty("ada".to_string())
        );
        assert_eq!(
            "room:R1".parse::<View>().unwrap(),
            View::Room("R1".to_string())
        );
        assert!("teacher:ada".parse::<View>().is_err());
        assert!("faculty:".parse::<View>().is_err());
        assert!("ada".parse::<View>().is_err());
    }

    #[test]
    fn test_view_filters_schedule() {
        let domain = timetabler_test::scenario_b();
        let faculty = domain.find_faculty("gauss").unwrap();
        let section = domain.find_section("MA101-A").unwrap();
        let room = domain.compatible_rooms(section)[0];
        let slot = domain.slots()[0].id;
        let placement = Placement::new(section, slot, room, faculty);
        let schedule = Schedule::from_placements(vec![placement]);

        let rows = View::Faculty("gauss".to_string())
            .entries(&domain, &schedule)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].section, "MA101-A");

        let rows = View::Faculty("curie".to_string())
            .entries(&domain, &schedule)
            .unwrap();
        assert!(rows.is_empty());

        assert!(View::Room("nowhere".to_string())
            .entries(&domain, &schedule)
            .is_err());
    }
}
