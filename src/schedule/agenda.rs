use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::index::EventIndex;
use super::roles::Role;
use crate::error::ScheduleError;
use crate::wcif::Assignment;

/// One line of a personal agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaEntry {
    /// Local time of day, `HH:MM`.
    pub time: String,
    pub event: String,
    /// Role abbreviation letter.
    pub role: &'static str,
}

/// Entries of one day keyed by their localized start instant.
pub type DayAgenda = BTreeMap<DateTime<FixedOffset>, AgendaEntry>;

/// A person's schedule grouped by weekday name.
///
/// Days are ordered by name as strings, so "Friday" comes before "Monday".
/// Within a day entries are ordered by instant, and an entry starting at the
/// same instant as an earlier one replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonalAgenda {
    days: BTreeMap<String, DayAgenda>,
}

impl PersonalAgenda {
    fn insert(&mut self, weekday: String, start: DateTime<FixedOffset>, entry: AgendaEntry) {
        self.days.entry(weekday).or_default().insert(start, entry);
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, &DayAgenda)> {
        self.days.iter().map(|(day, entries)| (day.as_str(), entries))
    }

    pub fn day(&self, weekday: &str) -> Option<&DayAgenda> {
        self.days.get(weekday)
    }

    pub fn weekdays(&self) -> Vec<&str> {
        self.days.keys().map(String::as_str).collect()
    }

    /// Total number of entries across all days.
    pub fn len(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// An assignment joined with its activity and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAssignment {
    pub start: DateTime<FixedOffset>,
    pub weekday: String,
    pub role: Role,
    pub entry: AgendaEntry,
}

/// Output of one person's agenda build.
///
/// `agenda` and `roles` cover only the assignments that resolved; the rest
/// are reported in `errors` in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaBuild {
    pub agenda: PersonalAgenda,
    pub roles: BTreeSet<Role>,
    pub errors: Vec<ScheduleError>,
}

impl AgendaBuild {
    /// Role legend strings for the badge, e.g. `"C : Competitor"`.
    pub fn role_legends(&self) -> BTreeSet<String> {
        self.roles.iter().map(|role| role.legend()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Builds personal agendas against a shared event index.
#[derive(Debug, Clone, Copy)]
pub struct AgendaBuilder<'a> {
    index: &'a EventIndex,
}

impl<'a> AgendaBuilder<'a> {
    pub fn new(index: &'a EventIndex) -> Self {
        Self { index }
    }

    /// Resolves a single assignment. `person` is only used for error context.
    pub fn resolve(&self, person: &str, assignment: &Assignment) -> Result<ResolvedAssignment, ScheduleError> {
        let activity = self
            .index
            .get(&assignment.activity_id)
            .ok_or_else(|| ScheduleError::UnresolvedActivity {
                activity_id: assignment.activity_id.clone(),
                person: person.to_string(),
            })?;

        let role = Role::from_code(&assignment.assignment_code).ok_or_else(|| {
            ScheduleError::UnknownRoleCode {
                code: assignment.assignment_code.clone(),
                person: person.to_string(),
            }
        })?;

        Ok(ResolvedAssignment {
            start: activity.start,
            weekday: activity.start.format("%A").to_string(),
            role,
            entry: AgendaEntry {
                time: activity.start.format("%H:%M").to_string(),
                event: activity.name.clone(),
                role: role.abbreviation(),
            },
        })
    }

    /// Builds the agenda for one person, collecting per-assignment failures
    /// instead of stopping at the first one.
    pub fn build(&self, person: &str, assignments: &[Assignment]) -> AgendaBuild {
        let mut build = AgendaBuild::default();

        for assignment in assignments {
            match self.resolve(person, assignment) {
                Ok(resolved) => {
                    build.roles.insert(resolved.role);
                    build.agenda.insert(resolved.weekday, resolved.start, resolved.entry);
                }
                Err(err) => {
                    tracing::debug!(person, error = %err, "Assignment not resolved");
                    build.errors.push(err);
                }
            }
        }

        build
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::index::IndexedActivity;
    use crate::wcif::ActivityId;

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    fn index() -> EventIndex {
        [
            ("a1", "Round 1", "2023-01-02T09:00:00+00:00"),
            ("a2", "Round 2", "2023-01-02T14:00:00+00:00"),
        ]
        .into_iter()
        .map(|(id, name, start)| {
            (
                ActivityId::from(id),
                IndexedActivity { name: name.to_string(), start: at(start) },
            )
        })
        .collect()
    }

    #[test]
    fn resolve_formats_time_and_weekday() {
        let index = index();
        let resolved = AgendaBuilder::new(&index)
            .resolve("Ada", &Assignment::new("a2", "staff-scrambler"))
            .unwrap();
        assert_eq!(resolved.weekday, "Monday");
        assert_eq!(resolved.role, Role::Scrambler);
        assert_eq!(
            resolved.entry,
            AgendaEntry { time: "14:00".into(), event: "Round 2".into(), role: "S" }
        );
    }

    #[test]
    fn missing_activity_is_checked_before_role() {
        let index = index();
        let err = AgendaBuilder::new(&index)
            .resolve("Ada", &Assignment::new("zz", "not-a-role"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::UnresolvedActivity { .. }));
    }

    #[test]
    fn same_instant_keeps_the_later_assignment() {
        let index = index();
        let build = AgendaBuilder::new(&index).build(
            "Ada",
            &[Assignment::new("a1", "competitor"), Assignment::new("a1", "staff-judge")],
        );
        let monday = build.agenda.day("Monday").unwrap();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday.values().next().unwrap().role, "J");
        assert_eq!(build.roles.len(), 2);
    }

    #[test]
    fn empty_assignments_give_empty_agenda() {
        let index = index();
        let build = AgendaBuilder::new(&index).build("Ada", &[]);
        assert!(build.agenda.is_empty());
        assert!(build.roles.is_empty());
        assert!(build.is_complete());
    }
}
