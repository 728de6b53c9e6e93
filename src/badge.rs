use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::country::country_name;
use crate::error::ScheduleError;
use crate::schedule::{AgendaBuilder, EventIndex, PersonalAgenda};
use crate::wcif::{Competition, Person};

/// What to do when some of a person's assignments cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Drop the failing assignments and keep the rest of the agenda.
    #[default]
    SkipAssignment,
    /// Drop the person's badge entirely.
    SkipPerson,
    /// Stop generation with the first error.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip-assignment" => Ok(FailurePolicy::SkipAssignment),
            "skip-person" => Ok(FailurePolicy::SkipPerson),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailurePolicy::SkipAssignment => "skip-assignment",
            FailurePolicy::SkipPerson => "skip-person",
            FailurePolicy::Abort => "abort",
        })
    }
}

/// Everything printed on one participant's badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub registrant_id: Option<u32>,
    pub name: String,
    pub wca_id: String,
    pub country: String,
    pub guests: u32,
    pub agenda: PersonalAgenda,
    /// Legend entries such as `"C : Competitor"`.
    pub roles: BTreeSet<String>,
}

/// Data handed to the renderer: all badges of a competition plus the logo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BadgeSheet {
    pub competition: String,
    pub logo: Option<String>,
    pub badges: Vec<Badge>,
    /// Number of assignments dropped under `SkipAssignment`.
    pub skipped_assignments: usize,
    /// Accepted persons left out under `SkipPerson`.
    pub skipped_persons: Vec<String>,
}

impl BadgeSheet {
    /// Builds the event index once and a badge for every accepted person.
    pub fn generate(
        competition: &Competition,
        policy: FailurePolicy,
        logo: Option<String>,
    ) -> Result<Self, ScheduleError> {
        let index = EventIndex::build(&competition.schedule)?;
        Self::from_index(competition, &index, policy, logo)
    }

    /// Same as [`BadgeSheet::generate`] with an index built earlier from
    /// `competition.schedule`.
    pub fn from_index(
        competition: &Competition,
        index: &EventIndex,
        policy: FailurePolicy,
        logo: Option<String>,
    ) -> Result<Self, ScheduleError> {
        let mut sheet = build_badges(competition, index, policy)?;
        sheet.competition = competition.name.clone();
        sheet.logo = logo;
        Ok(sheet)
    }
}

/// Builds badges for accepted persons, ordered by registrant id.
///
/// The returned sheet has no competition name or logo; see
/// [`BadgeSheet::generate`].
pub fn build_badges(
    competition: &Competition,
    index: &EventIndex,
    policy: FailurePolicy,
) -> Result<BadgeSheet, ScheduleError> {
    let builder = AgendaBuilder::new(index);
    let mut sheet = BadgeSheet::default();

    let mut accepted: Vec<&Person> = competition.persons.iter().filter(|p| p.is_accepted()).collect();
    accepted.sort_by_key(|p| (p.registrant_id.is_none(), p.registrant_id));

    for person in accepted {
        let build = builder.build(&person.name, &person.assignments);

        if let Some(first) = build.errors.first() {
            match policy {
                FailurePolicy::Abort => return Err(first.clone()),
                FailurePolicy::SkipPerson => {
                    tracing::warn!(
                        person = %person.name,
                        errors = build.errors.len(),
                        error = %first,
                        "Skipping badge"
                    );
                    sheet.skipped_persons.push(person.name.clone());
                    continue;
                }
                FailurePolicy::SkipAssignment => {
                    for err in &build.errors {
                        tracing::warn!(person = %person.name, error = %err, "Skipping assignment");
                    }
                    sheet.skipped_assignments += build.errors.len();
                }
            }
        }

        sheet.badges.push(Badge {
            registrant_id: person.registrant_id,
            name: person.name.clone(),
            wca_id: person.wca_id_label().to_string(),
            country: country_name(&person.country_iso2),
            guests: person.guests(),
            roles: build.role_legends(),
            agenda: build.agenda,
        });
    }

    tracing::info!(
        badges = sheet.badges.len(),
        skipped_persons = sheet.skipped_persons.len(),
        skipped_assignments = sheet.skipped_assignments,
        "Badges built"
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_config_values() {
        assert_eq!("skip-person".parse::<FailurePolicy>(), Ok(FailurePolicy::SkipPerson));
        assert_eq!(" Abort ".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert!("ignore".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default().to_string(), "skip-assignment");
    }
}
