use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Registration status that qualifies a person for a badge.
pub const STATUS_ACCEPTED: &str = "accepted";

/// Identifier of a scheduled activity.
///
/// Exports use integer ids; hand-written documents often use strings.
/// Integers order numerically and sort before any string id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityId::Numeric(id) => write!(f, "{}", id),
            ActivityId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ActivityId {
    fn from(id: u64) -> Self {
        ActivityId::Numeric(id)
    }
}

impl From<&str> for ActivityId {
    fn from(id: &str) -> Self {
        ActivityId::Text(id.to_string())
    }
}

/// Top level of a competition export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub persons: Vec<Person>,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub registrant_id: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub wca_id: Option<String>,
    #[serde(default)]
    pub country_iso2: String,
    #[serde(default)]
    pub registration: Option<Registration>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Person {
    pub fn is_accepted(&self) -> bool {
        self.registration
            .as_ref()
            .is_some_and(|r| r.status == STATUS_ACCEPTED)
    }

    pub fn guests(&self) -> u32 {
        self.registration.as_ref().map_or(0, |r| r.guests)
    }

    /// WCA id as printed on badges; newcomers show "None".
    pub fn wca_id_label(&self) -> &str {
        match self.wca_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => "None",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub status: String,
    #[serde(default)]
    pub guests: u32,
}

/// A person's allocation to a role during one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub activity_id: ActivityId,
    pub assignment_code: String,
}

impl Assignment {
    pub fn new(activity_id: impl Into<ActivityId>, assignment_code: &str) -> Self {
        Self {
            activity_id: activity_id.into(),
            assignment_code: assignment_code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub number_of_days: Option<u32>,
    #[serde(default)]
    pub venues: Vec<Venue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    pub timezone: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// A scheduled activity. Children have the same shape; only one level of
/// nesting is walked when indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    #[serde(default)]
    pub activity_code: Option<String>,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub child_activities: Vec<Activity>,
}

/// Parses a competition export from raw JSON bytes.
pub fn parse_competition(bytes: &[u8]) -> Result<Competition, InputError> {
    let competition: Competition = serde_json::from_slice(bytes)?;
    tracing::debug!(
        persons = competition.persons.len(),
        venues = competition.schedule.venues.len(),
        "Parsed competition export"
    );
    Ok(competition)
}

/// Loads a competition export from a JSON file.
pub fn load_competition<P: AsRef<Path>>(path: P) -> Result<Competition, InputError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_competition(&bytes)
}
