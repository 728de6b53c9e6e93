use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Serialize;

use super::zone::VenueZone;
use crate::error::ScheduleError;
use crate::wcif::{Activity, ActivityId, Schedule};

/// ISO-8601 extended and basic forms carrying a UTC offset. A trailing `Z`
/// is rewritten to `+00:00` before these are tried.
const OFFSET_FORMATS: [&str; 12] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y%m%dT%H%M%S%.f%:z",
    "%Y%m%dT%H%M%S%.f%z",
    "%Y%m%dT%H%M%S%.f%#z",
    "%Y%m%dT%H%M%:z",
    "%Y%m%dT%H%M%z",
    "%Y%m%dT%H%M%#z",
];

/// ISO-8601 forms without a UTC offset, read as venue wall-clock time.
const WALL_CLOCK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// A resolved activity: display name and start instant in venue-local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedActivity {
    pub name: String,
    pub start: DateTime<FixedOffset>,
}

/// Flat lookup from activity id to resolved activity, built once per
/// schedule and shared read-only by every per-person agenda build.
///
/// Iteration is ordered by id, which carries no scheduling meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventIndex {
    events: BTreeMap<ActivityId, IndexedActivity>,
}

impl EventIndex {
    /// Flattens venues → rooms → activities → child activities.
    ///
    /// Fails on the first unknown venue timezone or unparseable start time;
    /// no partial index is returned.
    pub fn build(schedule: &Schedule) -> Result<Self, ScheduleError> {
        let mut index = EventIndex::default();

        for venue in &schedule.venues {
            let zone = VenueZone::resolve(&venue.timezone)?;
            for room in &venue.rooms {
                for activity in &room.activities {
                    index.insert_activity(activity, zone)?;
                    for child in &activity.child_activities {
                        index.insert_activity(child, zone)?;
                    }
                }
            }
        }

        tracing::debug!(activities = index.len(), "Built event index");
        Ok(index)
    }

    fn insert_activity(&mut self, activity: &Activity, zone: VenueZone) -> Result<(), ScheduleError> {
        let start = parse_start_time(&activity.start_time, zone, &activity.id)?;
        self.insert(
            activity.id.clone(),
            IndexedActivity {
                name: activity.name.clone(),
                start,
            },
        );
        Ok(())
    }

    /// Adds an entry. A repeated id replaces the earlier entry
    /// (last write wins); ids are expected to be unique per export.
    pub fn insert(&mut self, id: ActivityId, activity: IndexedActivity) {
        if let Some(previous) = self.events.insert(id.clone(), activity) {
            tracing::debug!(
                activity_id = %id,
                replaced = %previous.name,
                "Duplicate activity id, keeping the later entry"
            );
        }
    }

    pub fn get(&self, id: &ActivityId) -> Option<&IndexedActivity> {
        self.events.get(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActivityId, &IndexedActivity)> {
        self.events.iter()
    }
}

impl FromIterator<(ActivityId, IndexedActivity)> for EventIndex {
    fn from_iter<I: IntoIterator<Item = (ActivityId, IndexedActivity)>>(iter: I) -> Self {
        let mut index = EventIndex::default();
        for (id, activity) in iter {
            index.insert(id, activity);
        }
        index
    }
}

/// Parses an ISO-8601 activity start time and localizes it to the venue zone.
///
/// Timestamps with an offset (`Z`, `+01:00`, `+0100`, `+01`) keep their
/// instant; timestamps without one are read as venue wall-clock time.
/// A space may stand in for the `T` separator.
pub fn parse_start_time(
    raw: &str,
    zone: VenueZone,
    activity_id: &ActivityId,
) -> Result<DateTime<FixedOffset>, ScheduleError> {
    let malformed = || ScheduleError::MalformedTimestamp {
        activity_id: activity_id.clone(),
        raw: raw.to_string(),
    };
    let normalized = normalize_timestamp(raw);

    if let Some(instant) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
    {
        return Ok(zone.localize(instant));
    }

    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(malformed)
        .and_then(|naive| zone.from_wall_clock(&naive).ok_or_else(malformed))
}

/// Rewrites `Z` to `+00:00` and a space date/time separator to `T`.
fn normalize_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => trimmed.to_string(),
    };
    if let Some(sep) = normalized.find(' ') {
        normalized.replace_range(sep..sep + 1, "T");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wcif::{Room, Venue};

    fn activity(id: u64, name: &str, start: &str, children: Vec<Activity>) -> Activity {
        Activity {
            id: ActivityId::Numeric(id),
            name: name.to_string(),
            activity_code: None,
            start_time: start.to_string(),
            end_time: None,
            child_activities: children,
        }
    }

    fn schedule(timezone: &str, activities: Vec<Activity>) -> Schedule {
        Schedule {
            venues: vec![Venue {
                timezone: timezone.to_string(),
                rooms: vec![Room {
                    activities,
                    ..Room::default()
                }],
                ..Venue::default()
            }],
            ..Schedule::default()
        }
    }

    #[test]
    fn indexes_parents_and_children() {
        let round = activity(
            1,
            "3x3x3 Cube, Round 1",
            "2023-06-10T08:00:00Z",
            vec![
                activity(2, "3x3x3 Cube, Round 1, Group 1", "2023-06-10T08:00:00Z", vec![]),
                activity(3, "3x3x3 Cube, Round 1, Group 2", "2023-06-10T08:30:00Z", vec![]),
            ],
        );
        let index = EventIndex::build(&schedule("Europe/Berlin", vec![round])).unwrap();

        assert_eq!(index.len(), 3);
        let group2 = index.get(&ActivityId::Numeric(3)).unwrap();
        assert_eq!(group2.name, "3x3x3 Cube, Round 1, Group 2");
        // CEST is UTC+2 in June.
        assert_eq!(group2.start.format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn iteration_is_sorted_by_id() {
        let index = EventIndex::build(&schedule(
            "UTC",
            vec![
                activity(10, "Late", "2023-06-10T08:00:00Z", vec![]),
                activity(2, "Early", "2023-06-10T09:00:00Z", vec![]),
            ],
        ))
        .unwrap();
        let ids: Vec<String> = index.iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(ids, vec!["2", "10"]);
    }

    #[test]
    fn duplicate_ids_keep_the_last_entry() {
        let index = EventIndex::build(&schedule(
            "UTC",
            vec![
                activity(5, "First", "2023-06-10T08:00:00Z", vec![]),
                activity(5, "Second", "2023-06-10T09:00:00Z", vec![]),
            ],
        ))
        .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&ActivityId::Numeric(5)).unwrap().name, "Second");
    }

    #[test]
    fn malformed_timestamp_fails_the_whole_build() {
        let err = EventIndex::build(&schedule(
            "UTC",
            vec![
                activity(1, "Fine", "2023-06-10T08:00:00Z", vec![]),
                activity(2, "Broken", "next tuesday", vec![]),
            ],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::MalformedTimestamp {
                activity_id: ActivityId::Numeric(2),
                raw: "next tuesday".to_string(),
            }
        );
    }

    #[test]
    fn unknown_timezone_fails_the_whole_build() {
        let err = EventIndex::build(&schedule("Atlantis/Capital", vec![])).unwrap_err();
        assert_eq!(err, ScheduleError::UnknownTimezone("Atlantis/Capital".to_string()));
    }

    #[test]
    fn naive_times_are_venue_wall_clock() {
        let zone = VenueZone::resolve("America/New_York").unwrap();
        let id = ActivityId::Numeric(1);
        let start = parse_start_time("2023-01-05T09:15", zone, &id).unwrap();
        assert_eq!(start.format("%H:%M").to_string(), "09:15");
        assert_eq!(start.offset().local_minus_utc(), -5 * 3600);

        // 02:30 does not exist on the spring-forward date.
        assert!(parse_start_time("2023-03-12T02:30:00", zone, &id).is_err());
    }

    #[test]
    fn accepts_iso8601_variants() {
        let zone = VenueZone::resolve("UTC").unwrap();
        let id = ActivityId::Numeric(1);
        let cases = [
            ("2023-01-01T09:00:00Z", "2023-01-01T09:00:00+00:00"),
            ("2023-01-01T09:00:00.250Z", "2023-01-01T09:00:00.250+00:00"),
            ("2023-01-01 09:00:00Z", "2023-01-01T09:00:00+00:00"),
            ("2023-01-01T09:00Z", "2023-01-01T09:00:00+00:00"),
            ("2023-01-01T09:00:00+01:00", "2023-01-01T08:00:00+00:00"),
            ("2023-01-01T09:00:00+0100", "2023-01-01T08:00:00+00:00"),
            ("2023-01-01T09:00:00+01", "2023-01-01T08:00:00+00:00"),
            ("2023-01-01T09:00+01:00", "2023-01-01T08:00:00+00:00"),
            ("2023-01-01T09:00-0530", "2023-01-01T14:30:00+00:00"),
            ("20230101T090000Z", "2023-01-01T09:00:00+00:00"),
            ("20230101T090000+0100", "2023-01-01T08:00:00+00:00"),
            ("20230101T0900Z", "2023-01-01T09:00:00+00:00"),
            ("20230101T090000", "2023-01-01T09:00:00+00:00"),
            (" 2023-01-01T09:00:00 ", "2023-01-01T09:00:00+00:00"),
        ];
        for (raw, expected) in cases {
            let parsed = parse_start_time(raw, zone, &id)
                .unwrap_or_else(|err| panic!("{raw:?} should parse: {err}"));
            assert_eq!(parsed, DateTime::parse_from_rfc3339(expected).unwrap(), "{raw:?}");
        }
    }

    #[test]
    fn rejects_non_timestamps() {
        let zone = VenueZone::resolve("UTC").unwrap();
        let id = ActivityId::Numeric(1);
        for raw in ["", "2023-01-01", "09:00", "2023-13-01T09:00:00Z", "2023-01-01T25:00Z"] {
            assert!(parse_start_time(raw, zone, &id).is_err(), "{raw:?} should not parse");
        }
    }
}
