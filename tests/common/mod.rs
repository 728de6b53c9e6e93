use badge_generator::schedule::{EventIndex, IndexedActivity};
use badge_generator::wcif::{Activity, ActivityId, Assignment, Person, Registration, Room, Schedule, Venue};
use chrono::{DateTime, FixedOffset};

/// Parse an RFC 3339 timestamp.
#[allow(dead_code)]
pub fn at(ts: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(ts).expect("valid test timestamp")
}

/// Event index from `(id, name, start)` triples.
#[allow(dead_code)]
pub fn index_of(entries: &[(&str, &str, &str)]) -> EventIndex {
    entries
        .iter()
        .map(|(id, name, start)| {
            (
                ActivityId::from(*id),
                IndexedActivity {
                    name: name.to_string(),
                    start: at(start),
                },
            )
        })
        .collect()
}

#[allow(dead_code)]
pub fn activity(id: u64, name: &str, start: &str, children: Vec<Activity>) -> Activity {
    Activity {
        id: ActivityId::Numeric(id),
        name: name.to_string(),
        activity_code: None,
        start_time: start.to_string(),
        end_time: None,
        child_activities: children,
    }
}

/// Single venue, single room schedule.
#[allow(dead_code)]
pub fn schedule(timezone: &str, activities: Vec<Activity>) -> Schedule {
    Schedule {
        venues: vec![Venue {
            name: "Main Venue".to_string(),
            timezone: timezone.to_string(),
            rooms: vec![Room {
                name: "Main Room".to_string(),
                activities,
                ..Room::default()
            }],
            ..Venue::default()
        }],
        ..Schedule::default()
    }
}

#[allow(dead_code)]
pub fn person(id: u32, name: &str, status: &str, assignments: Vec<Assignment>) -> Person {
    Person {
        registrant_id: Some(id),
        name: name.to_string(),
        wca_id: None,
        country_iso2: "DK".to_string(),
        registration: Some(Registration {
            status: status.to_string(),
            guests: 0,
        }),
        birthdate: None,
        assignments,
    }
}
