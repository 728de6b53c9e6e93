use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::ScheduleError;

const MAX_OFFSET_HOURS: i32 = 14;

/// Timezone of a venue: an IANA zone or a fixed UTC offset such as `UTC+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl VenueZone {
    /// Resolves a venue timezone identifier.
    ///
    /// IANA names are tried first, then `UTC`/`GMT` with an optional
    /// `+H`, `+HH`, `+HH:MM` or `+HHMM` offset.
    pub fn resolve(id: &str) -> Result<Self, ScheduleError> {
        let trimmed = id.trim();
        if let Ok(tz) = trimmed.parse::<Tz>() {
            return Ok(VenueZone::Named(tz));
        }
        parse_fixed_offset(trimmed)
            .map(VenueZone::Fixed)
            .ok_or_else(|| ScheduleError::UnknownTimezone(id.to_string()))
    }

    /// Converts an instant into this zone's wall clock.
    pub fn localize(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            VenueZone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
            VenueZone::Fixed(offset) => instant.with_timezone(offset),
        }
    }

    /// Interprets a wall-clock time in this zone. Ambiguous times take the
    /// earlier instant; times skipped by a DST jump yield `None`.
    pub fn from_wall_clock(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            VenueZone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            VenueZone::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

fn parse_fixed_offset(id: &str) -> Option<FixedOffset> {
    let upper = id.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))?;
    if rest.is_empty() {
        return FixedOffset::east_opt(0);
    }

    let (sign, digits) = if let Some(digits) = rest.strip_prefix('+') {
        (1, digits)
    } else if let Some(digits) = rest.strip_prefix('-') {
        (-1, digits)
    } else {
        return None;
    };
    if !digits.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    if hours.is_empty() || hours.len() > 2 || minutes.is_empty() || minutes.contains(':') {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > MAX_OFFSET_HOURS || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
