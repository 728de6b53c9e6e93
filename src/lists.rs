use csv::WriterBuilder;
use serde::Serialize;

use crate::badge::BadgeSheet;
use crate::error::RenderError;

/// One row of the attendee list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendeeRow {
    pub registrant_id: Option<u32>,
    pub name: String,
    pub wca_id: String,
    pub country: String,
    pub roles: String,
}

/// One row of the guest list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestRow {
    pub registrant_id: Option<u32>,
    pub name: String,
    pub guests: u32,
}

/// Every badge holder, in badge order.
pub fn attendee_list(sheet: &BadgeSheet) -> Vec<AttendeeRow> {
    sheet
        .badges
        .iter()
        .map(|badge| AttendeeRow {
            registrant_id: badge.registrant_id,
            name: badge.name.clone(),
            wca_id: badge.wca_id.clone(),
            country: badge.country.clone(),
            roles: badge.roles.iter().cloned().collect::<Vec<_>>().join(", "),
        })
        .collect()
}

/// Badge holders who registered at least one guest.
pub fn guest_list(sheet: &BadgeSheet) -> Vec<GuestRow> {
    sheet
        .badges
        .iter()
        .filter(|badge| badge.guests > 0)
        .map(|badge| GuestRow {
            registrant_id: badge.registrant_id,
            name: badge.name.clone(),
            guests: badge.guests,
        })
        .collect()
}

/// Serializes rows to CSV with a header row taken from the field names.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, RenderError> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| RenderError::Buffer(e.to_string()))?;
    wtr.into_inner().map_err(|e| RenderError::Buffer(e.to_string()))
}
