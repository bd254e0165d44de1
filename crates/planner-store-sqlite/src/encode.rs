//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings in UTC so that
//! lexical order matches chronological order. The width only holds for years
//! 0 through 9999; callers reject anything outside that range. UUIDs are stored as hyphenated
//! lowercase strings. Booleans use SQLite's native integer mapping.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use planner_core::trip::{Participant, Trip};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Drop precision the column format cannot hold, so a value read back
/// compares equal to the one written.
pub fn storage_precision(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `trips` row.
pub struct RawTrip {
  pub trip_id:     String,
  pub destination: String,
  pub starts_at:   String,
  pub ends_at:     String,
  pub created_at:  String,
}

impl RawTrip {
  pub fn into_trip(self, participants: Vec<RawParticipant>) -> Result<Trip> {
    Ok(Trip {
      trip_id:      decode_uuid(&self.trip_id)?,
      destination:  self.destination,
      starts_at:    decode_dt(&self.starts_at)?,
      ends_at:      decode_dt(&self.ends_at)?,
      created_at:   decode_dt(&self.created_at)?,
      participants: participants
        .into_iter()
        .map(RawParticipant::into_participant)
        .collect::<Result<_>>()?,
    })
  }
}

/// Raw values read directly from a `participants` row.
pub struct RawParticipant {
  pub participant_id: String,
  pub trip_id:        String,
  pub name:           Option<String>,
  pub email:          String,
  pub is_owner:       bool,
  pub is_confirmed:   bool,
}

impl RawParticipant {
  pub fn into_participant(self) -> Result<Participant> {
    Ok(Participant {
      participant_id: decode_uuid(&self.participant_id)?,
      email:          self.email,
      name:           self.name,
      is_owner:       self.is_owner,
      is_confirmed:   self.is_confirmed,
    })
  }
}

pub const PARTICIPANT_COLUMNS: &str =
  "participant_id, trip_id, name, email, is_owner, is_confirmed";

pub fn participant_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawParticipant> {
  Ok(RawParticipant {
    participant_id: row.get(0)?,
    trip_id:        row.get(1)?,
    name:           row.get(2)?,
    email:          row.get(3)?,
    is_owner:       row.get(4)?,
    is_confirmed:   row.get(5)?,
  })
}

pub const TRIP_COLUMNS: &str = "trip_id, destination, starts_at, ends_at, created_at";

pub fn trip_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTrip> {
  Ok(RawTrip {
    trip_id:     row.get(0)?,
    destination: row.get(1)?,
    starts_at:   row.get(2)?,
    ends_at:     row.get(3)?,
    created_at:  row.get(4)?,
  })
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let a = Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap();
    let b = a + chrono::Duration::milliseconds(250);
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(encode_dt(a), "2030-01-01T09:00:00.000000Z");
  }

  #[test]
  fn timestamp_survives_storage_precision() {
    let dt = storage_precision(Utc::now());
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }
}
