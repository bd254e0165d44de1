//! Request body for `POST /trips` and its field-level validation.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use planner_core::trip::{NewTrip, Owner};
use serde::Deserialize;
use validator::ValidateEmail as _;

use crate::error::FieldError;

/// Shortest accepted destination, in characters.
pub const MIN_DESTINATION_LEN: usize = 4;

/// Years that survive the store's fixed-width timestamp encoding.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// A timestamp as the client sent it, before coercion.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimestampInput {
  /// Milliseconds since the Unix epoch.
  Millis(i64),
  Text(String),
}

impl TimestampInput {
  /// Accepts RFC 3339, a naive date-time (taken as UTC), a bare calendar
  /// date (midnight UTC), or epoch milliseconds. Instants outside years
  /// 0 through 9999 are rejected.
  pub fn coerce(&self) -> Option<DateTime<Utc>> {
    self
      .parse()
      .filter(|dt| STORABLE_YEARS.contains(&dt.year()))
  }

  fn parse(&self) -> Option<DateTime<Utc>> {
    match self {
      TimestampInput::Millis(ms) => DateTime::from_timestamp_millis(*ms),
      TimestampInput::Text(s) => {
        let s = s.trim();
        DateTime::parse_from_rfc3339(s)
          .map(|dt| dt.with_timezone(&Utc))
          .ok()
          .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
              .ok()
              .map(|n| n.and_utc())
          })
          .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
              .ok()
              .and_then(|d| d.and_hms_opt(0, 0, 0))
              .map(|n| n.and_utc())
          })
      }
    }
  }
}

/// JSON body accepted by `POST /trips`. Every field is required.
#[derive(Debug, Deserialize)]
pub struct CreateTripBody {
  pub destination:      String,
  pub starts_at:        TimestampInput,
  pub ends_at:          TimestampInput,
  pub owner_name:       String,
  pub owner_email:      String,
  pub emails_to_invite: Vec<String>,
}

impl CreateTripBody {
  /// Check every field and build the [`NewTrip`], or report all offending
  /// fields at once. Scheduling rules are not checked here.
  pub fn validate(self) -> Result<NewTrip, Vec<FieldError>> {
    let mut errors = Vec::new();

    if self.destination.chars().count() < MIN_DESTINATION_LEN {
      errors.push(FieldError::new(
        "destination",
        format!("must be at least {MIN_DESTINATION_LEN} characters"),
      ));
    }

    let starts_at = self.starts_at.coerce();
    if starts_at.is_none() {
      errors.push(FieldError::new("starts_at", "invalid date"));
    }
    let ends_at = self.ends_at.coerce();
    if ends_at.is_none() {
      errors.push(FieldError::new("ends_at", "invalid date"));
    }

    if self.owner_name.trim().is_empty() {
      errors.push(FieldError::new("owner_name", "must not be empty"));
    }
    if !self.owner_email.validate_email() {
      errors.push(FieldError::new("owner_email", "invalid email address"));
    }
    for (i, email) in self.emails_to_invite.iter().enumerate() {
      if !email.validate_email() {
        errors.push(FieldError::new(
          format!("emails_to_invite[{i}]"),
          "invalid email address",
        ));
      }
    }

    match (starts_at, ends_at) {
      (Some(starts_at), Some(ends_at)) if errors.is_empty() => Ok(NewTrip::new(
        self.destination,
        starts_at,
        ends_at,
        Owner {
          name:  self.owner_name,
          email: self.owner_email,
        },
        self.emails_to_invite,
      )),
      _ => Err(errors),
    }
  }
}
