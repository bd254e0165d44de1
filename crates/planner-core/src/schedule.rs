//! Temporal rules a new trip must satisfy.

use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// Check a trip's date range against the moment the request is processed.
///
/// Rules are evaluated in order and only the first violation is reported:
/// the start must lie strictly after `now`, then the end must not precede
/// the start. A zero-length trip (`ends_at == starts_at`) is allowed.
pub fn check_schedule(
  now: DateTime<Utc>,
  starts_at: DateTime<Utc>,
  ends_at: DateTime<Utc>,
) -> Result<()> {
  if starts_at <= now {
    return Err(Error::StartNotInFuture);
  }
  if ends_at < starts_at {
    return Err(Error::EndBeforeStart);
  }
  Ok(())
}
