//! Error types for `planner-core`.

use thiserror::Error;

/// A violated scheduling rule. Reported to clients as a domain error,
/// distinct from malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
  #[error("start date must be in the future")]
  StartNotInFuture,

  #[error("end date must be after start date")]
  EndBeforeStart,
}

impl Error {
  /// Stable machine-readable identifier for the violated rule.
  pub fn rule(&self) -> &'static str {
    match self {
      Error::StartNotInFuture => "starts_at_in_future",
      Error::EndBeforeStart => "ends_at_after_starts_at",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
