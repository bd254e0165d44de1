//! Time source, injected wherever "now" matters so tests can pin it.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// Always returns the instant it was built with.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
  now: DateTime<Utc>,
}

impl FixedClock {
  pub fn new(now: DateTime<Utc>) -> Self { Self { now } }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.now }
}
