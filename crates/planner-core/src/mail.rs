//! The `Mailer` trait and the message it sends.
//!
//! Transports live in `planner-mail`; the API layer composes messages and
//! depends only on this abstraction.

use std::future::Future;

/// A display name plus address, e.g. `Ana <ana@example.com>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
  pub name:    Option<String>,
  pub address: String,
}

impl Mailbox {
  pub fn new(name: Option<String>, address: impl Into<String>) -> Self {
    Self {
      name,
      address: address.into(),
    }
  }
}

/// A single HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
  pub from:      Mailbox,
  pub to:        Mailbox,
  pub subject:   String,
  pub html_body: String,
}

/// Abstraction over an outbound mail transport.
///
/// Delivery is best-effort: callers decide what a failure means, the trait
/// makes no promise that a message reached its recipient.
pub trait Mailer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Hand `message` to the transport.
  fn send(
    &self,
    message: EmailMessage,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
