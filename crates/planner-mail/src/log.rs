//! A mailer that never talks to the network.

use planner_core::mail::{EmailMessage, Mailer};

use crate::Result;

/// Logs the recipient and subject of each message and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
  type Error = crate::Error;

  async fn send(&self, message: EmailMessage) -> Result<()> {
    tracing::info!(
      to = %message.to.address,
      subject = %message.subject,
      "mail delivery disabled; message not sent"
    );
    Ok(())
  }
}
