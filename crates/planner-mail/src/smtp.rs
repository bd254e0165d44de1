//! SMTP transport built on lettre's async tokio executor.

use lettre::{
  Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::header::ContentType, transport::smtp::authentication::Credentials,
};
use planner_core::mail::{EmailMessage, Mailbox, Mailer};
use serde::Deserialize;

use crate::{Error, Result};

/// Connection settings for the SMTP relay.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
  #[serde(default = "default_host")]
  pub host:     String,
  #[serde(default = "default_port")]
  pub port:     u16,
  pub username: Option<String>,
  pub password: Option<String>,
}

fn default_host() -> String { "localhost".into() }

fn default_port() -> u16 { 1025 }

impl Default for SmtpSettings {
  fn default() -> Self {
    Self {
      host:     default_host(),
      port:     default_port(),
      username: None,
      password: None,
    }
  }
}

/// Sends mail through an SMTP relay.
///
/// The connection is unencrypted, which suits a local relay or a capture
/// server such as Mailpit. Credentials are sent only when both a username
/// and a password are configured.
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
  pub fn new(settings: &SmtpSettings) -> Self {
    let mut builder =
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
        .port(settings.port);

    if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
      builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }

    Self {
      transport: builder.build(),
    }
  }
}

impl Mailer for SmtpMailer {
  type Error = Error;

  async fn send(&self, message: EmailMessage) -> Result<()> {
    let email = build_message(message)?;
    let response = self.transport.send(email).await?;
    tracing::debug!(code = %response.code(), "smtp relay accepted message");
    Ok(())
  }
}

fn mailbox(mb: Mailbox) -> Result<lettre::message::Mailbox> {
  let address: Address = mb.address.parse().map_err(|source| Error::Address {
    address: mb.address.clone(),
    source,
  })?;
  Ok(lettre::message::Mailbox::new(mb.name, address))
}

/// Convert an [`EmailMessage`] into a lettre HTML message.
fn build_message(message: EmailMessage) -> Result<Message> {
  Ok(
    Message::builder()
      .from(mailbox(message.from)?)
      .to(mailbox(message.to)?)
      .subject(message.subject)
      .header(ContentType::TEXT_HTML)
      .body(message.html_body)?,
  )
}
