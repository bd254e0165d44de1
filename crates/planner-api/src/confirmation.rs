//! Confirmation email sent to the owner of a newly created trip.
//!
//! The HTML body is a tera template embedded with `include_str!`; tera
//! escapes the destination and owner name because the template name ends in
//! `.html`.

use planner_core::{
  mail::{EmailMessage, Mailbox},
  trip::Trip,
};
use tera::{Context, Tera};
use thiserror::Error;
use uuid::Uuid;

use crate::dates::{DateLocale, format_long_date};

const TEMPLATE: &str = "trip_confirmation.html";

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("trip {0} has no owner")]
  NoOwner(Uuid),

  #[error("template error: {0}")]
  Template(#[from] tera::Error),
}

/// Settings that shape the confirmation email.
#[derive(Debug, Clone)]
pub struct ConfirmationSettings {
  /// Externally reachable base URL, used to build the confirmation link.
  pub public_url: String,
  pub sender:     Mailbox,
  pub locale:     DateLocale,
}

/// Renders [`EmailMessage`]s for new trips.
pub struct ConfirmationRenderer {
  engine:   Tera,
  settings: ConfirmationSettings,
}

impl ConfirmationRenderer {
  pub fn new(settings: ConfirmationSettings) -> Result<Self, RenderError> {
    let mut engine = Tera::default();
    engine.add_raw_template(TEMPLATE, include_str!("../templates/trip_confirmation.html"))?;
    Ok(Self { engine, settings })
  }

  /// `{public_url}/trips/{id}/confirm`
  pub fn confirmation_link(&self, trip_id: Uuid) -> String {
    format!(
      "{}/trips/{trip_id}/confirm",
      self.settings.public_url.trim_end_matches('/')
    )
  }

  /// Build the email addressed to the trip's owner.
  pub fn render(&self, trip: &Trip) -> Result<EmailMessage, RenderError> {
    let owner = trip.owner().ok_or(RenderError::NoOwner(trip.trip_id))?;
    let starts_on = format_long_date(trip.starts_at, self.settings.locale);
    let ends_on = format_long_date(trip.ends_at, self.settings.locale);

    let mut context = Context::new();
    context.insert("destination", &trip.destination);
    context.insert("owner_name", owner.name.as_deref().unwrap_or_default());
    context.insert("starts_on", &starts_on);
    context.insert("ends_on", &ends_on);
    context.insert("confirmation_link", &self.confirmation_link(trip.trip_id));

    let html_body = self.engine.render(TEMPLATE, &context)?.trim().to_owned();

    Ok(EmailMessage {
      from:    self.settings.sender.clone(),
      to:      Mailbox::new(owner.name.clone(), owner.email.clone()),
      subject: format!("Confirme sua viagem para {} em {starts_on}", trip.destination),
      html_body,
    })
  }
}
