//! Outbound mail transports implementing [`planner_core::mail::Mailer`].
//!
//! - [`SmtpMailer`] hands messages to an SMTP relay through lettre.
//! - [`LogMailer`] only logs what it would have sent.

mod log;
mod smtp;

pub mod error;

pub use error::{Error, Result};
pub use log::LogMailer;
pub use smtp::{SmtpMailer, SmtpSettings};
