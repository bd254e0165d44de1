//! Runtime configuration, layered from an optional TOML file and `PLANNER_*`
//! environment variables (nested keys use `__`, e.g.
//! `PLANNER_MAIL__SMTP__HOST`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use planner_mail::SmtpSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// Base URL placed in confirmation links.
  #[serde(default = "default_public_url")]
  pub public_url: String,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Locale for dates in outgoing mail, e.g. `pt_BR`.
  #[serde(default = "default_locale")]
  pub locale:     String,
  #[serde(default)]
  pub mail:       MailConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
  Smtp,
  /// Log messages instead of sending them.
  #[default]
  Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
  #[serde(default)]
  pub backend:      MailBackend,
  #[serde(default = "default_from_name")]
  pub from_name:    String,
  #[serde(default = "default_from_address")]
  pub from_address: String,
  #[serde(default)]
  pub smtp:         SmtpSettings,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self {
      backend:      MailBackend::default(),
      from_name:    default_from_name(),
      from_address: default_from_address(),
      smtp:         SmtpSettings::default(),
    }
  }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3333 }
fn default_public_url() -> String { "http://localhost:3333".into() }
fn default_store_path() -> PathBuf { PathBuf::from("trips.db") }
fn default_locale() -> String { "pt_BR".into() }
fn default_from_name() -> String { "Trip Planner".into() }
fn default_from_address() -> String { "oi@plann.er".into() }

/// Read `path` (if it exists) and overlay the environment.
pub fn load(path: &Path) -> Result<ServerConfig, ConfigError> {
  Config::builder()
    .add_source(File::from(path).required(false))
    .add_source(
      Environment::with_prefix("PLANNER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()?
    .try_deserialize()
}
