//! Locale-aware long-date formatting for outgoing mail.

use chrono::{DateTime, Locale, Utc};

/// A locale for rendering dates, with the long-date pattern of its language.
#[derive(Debug, Clone, Copy)]
pub struct DateLocale {
  pattern: &'static str,
  locale:  Locale,
}

impl DateLocale {
  /// Parse a POSIX-style locale name such as `pt_BR` or `en_US`.
  pub fn parse(name: &str) -> Option<Self> {
    let locale = Locale::try_from(name).ok()?;
    Some(Self {
      pattern: language_pattern(name),
      locale,
    })
  }

  pub fn pt_br() -> Self {
    Self {
      pattern: language_pattern("pt_BR"),
      locale:  Locale::pt_BR,
    }
  }
}

impl Default for DateLocale {
  fn default() -> Self { Self::pt_br() }
}

/// Long date pattern for the language part of a locale name.
fn language_pattern(name: &str) -> &'static str {
  let language = name.split(['_', '-', '.']).next().unwrap_or_default();
  match language {
    "pt" | "es" | "gl" => "%-d de %B de %Y",
    "en" => "%B %-d, %Y",
    "de" => "%-d. %B %Y",
    _ => "%-d %B %Y",
  }
}

/// Render `at` as a long calendar date, e.g. `20 de outubro de 2026` for
/// `pt_BR` or `October 20, 2026` for `en_US`. Dates are taken in UTC.
pub fn format_long_date(at: DateTime<Utc>, locale: DateLocale) -> String {
  at.format_localized(locale.pattern, locale.locale).to_string()
}
