//! Trip planner server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, picks a mail backend, and serves the JSON API over HTTP.

mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use planner_api::{AppState, ConfirmationRenderer, ConfirmationSettings, dates::DateLocale};
use planner_core::{
  clock::SystemClock,
  mail::{Mailbox, Mailer},
};
use planner_mail::{LogMailer, SmtpMailer};
use planner_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{MailBackend, ServerConfig};

#[derive(Parser)]
#[command(author, version, about = "Trip planner API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = settings::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match server_cfg.mail.backend {
    MailBackend::Smtp => {
      tracing::info!(
        host = %server_cfg.mail.smtp.host,
        port = server_cfg.mail.smtp.port,
        "sending mail through SMTP relay"
      );
      let mailer = SmtpMailer::new(&server_cfg.mail.smtp);
      serve(server_cfg, store, mailer).await
    }
    MailBackend::Log => {
      tracing::warn!("mail backend is `log`; confirmation emails will not be delivered");
      serve(server_cfg, store, LogMailer).await
    }
  }
}

async fn serve<M>(server_cfg: ServerConfig, store: SqliteStore, mailer: M) -> anyhow::Result<()>
where
  M: Mailer + 'static,
{
  let locale = DateLocale::parse(&server_cfg.locale)
    .with_context(|| format!("unknown locale {:?}", server_cfg.locale))?;

  let confirmation = ConfirmationRenderer::new(ConfirmationSettings {
    public_url: server_cfg.public_url.clone(),
    sender:     Mailbox::new(
      Some(server_cfg.mail.from_name.clone()),
      server_cfg.mail.from_address.clone(),
    ),
    locale,
  })
  .context("failed to load confirmation template")?;

  let state = AppState {
    store:        Arc::new(store),
    mailer:       Arc::new(mailer),
    clock:        Arc::new(SystemClock),
    confirmation: Arc::new(confirmation),
  };

  let app = planner_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
