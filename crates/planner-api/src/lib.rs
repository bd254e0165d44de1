//! JSON REST API for the trip planner.
//!
//! Exposes an axum [`Router`] backed by any [`TripStore`] and [`Mailer`].
//! Transport concerns (binding, TLS, request tracing) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = planner_api::api_router(state);
//! ```

pub mod body;
pub mod confirmation;
pub mod dates;
pub mod error;
pub mod trips;

use std::sync::Arc;

use axum::{Router, routing::get};
use planner_core::{clock::Clock, mail::Mailer, store::TripStore};

pub use confirmation::{ConfirmationRenderer, ConfirmationSettings};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Collaborators shared by all handlers. Every dependency is injected so
/// tests can substitute doubles.
pub struct AppState<S, M> {
  pub store:        Arc<S>,
  pub mailer:       Arc<M>,
  pub clock:        Arc<dyn Clock>,
  pub confirmation: Arc<ConfirmationRenderer>,
}

impl<S, M> Clone for AppState<S, M> {
  fn clone(&self) -> Self {
    Self {
      store:        Arc::clone(&self.store),
      mailer:       Arc::clone(&self.mailer),
      clock:        Arc::clone(&self.clock),
      confirmation: Arc::clone(&self.confirmation),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn api_router<S, M>(state: AppState<S, M>) -> Router<()>
where
  S: TripStore + 'static,
  M: Mailer + 'static,
{
  Router::new()
    .route("/trips", get(trips::list::<S, M>).post(trips::create::<S, M>))
    .route("/trips/{id}", get(trips::get_one::<S, M>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
