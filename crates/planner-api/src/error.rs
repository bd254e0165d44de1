//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field:   field.into(),
      message: message.into(),
    }
  }
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The body parsed but one or more fields are invalid.
  #[error("validation failed")]
  Validation(Vec<FieldError>),

  /// The request could not be parsed at all.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The input is well-formed but breaks a scheduling rule.
  #[error(transparent)]
  Schedule(#[from] planner_core::Error),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(fields) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": self.to_string(), "fields": fields }),
      ),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Schedule(e) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": e.to_string(), "rule": e.rule() }),
      ),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
