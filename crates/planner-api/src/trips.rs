//! Handlers for `/trips` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/trips` | Body: [`CreateTripBody`]; returns 201 + `{"tripId": ...}` |
//! | `GET`  | `/trips` | All trips with participants, earliest start first |
//! | `GET`  | `/trips/:id` | 404 if not found |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use planner_core::{mail::Mailer, schedule::check_schedule, store::TripStore, trip::Trip};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, body::CreateTripBody, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateTripResponse {
  #[serde(rename = "tripId")]
  pub trip_id: Uuid,
}

/// `POST /trips`
///
/// Validates the body, then the schedule, persists the trip with all of its
/// participants, and emails the owner a confirmation link. The email is
/// best-effort: a delivery failure is logged and the trip stays created.
pub async fn create<S, M>(
  State(state): State<AppState<S, M>>,
  body: Result<Json<CreateTripBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TripStore,
  M: Mailer,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let new_trip = body.validate().map_err(ApiError::Validation)?;
  check_schedule(state.clock.now(), new_trip.starts_at, new_trip.ends_at)?;

  let trip = state
    .store
    .create_trip_with_participants(new_trip)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(
    trip_id = %trip.trip_id,
    participants = trip.participants.len(),
    "trip created"
  );

  send_confirmation(&state, &trip).await;

  Ok((
    StatusCode::CREATED,
    Json(CreateTripResponse {
      trip_id: trip.trip_id,
    }),
  ))
}

async fn send_confirmation<S, M>(state: &AppState<S, M>, trip: &Trip)
where
  M: Mailer,
{
  let message = match state.confirmation.render(trip) {
    Ok(m) => m,
    Err(e) => {
      tracing::error!(trip_id = %trip.trip_id, error = %e, "cannot render confirmation email");
      return;
    }
  };

  match state.mailer.send(message).await {
    Ok(()) => tracing::info!(trip_id = %trip.trip_id, "confirmation email sent"),
    Err(e) => {
      tracing::error!(trip_id = %trip.trip_id, error = %e, "confirmation email not sent");
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /trips`
pub async fn list<S, M>(State(state): State<AppState<S, M>>) -> Result<Json<Vec<Trip>>, ApiError>
where
  S: TripStore,
{
  let trips = state
    .store
    .list_trips()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(trips))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /trips/:id`
pub async fn get_one<S, M>(
  State(state): State<AppState<S, M>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Trip>, ApiError>
where
  S: TripStore,
{
  let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let trip = state
    .store
    .get_trip(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("trip {id} not found")))?;
  Ok(Json(trip))
}
