//! The `TripStore` trait.
//!
//! Implemented by storage backends (e.g. `planner-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::trip::{NewTrip, Trip};

/// Abstraction over a trip store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TripStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a trip and all of its participants as one atomic write.
  ///
  /// The store assigns the trip and participant identifiers and the
  /// `created_at` timestamp. Either every row is written or none is.
  fn create_trip_with_participants(
    &self,
    input: NewTrip,
  ) -> impl Future<Output = Result<Trip, Self::Error>> + Send + '_;

  /// Retrieve a trip with its participants. Returns `None` if not found.
  fn get_trip(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Trip>, Self::Error>> + Send + '_;

  /// All trips, earliest start first.
  fn list_trips(
    &self,
  ) -> impl Future<Output = Result<Vec<Trip>, Self::Error>> + Send + '_;
}
