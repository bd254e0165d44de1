//! [`SqliteStore`], the SQLite implementation of [`TripStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use planner_core::{
  store::TripStore,
  trip::{NewTrip, Participant, Trip},
};

use crate::{
  encode::{
    PARTICIPANT_COLUMNS, RawParticipant, RawTrip, TRIP_COLUMNS, encode_dt, encode_uuid,
    participant_from_row, storage_precision, trip_from_row,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A trip store backed by a single SQLite file.
///
/// Clones share the same underlying connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TripStore impl ──────────────────────────────────────────────────────────

impl TripStore for SqliteStore {
  type Error = crate::Error;

  async fn create_trip_with_participants(&self, input: NewTrip) -> Result<Trip> {
    let participants: Vec<Participant> = input
      .participants()
      .iter()
      .map(|p| Participant {
        participant_id: Uuid::new_v4(),
        email:          p.email.clone(),
        name:           p.name.clone(),
        is_owner:       p.is_owner,
        is_confirmed:   p.is_confirmed,
      })
      .collect();

    let trip = Trip {
      trip_id:     Uuid::new_v4(),
      destination: input.destination,
      starts_at:   storage_precision(input.starts_at),
      ends_at:     storage_precision(input.ends_at),
      created_at:  storage_precision(Utc::now()),
      participants,
    };

    let trip_id_str = encode_uuid(trip.trip_id);
    let destination = trip.destination.clone();
    let starts_at_str = encode_dt(trip.starts_at);
    let ends_at_str = encode_dt(trip.ends_at);
    let created_at_str = encode_dt(trip.created_at);
    let participant_rows: Vec<(String, Option<String>, String, bool, bool)> = trip
      .participants
      .iter()
      .map(|p| {
        (
          encode_uuid(p.participant_id),
          p.name.clone(),
          p.email.clone(),
          p.is_owner,
          p.is_confirmed,
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls everything back.
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO trips (trip_id, destination, starts_at, ends_at, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            trip_id_str,
            destination,
            starts_at_str,
            ends_at_str,
            created_at_str,
          ],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO participants (
               participant_id, trip_id, position, name, email, is_owner, is_confirmed
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for (position, (id, name, email, is_owner, is_confirmed)) in
            participant_rows.iter().enumerate()
          {
            stmt.execute(rusqlite::params![
              id,
              trip_id_str,
              position as i64,
              name,
              email,
              is_owner,
              is_confirmed,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(trip)
  }

  async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>> {
    let id_str = encode_uuid(id);

    let raw: Option<(RawTrip, Vec<RawParticipant>)> = self
      .conn
      .call(move |conn| {
        let trip = conn
          .query_row(
            &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE trip_id = ?1"),
            rusqlite::params![id_str],
            trip_from_row,
          )
          .optional()?;

        let Some(trip) = trip else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {PARTICIPANT_COLUMNS} FROM participants
           WHERE trip_id = ?1 ORDER BY position"
        ))?;
        let participants = stmt
          .query_map(rusqlite::params![id_str], participant_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((trip, participants)))
      })
      .await?;

    raw
      .map(|(trip, participants)| trip.into_trip(participants))
      .transpose()
  }

  async fn list_trips(&self) -> Result<Vec<Trip>> {
    let (trips, participants): (Vec<RawTrip>, Vec<RawParticipant>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TRIP_COLUMNS} FROM trips ORDER BY starts_at, created_at"
        ))?;
        let trips = stmt
          .query_map([], trip_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {PARTICIPANT_COLUMNS} FROM participants ORDER BY trip_id, position"
        ))?;
        let participants = stmt
          .query_map([], participant_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((trips, participants))
      })
      .await?;

    let mut by_trip: HashMap<String, Vec<RawParticipant>> = HashMap::new();
    for p in participants {
      by_trip.entry(p.trip_id.clone()).or_default().push(p);
    }

    trips
      .into_iter()
      .map(|t| {
        let participants = by_trip.remove(&t.trip_id).unwrap_or_default();
        t.into_trip(participants)
      })
      .collect()
  }
}
