//! SQL schema for the trip planner SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS trips (
    trip_id     TEXT PRIMARY KEY,
    destination TEXT NOT NULL CHECK (length(destination) > 0),
    starts_at   TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    ends_at     TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- server-assigned
);

-- Rows are only ever written together with their trip, in one transaction.
CREATE TABLE IF NOT EXISTS participants (
    participant_id TEXT PRIMARY KEY,
    trip_id        TEXT NOT NULL REFERENCES trips(trip_id),
    position       INTEGER NOT NULL,   -- 0 is the owner
    name           TEXT,
    email          TEXT NOT NULL CHECK (length(email) > 0),
    is_owner       INTEGER NOT NULL DEFAULT 0,
    is_confirmed   INTEGER NOT NULL DEFAULT 0,
    UNIQUE (trip_id, position)
);

-- At most one owner per trip.
CREATE UNIQUE INDEX IF NOT EXISTS participants_owner_idx
    ON participants(trip_id) WHERE is_owner = 1;

CREATE INDEX IF NOT EXISTS participants_trip_idx ON participants(trip_id);
CREATE INDEX IF NOT EXISTS trips_starts_idx      ON trips(starts_at);

PRAGMA user_version = 1;
";
