//! Core types and trait definitions for the trip planner.
//!
//! This crate is deliberately free of HTTP, database, and mail-transport
//! dependencies. All other crates depend on it.

pub mod clock;
pub mod error;
pub mod mail;
pub mod schedule;
pub mod store;
pub mod trip;

pub use error::{Error, Result};
