//! Error type for `planner-mail`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid address {address:?}: {source}")]
  Address {
    address: String,
    #[source]
    source:  lettre::address::AddressError,
  },

  #[error("cannot build message: {0}")]
  Message(#[from] lettre::error::Error),

  #[error("smtp error: {0}")]
  Transport(#[from] lettre::transport::smtp::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
