//! Error type for `orbit-store-postgres`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("connect: {0}")]
  Connect(#[source] sqlx::Error),

  #[error("connect: timed out after {0:?}")]
  ConnectTimeout(Duration),

  #[error("query: {0}")]
  Query(#[source] sqlx::Error),

  #[error("query: timed out after {0:?}")]
  QueryTimeout(Duration),

  #[error("config: {0}")]
  Config(#[from] config::ConfigError),

  #[error("config: {0}")]
  InvalidConfig(String),
}

impl Error {
  /// The step that failed.
  pub fn phase(&self) -> &'static str {
    match self {
      Error::Connect(_) | Error::ConnectTimeout(_) => "connect",
      Error::Query(_) | Error::QueryTimeout(_) => "query",
      Error::Config(_) | Error::InvalidConfig(_) => "config",
    }
  }
}

impl orbit_core::store::StoreError for Error {
  fn phase(&self) -> &'static str { Error::phase(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
