//! Error type for `ecodnp-db`.

use ecodnp_core::ConstraintViolation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] ::config::ConfigError),

  #[error("sqlite store error: {0}")]
  Sqlite(#[from] ecodnp_store_sqlite::Error),

  #[error("postgres store error: {0}")]
  Postgres(#[from] ecodnp_store_postgres::Error),
}

impl Error {
  /// The integrity constraint the database rejected a write with, if any.
  pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
    match self {
      Error::Config(_) => None,
      Error::Sqlite(e) => e.constraint_violation(),
      Error::Postgres(e) => e.constraint_violation(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
