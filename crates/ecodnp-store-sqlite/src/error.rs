//! Error type for `ecodnp-store-sqlite`.

use ecodnp_core::{ConstraintViolation, UserId};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("score for user {user_id} would leave the integer range: {score}")]
  ScoreOutOfRange { user_id: UserId, score: i64 },
}

impl Error {
  /// Classify a rejected write by the SQLite extended result code.
  pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
    let Error::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(failure, _),
    )) = self
    else {
      return None;
    };

    if failure.code != rusqlite::ErrorCode::ConstraintViolation {
      return None;
    }

    match failure.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
        Some(ConstraintViolation::Unique)
      }
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintViolation::ForeignKey),
      ffi::SQLITE_CONSTRAINT_NOTNULL => Some(ConstraintViolation::NotNull),
      ffi::SQLITE_CONSTRAINT_CHECK => Some(ConstraintViolation::Check),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
