//! Error type for `ecodnp-store-postgres`.

use ecodnp_core::ConstraintViolation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl Error {
  /// Classify a rejected write by its SQLSTATE class.
  pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
    let Error::Database(sqlx::Error::Database(db)) = self else {
      return None;
    };

    if db.is_unique_violation() {
      Some(ConstraintViolation::Unique)
    } else if db.is_foreign_key_violation() {
      Some(ConstraintViolation::ForeignKey)
    } else if db.is_check_violation() {
      Some(ConstraintViolation::Check)
    } else if db.code().as_deref() == Some(NOT_NULL_VIOLATION) {
      Some(ConstraintViolation::NotNull)
    } else {
      None
    }
  }
}

/// SQLSTATE `not_null_violation`.
const NOT_NULL_VIOLATION: &str = "23502";

pub type Result<T, E = Error> = std::result::Result<T, E>;
