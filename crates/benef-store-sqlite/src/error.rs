//! Error type for `benef-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The database refused a write because it violates a constraint
  /// (uniqueness, foreign key, check). Carries SQLite's message.
  #[error("constraint violation: {0}")]
  Conflict(String),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("invalid value in column {column}: {value:?}")]
  InvalidColumn { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
