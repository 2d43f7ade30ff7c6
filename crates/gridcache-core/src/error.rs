//! Error types for `gridcache-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The requested season range could not be parsed from its textual form.
  #[error("invalid season range {0:?}: expected START:END, for example 2005:2025")]
  MalformedRange(String),

  #[error("invalid season range: start {start} must be less than or equal to end {end}")]
  InvalidRange { start: i32, end: i32 },

  /// The requested bound does not intersect the seasons the API knows about.
  /// Non-fatal: callers report it and carry on with zero seasons.
  #[error("no available seasons found in selected range {start}:{end}")]
  EmptyRange { start: i32, end: i32 },

  #[error("no seasons returned by the results API")]
  NoSeasonsAvailable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
