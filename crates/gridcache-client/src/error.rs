//! Error type for `gridcache-client`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  /// A transient failure (timeout, connection error, 5xx) that persisted
  /// through every retry attempt.
  #[error("request to {url} failed after {attempts} attempts: {reason}")]
  Transport {
    url:      String,
    attempts: u32,
    reason:   String,
  },

  /// A non-transient HTTP status (4xx). Never retried.
  #[error("{url} returned HTTP {status}")]
  Http { url: String, status: StatusCode },

  /// The body was not JSON, or lacked the expected `MRData` envelope.
  /// Never retried.
  #[error("malformed response from {url}: {reason}")]
  Malformed { url: String, reason: String },
}

impl Error {
  /// Whether a retry could plausibly succeed.
  pub fn is_transient(&self) -> bool {
    matches!(self, Error::Transport { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
