//! Error types for `locus-core`.

use thiserror::Error;

/// Every failure of a tracker operation is exactly one of these.
#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input, detected before any storage access.
  #[error("invalid input: {0}")]
  Validation(String),

  /// Unknown device or passkey mismatch. The two are never distinguished.
  #[error("unauthorized")]
  Unauthorized,

  /// The passkey could not be sealed for storage.
  #[error("credential error: {0}")]
  Credential(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
