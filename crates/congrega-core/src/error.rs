//! Error types for `congrega-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  /// The referenced entity does not exist, or exists under another tenant.
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: Uuid },

  #[error("validation failed: {0}")]
  Validation(String),

  /// A uniqueness constraint rejected the write. The message is meant for
  /// clients and never carries backend detail.
  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: &'static str, id: Uuid) -> Self {
    Self::NotFound { entity, id }
  }

  /// Classify a backend error, keeping uniqueness violations distinct from
  /// plain store failures. The backend's own description of a violation is
  /// logged, not returned.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    if err.is_conflict() {
      tracing::debug!(error = %err, "uniqueness violation");
      Self::Conflict("record already exists".to_owned())
    } else {
      Self::Store(Box::new(err))
    }
  }
}

/// Conversion for store calls whose only uniqueness constraint has a known
/// meaning: a conflict gets `message` in place of the generic one.
pub(crate) fn store_err<E: StoreError>(message: &'static str) -> impl Fn(E) -> Error {
  move |err| match Error::from_store(err) {
    Error::Conflict(_) => Error::Conflict(message.to_owned()),
    other => other,
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Trim a required text field, rejecting it when nothing is left.
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  Ok(trimmed.to_owned())
}
