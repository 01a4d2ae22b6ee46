//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Handlers are instrumented with the caller's tenant and actor, so the
/// `error!` below is emitted inside that span.
impl From<congrega_core::Error> for ApiError {
  fn from(err: congrega_core::Error) -> Self {
    use congrega_core::Error as E;
    match err {
      e @ E::NotFound { .. } => Self::NotFound(e.to_string()),
      E::Validation(m) => Self::BadRequest(m),
      E::Conflict(m) => Self::Conflict(m),
      E::Store(e) => {
        tracing::error!(error = %e, "store failure");
        Self::Internal(e)
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      // Backend details stay in the log.
      ApiError::Internal(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_owned(),
      ),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
