//! Handlers for `/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/attendance` | Body: [`MarkBody`]; 201, or 409 if already present |
//! | `POST` | `/attendance/mark-multiple` | Body: [`MarkManyBody`]; returns new records |
//! | `POST` | `/attendance/toggle` | Body: [`MarkBody`]; returns `{"present":bool}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use congrega_core::{attendance::Presence, store::CommunityStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::Caller, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct MarkBody {
  pub event_id:  Uuid,
  pub person_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MarkManyBody {
  pub event_id:   Uuid,
  pub person_ids: Vec<Uuid>,
}

/// `POST /attendance`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn mark<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<MarkBody>,
) -> Result<impl IntoResponse, ApiError> {
  let record = caller
    .tenant(&*store)
    .mark_attendance(body.event_id, body.person_id)
    .await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `POST /attendance/mark-multiple`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn mark_multiple<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<MarkManyBody>,
) -> Result<impl IntoResponse, ApiError> {
  let records = caller
    .tenant(&*store)
    .mark_many(body.event_id, body.person_ids)
    .await?;
  Ok((StatusCode::CREATED, Json(records)))
}

/// `POST /attendance/toggle`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn toggle<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<MarkBody>,
) -> Result<Json<Presence>, ApiError> {
  let presence = caller
    .tenant(&*store)
    .toggle_attendance(body.event_id, body.person_id)
    .await?;
  Ok(Json(presence))
}
