//! Handlers for `/cell-groups` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/cell-groups` | Body: `{"ministry_id":..,"name":..,"members":[..]}` |
//! | `GET`  | `/cell-groups/{id}` | Group with resolved members |
//! | `PUT`  | `/cell-groups/{id}` | Replaces name and description; `members`, when present, replaces the whole list |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use congrega_core::{
  cell::{CellGroupUpdate, CellGroupView, NewCellGroup},
  store::CommunityStore,
};
use uuid::Uuid;

use crate::{caller::Caller, error::ApiError};

/// `POST /cell-groups`: returns 201 + the stored group.
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn create<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewCellGroup>,
) -> Result<impl IntoResponse, ApiError> {
  let cell = caller.tenant(&*store).create_cell_group(body).await?;
  Ok((StatusCode::CREATED, Json(cell)))
}

/// `GET /cell-groups/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn get_one<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<CellGroupView>, ApiError> {
  Ok(Json(caller.tenant(&*store).resolve_cell_members(id).await?))
}

/// `PUT /cell-groups/{id}`: returns the group with its resolved members.
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn update<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
  Json(body): Json<CellGroupUpdate>,
) -> Result<Json<CellGroupView>, ApiError> {
  let tenant = caller.tenant(&*store);
  tenant.update_cell_group(id, body).await?;
  Ok(Json(tenant.resolve_cell_members(id).await?))
}
