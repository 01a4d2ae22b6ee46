//! Handlers for `/ministries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/ministries` | |
//! | `POST` | `/ministries` | Body: `{"name":"..","description":null}` |
//! | `GET`  | `/ministries/{id}` | 404 if not found |
//! | `PUT`  | `/ministries/{id}/members/{person_id}` | Body: `{"role":"LEADER"}`; role defaults to `MEMBER` |
//! | `GET`  | `/ministries/{id}/cell-groups` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use congrega_core::{
  cell::CellGroup,
  ministry::{DEFAULT_ROLE, Ministry, MinistryMembership, NewMinistry},
  store::CommunityStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::Caller, error::ApiError};

/// `GET /ministries`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn list<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<Ministry>>, ApiError> {
  Ok(Json(caller.tenant(&*store).list_ministries().await?))
}

/// `POST /ministries`: returns 201 + the stored ministry.
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn create<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewMinistry>,
) -> Result<impl IntoResponse, ApiError> {
  let ministry = caller.tenant(&*store).create_ministry(body).await?;
  Ok((StatusCode::CREATED, Json(ministry)))
}

/// `GET /ministries/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn get_one<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Ministry>, ApiError> {
  Ok(Json(caller.tenant(&*store).get_ministry(id).await?))
}

// ─── Roles ────────────────────────────────────────────────────────────────────

fn default_role() -> String { DEFAULT_ROLE.to_owned() }

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  #[serde(default = "default_role")]
  pub role: String,
}

/// `PUT /ministries/{id}/members/{person_id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn assign_role<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path((id, person_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<RoleBody>,
) -> Result<Json<MinistryMembership>, ApiError> {
  let membership = caller
    .tenant(&*store)
    .assign_ministry_role(id, person_id, &body.role)
    .await?;
  Ok(Json(membership))
}

/// `GET /ministries/{id}/cell-groups`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn cell_groups<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CellGroup>>, ApiError> {
  Ok(Json(caller.tenant(&*store).list_cell_groups(id).await?))
}
