//! Handlers for the shared access catalog.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/roles` | Insertion order |
//! | `POST` | `/roles` | Body: `{"module_id":..,"name":..,"description":null}` |
//! | `GET`  | `/roles/{id}` | 404 if not found |
//! | `GET`  | `/permissions` | Insertion order |
//! | `POST` | `/permissions` | Body: `{"name":..,"token":..}`; 409 if the name is taken |
//! | `GET`  | `/permissions/{id}` | 404 if not found |
//!
//! The catalog is not tenant-scoped, but callers still need a valid
//! `x-company-id` to reach it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use congrega_core::{
  Catalog,
  access::{NewPermission, NewRole, Permission, Role},
  store::CommunityStore,
};
use uuid::Uuid;

use crate::{caller::Caller, error::ApiError};

// ─── Roles ────────────────────────────────────────────────────────────────────

/// `GET /roles`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn list_roles<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<Role>>, ApiError> {
  Ok(Json(Catalog::new(&*store).list_roles().await?))
}

/// `POST /roles`: returns 201 + the stored role.
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn create_role<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewRole>,
) -> Result<impl IntoResponse, ApiError> {
  let role = Catalog::new(&*store).create_role(body).await?;
  Ok((StatusCode::CREATED, Json(role)))
}

/// `GET /roles/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn get_role<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Role>, ApiError> {
  Ok(Json(Catalog::new(&*store).get_role(id).await?))
}

// ─── Permissions ──────────────────────────────────────────────────────────────

/// `GET /permissions`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn list_permissions<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<Permission>>, ApiError> {
  Ok(Json(Catalog::new(&*store).list_permissions().await?))
}

/// `POST /permissions`: returns 201 + the stored permission.
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn create_permission<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewPermission>,
) -> Result<impl IntoResponse, ApiError> {
  let permission = Catalog::new(&*store).create_permission(body).await?;
  Ok((StatusCode::CREATED, Json(permission)))
}

/// `GET /permissions/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn get_permission<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Permission>, ApiError> {
  Ok(Json(Catalog::new(&*store).get_permission(id).await?))
}
