//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Optional `?status=active\|inactive` |
//! | `POST`   | `/people` | Body: `{"name":"..","type":"member","photo":null}` |
//! | `GET`    | `/people/{id}` | 404 if not found |
//! | `PUT`    | `/people/{id}` | Partial: absent fields are kept, `"photo":null` clears |
//! | `DELETE` | `/people/{id}` | Deactivates; nothing is erased |
//! | `PATCH`  | `/people/{id}/toggle-status` | active ↔ inactive |
//! | `GET`    | `/people/{id}/attendance` | Every event the person attended |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use congrega_core::{
  attendance::AttendanceRecord,
  person::{NewPerson, Person, PersonStatus, PersonUpdate},
  store::CommunityStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::Caller, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<PersonStatus>,
}

/// `GET /people[?status=<status>]`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn list<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let people = caller.tenant(&*store).list_people(params.status).await?;
  Ok(Json(people))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people`: returns 201 + the stored person.
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn create<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  let person = caller.tenant(&*store).create_person(body).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Single person ────────────────────────────────────────────────────────────

/// `GET /people/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn get_one<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
  Ok(Json(caller.tenant(&*store).get_person(id).await?))
}

/// `PUT /people/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn update<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
  Json(body): Json<PersonUpdate>,
) -> Result<Json<Person>, ApiError> {
  Ok(Json(caller.tenant(&*store).update_person(id, body).await?))
}

/// `DELETE /people/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn deactivate<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
  Ok(Json(caller.tenant(&*store).deactivate_person(id).await?))
}

/// `PATCH /people/{id}/toggle-status`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn toggle_status<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
  Ok(Json(caller.tenant(&*store).toggle_person_status(id).await?))
}

/// `GET /people/{id}/attendance`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn attendance<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError> {
  Ok(Json(caller.tenant(&*store).person_attendance(id).await?))
}
