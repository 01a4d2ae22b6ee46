//! Handlers for `/events` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/events` | Active events only |
//! | `POST`   | `/events` | Body: `{"name":"..","description":null,"starts_at":null}` |
//! | `GET`    | `/events/{id}` | 404 for canceled events |
//! | `PUT`    | `/events/{id}` | Partial: absent fields are kept, `null` clears `description` or `starts_at` |
//! | `DELETE` | `/events/{id}` | Cancels; attendance history stays |
//! | `GET`    | `/events/{id}/people` | Roster of active people with presence |
//! | `GET`    | `/events/{id}/attendance` | Raw attendance records |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use congrega_core::{
  attendance::AttendanceRecord,
  event::{Event, EventUpdate, NewEvent},
  roster::RosterEntry,
  store::CommunityStore,
};
use uuid::Uuid;

use crate::{caller::Caller, error::ApiError};

/// `GET /events`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn list<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<Event>>, ApiError> {
  Ok(Json(caller.tenant(&*store).list_events().await?))
}

/// `POST /events`: returns 201 + the stored event.
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn create<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse, ApiError> {
  let event = caller.tenant(&*store).create_event(body).await?;
  Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn get_one<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
  Ok(Json(caller.tenant(&*store).get_event(id).await?))
}

/// `PUT /events/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn update<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
  Json(body): Json<EventUpdate>,
) -> Result<Json<Event>, ApiError> {
  Ok(Json(caller.tenant(&*store).update_event(id, body).await?))
}

/// `DELETE /events/{id}`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn cancel<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
  Ok(Json(caller.tenant(&*store).cancel_event(id).await?))
}

/// `GET /events/{id}/people`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn roster<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<RosterEntry>>, ApiError> {
  Ok(Json(caller.tenant(&*store).resolve_roster(id).await?))
}

/// `GET /events/{id}/attendance`
#[tracing::instrument(skip_all, fields(company = %caller.company, actor = ?caller.actor))]
pub async fn attendance<S: CommunityStore>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError> {
  Ok(Json(caller.tenant(&*store).event_attendance(id).await?))
}
