//! Events: services, meetings, and gatherings that attendance is taken for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  CompanyId, Error, Result, Tenant,
  error::required,
  patch::double_option,
  store::CommunityStore,
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
  #[default]
  Active,
  /// Soft-deleted. Canceled events keep their attendance history.
  Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:    Uuid,
  pub company_id:  CompanyId,
  pub name:        String,
  pub description: Option<String>,
  pub starts_at:   Option<DateTime<Utc>>,
  pub status:      EventStatus,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
  pub name:        String,
  pub description: Option<String>,
  pub starts_at:   Option<DateTime<Utc>>,
}

/// Partial update; absent fields keep their stored value, and an explicit
/// `null` clears `description` or `starts_at`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
  pub name:        Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub description: Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub starts_at:   Option<Option<DateTime<Utc>>>,
}

const ENTITY: &str = "event";

impl<S: CommunityStore> Tenant<'_, S> {
  #[tracing::instrument(skip(self, input), fields(company = %self.company))]
  pub async fn create_event(&self, input: NewEvent) -> Result<Event> {
    let name = required("name", &input.name)?;
    let event = self
      .store
      .add_event(self.company, NewEvent { name, ..input })
      .await
      .map_err(Error::from_store)?;
    tracing::info!(event_id = %event.event_id, "event created");
    Ok(event)
  }

  /// Active events only; canceled ones are hidden from listings.
  pub async fn list_events(&self) -> Result<Vec<Event>> {
    self
      .store
      .list_events(self.company, Some(EventStatus::Active))
      .await
      .map_err(Error::from_store)
  }

  /// Fetch an active event. Canceled events read as not found.
  pub async fn get_event(&self, id: Uuid) -> Result<Event> {
    self
      .find_event(id)
      .await?
      .filter(|e| e.status == EventStatus::Active)
      .ok_or_else(|| Error::not_found(ENTITY, id))
  }

  #[tracing::instrument(skip(self, update), fields(company = %self.company))]
  pub async fn update_event(
    &self,
    id: Uuid,
    mut update: EventUpdate,
  ) -> Result<Event> {
    if let Some(name) = &update.name {
      update.name = Some(required("name", name)?);
    }
    self
      .store
      .update_event(self.company, id, update)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))
  }

  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn cancel_event(&self, id: Uuid) -> Result<Event> {
    let event = self
      .store
      .set_event_status(self.company, id, EventStatus::Canceled)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))?;
    tracing::info!(event_id = %id, "event canceled");
    Ok(event)
  }

  /// Any event of the tenant regardless of status.
  pub(crate) async fn find_event(&self, id: Uuid) -> Result<Option<Event>> {
    self
      .store
      .get_event(self.company, id)
      .await
      .map_err(Error::from_store)
  }

  /// Like [`Self::find_event`] but absence is an error.
  pub(crate) async fn require_event(&self, id: Uuid) -> Result<Event> {
    self
      .find_event(id)
      .await?
      .ok_or_else(|| Error::not_found(ENTITY, id))
  }
}
