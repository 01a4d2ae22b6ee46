//! Attendance: who was present at which event.
//!
//! A record's existence means the person was present. The store enforces at
//! most one record per `(event_id, person_id)` pair, and
//! [`Tenant::toggle_attendance`] flips presence in a single atomic store call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  CompanyId, Error, Result, Tenant, cell::unique_ids, error::store_err,
  store::CommunityStore,
};

/// Message of the conflict returned when a pair is marked twice.
pub const ALREADY_RECORDED: &str = "attendance already recorded";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub attendance_id: Uuid,
  pub company_id:    CompanyId,
  pub event_id:      Uuid,
  pub person_id:     Uuid,
  pub recorded_at:   DateTime<Utc>,
}

/// Presence of one person at one event after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
  pub present: bool,
}

impl<S: CommunityStore> Tenant<'_, S> {
  /// Flip a person's presence for an event: absent becomes present and
  /// present becomes absent.
  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn toggle_attendance(
    &self,
    event_id: Uuid,
    person_id: Uuid,
  ) -> Result<Presence> {
    self.require_event(event_id).await?;
    self.get_person(person_id).await?;

    let present = self
      .store
      .toggle_attendance(self.company, event_id, person_id)
      .await
      .map_err(Error::from_store)?;
    tracing::info!(%event_id, %person_id, present, "attendance toggled");
    Ok(Presence { present })
  }

  /// Record presence. Fails with [`Error::Conflict`] if the person is
  /// already marked present.
  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn mark_attendance(
    &self,
    event_id: Uuid,
    person_id: Uuid,
  ) -> Result<AttendanceRecord> {
    self.require_event(event_id).await?;
    self.get_person(person_id).await?;

    self
      .store
      .mark_attendance(self.company, event_id, person_id)
      .await
      .map_err(store_err(ALREADY_RECORDED))
  }

  /// Mark several people present at once, skipping anyone already present.
  /// Returns only the records created by this call.
  ///
  /// Every person is checked before the first write, so an unknown id leaves
  /// attendance untouched.
  #[tracing::instrument(skip(self, person_ids), fields(company = %self.company))]
  pub async fn mark_many(
    &self,
    event_id: Uuid,
    person_ids: Vec<Uuid>,
  ) -> Result<Vec<AttendanceRecord>> {
    self.require_event(event_id).await?;

    let person_ids = unique_ids(person_ids);
    for &person_id in &person_ids {
      self.get_person(person_id).await?;
    }

    let mut created = Vec::with_capacity(person_ids.len());
    for person_id in person_ids {
      match self
        .store
        .mark_attendance(self.company, event_id, person_id)
        .await
        .map_err(Error::from_store)
      {
        Ok(record) => created.push(record),
        Err(Error::Conflict(_)) => {
          tracing::debug!(%person_id, "already present, skipped");
        }
        Err(e) => return Err(e),
      }
    }
    Ok(created)
  }

  pub async fn event_attendance(
    &self,
    event_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>> {
    self.require_event(event_id).await?;
    self
      .store
      .list_event_attendance(self.company, event_id)
      .await
      .map_err(Error::from_store)
  }

  pub async fn person_attendance(
    &self,
    person_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>> {
    self.get_person(person_id).await?;
    self
      .store
      .list_person_attendance(self.company, person_id)
      .await
      .map_err(Error::from_store)
  }
}
