//! People: the tenant's roster of members and visitors.
//!
//! People are never hard-deleted. Removing someone flips their status to
//! [`PersonStatus::Inactive`], which takes them off event rosters.

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
pub enum PersonStatus {
  #[default]
  Active,
  Inactive,
}

impl PersonStatus {
  pub fn toggled(self) -> Self {
    match self {
      Self::Active => Self::Inactive,
      Self::Inactive => Self::Active,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:  Uuid,
  pub company_id: CompanyId,
  pub name:       String,
  /// Free-form category tag, e.g. "member" or "visitor".
  #[serde(rename = "type")]
  pub kind:       String,
  /// URI of the profile photo, if one was uploaded.
  pub photo:      Option<String>,
  pub status:     PersonStatus,
  pub created_at: DateTime<Utc>,
}

/// Input to [`Tenant::create_person`]. New people always start active.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
  pub name:  String,
  #[serde(rename = "type", default)]
  pub kind:  String,
  pub photo: Option<String>,
}

/// Partial update; `None` fields keep their stored value. `photo` can also be
/// cleared with an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonUpdate {
  pub name:  Option<String>,
  #[serde(rename = "type")]
  pub kind:  Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub photo: Option<Option<String>>,
}

const ENTITY: &str = "person";

impl<S: CommunityStore> Tenant<'_, S> {
  #[tracing::instrument(skip(self, input), fields(company = %self.company))]
  pub async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let name = required("name", &input.name)?;
    let person = self
      .store
      .add_person(self.company, NewPerson { name, ..input })
      .await
      .map_err(Error::from_store)?;
    tracing::info!(person_id = %person.person_id, "person created");
    Ok(person)
  }

  /// All people of the tenant in insertion order, optionally by status.
  pub async fn list_people(
    &self,
    status: Option<PersonStatus>,
  ) -> Result<Vec<Person>> {
    self
      .store
      .list_people(self.company, status)
      .await
      .map_err(Error::from_store)
  }

  pub async fn get_person(&self, id: Uuid) -> Result<Person> {
    self
      .store
      .get_person(self.company, id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))
  }

  #[tracing::instrument(skip(self, update), fields(company = %self.company))]
  pub async fn update_person(
    &self,
    id: Uuid,
    mut update: PersonUpdate,
  ) -> Result<Person> {
    if let Some(name) = &update.name {
      update.name = Some(required("name", name)?);
    }
    self
      .store
      .update_person(self.company, id, update)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))
  }

  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn deactivate_person(&self, id: Uuid) -> Result<Person> {
    self.set_person_status(id, PersonStatus::Inactive).await
  }

  /// Flip active ↔ inactive in one store call, so concurrent toggles
  /// serialize instead of both writing the same status.
  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn toggle_person_status(&self, id: Uuid) -> Result<Person> {
    let person = self
      .store
      .toggle_person_status(self.company, id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))?;
    tracing::info!(person_id = %id, status = ?person.status, "person status toggled");
    Ok(person)
  }

  async fn set_person_status(
    &self,
    id: Uuid,
    status: PersonStatus,
  ) -> Result<Person> {
    let person = self
      .store
      .set_person_status(self.company, id, status)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))?;
    tracing::info!(person_id = %id, ?status, "person status changed");
    Ok(person)
  }
}
