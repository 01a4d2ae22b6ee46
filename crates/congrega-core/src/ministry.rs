//! Ministries and the roles people hold in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  CompanyId, Error, Result, Tenant,
  error::required,
  store::CommunityStore,
};

/// Role reported for cell members without a ministry membership.
pub const DEFAULT_ROLE: &str = "MEMBER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ministry {
  pub ministry_id: Uuid,
  pub company_id:  CompanyId,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMinistry {
  pub name:        String,
  pub description: Option<String>,
}

/// A person's role within a ministry. Unique per `(ministry_id, person_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinistryMembership {
  pub company_id:  CompanyId,
  pub ministry_id: Uuid,
  pub person_id:   Uuid,
  pub role:        String,
}

const ENTITY: &str = "ministry";

impl<S: CommunityStore> Tenant<'_, S> {
  #[tracing::instrument(skip(self, input), fields(company = %self.company))]
  pub async fn create_ministry(&self, input: NewMinistry) -> Result<Ministry> {
    let name = required("name", &input.name)?;
    let ministry = self
      .store
      .add_ministry(self.company, NewMinistry { name, ..input })
      .await
      .map_err(Error::from_store)?;
    tracing::info!(ministry_id = %ministry.ministry_id, "ministry created");
    Ok(ministry)
  }

  pub async fn list_ministries(&self) -> Result<Vec<Ministry>> {
    self
      .store
      .list_ministries(self.company)
      .await
      .map_err(Error::from_store)
  }

  pub async fn get_ministry(&self, id: Uuid) -> Result<Ministry> {
    self
      .store
      .get_ministry(self.company, id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))
  }

  /// Set (or replace) a person's role in a ministry.
  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn assign_ministry_role(
    &self,
    ministry_id: Uuid,
    person_id: Uuid,
    role: &str,
  ) -> Result<MinistryMembership> {
    let role = required("role", role)?;
    self.get_ministry(ministry_id).await?;
    self.get_person(person_id).await?;

    self
      .store
      .set_ministry_role(self.company, MinistryMembership {
        company_id: self.company,
        ministry_id,
        person_id,
        role,
      })
      .await
      .map_err(Error::from_store)
  }
}
