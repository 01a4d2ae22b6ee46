//! Cell groups (small groups that belong to a ministry) and the resolver
//! that turns their membership links into an enriched member list.
//!
//! A cell group's member list is only ever replaced wholesale. The store
//! performs the field update, the removal of old links, and the insertion of
//! new links in one transaction, so readers never observe a half-written list.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  CompanyId, Error, Result, Tenant,
  error::required,
  ministry::DEFAULT_ROLE,
  store::CommunityStore,
};

/// Display name for a linked person that cannot be resolved in the tenant.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellGroup {
  pub cell_group_id: Uuid,
  pub company_id:    CompanyId,
  pub ministry_id:   Uuid,
  pub name:          String,
  pub description:   Option<String>,
  pub created_at:    DateTime<Utc>,
}

/// Link between a cell group and a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMembership {
  pub company_id:    CompanyId,
  pub cell_group_id: Uuid,
  pub person_id:     Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCellGroup {
  pub ministry_id: Uuid,
  pub name:        String,
  pub description: Option<String>,
  #[serde(default)]
  pub members:     Vec<Uuid>,
}

/// Full replacement of a cell group's fields.
///
/// `members: None` leaves the current links alone; `Some(vec![])` removes
/// every member.
#[derive(Debug, Clone, Deserialize)]
pub struct CellGroupUpdate {
  pub name:        String,
  pub description: Option<String>,
  #[serde(default)]
  pub members:     Option<Vec<Uuid>>,
}

/// Read model returned by [`Tenant::resolve_cell_members`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellGroupView {
  pub id:          Uuid,
  pub name:        String,
  pub description: Option<String>,
  pub members:     Vec<CellMemberView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMemberView {
  pub id:    Uuid,
  pub name:  String,
  pub photo: Option<String>,
  pub role:  String,
}

const ENTITY: &str = "cell group";

/// Drop repeated ids, keeping the first occurrence and the input order.
pub(crate) fn unique_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
  let mut seen = HashSet::with_capacity(ids.len());
  ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl<S: CommunityStore> Tenant<'_, S> {
  /// Create a cell group under one of the tenant's ministries, linking the
  /// initial members in the same store transaction.
  #[tracing::instrument(skip(self, input), fields(company = %self.company))]
  pub async fn create_cell_group(&self, input: NewCellGroup) -> Result<CellGroup> {
    let name = required("name", &input.name)?;
    self.get_ministry(input.ministry_id).await?;

    let input = NewCellGroup {
      name,
      members: unique_ids(input.members),
      ..input
    };
    let member_count = input.members.len();
    let cell = self
      .store
      .add_cell_group(self.company, input)
      .await
      .map_err(Error::from_store)?;
    tracing::info!(
      cell_group_id = %cell.cell_group_id,
      members = member_count,
      "cell group created"
    );
    Ok(cell)
  }

  /// Cell groups of one of the tenant's ministries.
  pub async fn list_cell_groups(&self, ministry_id: Uuid) -> Result<Vec<CellGroup>> {
    self.get_ministry(ministry_id).await?;
    self
      .store
      .list_cell_groups(self.company, ministry_id)
      .await
      .map_err(Error::from_store)
  }

  /// Resolve a cell group's members to names, photos and ministry roles.
  ///
  /// Members are emitted in link order. A link whose person cannot be found
  /// in this tenant is reported as [`UNKNOWN_NAME`] rather than dropped, and a
  /// person without a ministry membership gets [`DEFAULT_ROLE`].
  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn resolve_cell_members(&self, id: Uuid) -> Result<CellGroupView> {
    let cell = self
      .store
      .get_cell_group(self.company, id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))?;

    let links = self
      .store
      .list_cell_members(self.company, id)
      .await
      .map_err(Error::from_store)?;

    let mut members = Vec::with_capacity(links.len());
    for link in links {
      let person = self
        .store
        .get_person(self.company, link.person_id)
        .await
        .map_err(Error::from_store)?;
      let membership = self
        .store
        .get_ministry_membership(self.company, cell.ministry_id, link.person_id)
        .await
        .map_err(Error::from_store)?;

      let role = membership.map_or_else(|| DEFAULT_ROLE.to_owned(), |m| m.role);
      members.push(match person {
        Some(p) => CellMemberView {
          id: p.person_id,
          name: p.name,
          photo: p.photo,
          role,
        },
        None => {
          tracing::debug!(person_id = %link.person_id, "cell member not resolvable");
          CellMemberView {
            id: link.person_id,
            name: UNKNOWN_NAME.to_owned(),
            photo: None,
            role,
          }
        }
      });
    }

    Ok(CellGroupView {
      id: cell.cell_group_id,
      name: cell.name,
      description: cell.description,
      members,
    })
  }

  /// Replace a cell group's name and description and, when `members` is
  /// present, its entire member list.
  #[tracing::instrument(skip(self, update), fields(company = %self.company))]
  pub async fn update_cell_group(
    &self,
    id: Uuid,
    update: CellGroupUpdate,
  ) -> Result<CellGroup> {
    let update = CellGroupUpdate {
      name:        required("name", &update.name)?,
      description: update.description,
      members:     update.members.map(unique_ids),
    };
    let replaced = update.members.as_ref().map(Vec::len);

    let cell = self
      .store
      .update_cell_group(self.company, id, update)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found(ENTITY, id))?;
    tracing::info!(cell_group_id = %id, ?replaced, "cell group updated");
    Ok(cell)
  }
}
