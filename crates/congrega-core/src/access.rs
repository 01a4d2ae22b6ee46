//! The access catalog: roles (scoped to an application module) and
//! permissions (named tokens).
//!
//! The catalog is shared by every tenant, so it is reached through
//! [`Catalog`] rather than a [`Tenant`](crate::Tenant). Nothing here enforces
//! permissions; the catalog only records them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  error::{required, store_err},
  store::CommunityStore,
};

/// Message of the conflict returned for a permission name already in use.
pub const PERMISSION_TAKEN: &str = "permission name already exists";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
  pub role_id:     Uuid,
  /// The application module the role belongs to.
  pub module_id:   Uuid,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRole {
  pub module_id:   Uuid,
  pub name:        String,
  pub description: Option<String>,
}

/// A named permission. Names are unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
  pub permission_id: Uuid,
  pub name:          String,
  pub token:         String,
  pub description:   Option<String>,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPermission {
  pub name:        String,
  pub token:       String,
  pub description: Option<String>,
}

/// A store handle for the tenant-independent access catalog.
pub struct Catalog<'a, S> {
  store: &'a S,
}

impl<S> fmt::Debug for Catalog<'_, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Catalog").finish_non_exhaustive()
  }
}

impl<'a, S: CommunityStore> Catalog<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  // ── Roles ─────────────────────────────────────────────────────────────

  #[tracing::instrument(skip(self, input))]
  pub async fn create_role(&self, input: NewRole) -> Result<Role> {
    let name = required("name", &input.name)?;
    let role = self
      .store
      .add_role(NewRole { name, ..input })
      .await
      .map_err(Error::from_store)?;
    tracing::info!(role_id = %role.role_id, "role created");
    Ok(role)
  }

  pub async fn list_roles(&self) -> Result<Vec<Role>> {
    self.store.list_roles().await.map_err(Error::from_store)
  }

  pub async fn get_role(&self, id: Uuid) -> Result<Role> {
    self
      .store
      .get_role(id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found("role", id))
  }

  // ── Permissions ───────────────────────────────────────────────────────

  /// Fails with [`Error::Conflict`] when the trimmed name is already taken.
  #[tracing::instrument(skip(self, input))]
  pub async fn create_permission(&self, input: NewPermission) -> Result<Permission> {
    let input = NewPermission {
      name:        required("name", &input.name)?,
      token:       required("token", &input.token)?,
      description: input.description,
    };
    let permission = self
      .store
      .add_permission(input)
      .await
      .map_err(store_err(PERMISSION_TAKEN))?;
    tracing::info!(permission_id = %permission.permission_id, "permission created");
    Ok(permission)
  }

  pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
    self.store.list_permissions().await.map_err(Error::from_store)
  }

  pub async fn get_permission(&self, id: Uuid) -> Result<Permission> {
    self
      .store
      .get_permission(id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::not_found("permission", id))
  }
}
