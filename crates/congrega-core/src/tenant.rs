//! Tenant identity and the tenant-scoped view over a store.
//!
//! A [`Tenant`] is built once per request from the caller's resolved
//! `company_id`. Every operation in this crate is a method on it, so every
//! store call carries the tenant filter without the caller repeating it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::CommunityStore;

/// The tenant (`company_id`) that owns every record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct CompanyId(Uuid);

impl CompanyId {
  pub fn new(id: Uuid) -> Self { Self(id) }

  pub fn random() -> Self { Self(Uuid::new_v4()) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl From<Uuid> for CompanyId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for CompanyId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// A store handle pinned to a single tenant.
///
/// Operations are defined in the domain modules (`person`, `event`,
/// `attendance`, `ministry`, `cell`, `roster`) as inherent methods.
pub struct Tenant<'a, S> {
  pub(crate) store:   &'a S,
  pub(crate) company: CompanyId,
}

impl<'a, S: CommunityStore> Tenant<'a, S> {
  pub fn new(store: &'a S, company: CompanyId) -> Self {
    Self { store, company }
  }

  pub fn company(&self) -> CompanyId { self.company }
}

impl<S> fmt::Debug for Tenant<'_, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Tenant")
      .field("company", &self.company)
      .finish_non_exhaustive()
  }
}
