//! The identity context of a request.
//!
//! Authentication happens upstream; the gateway forwards the resolved tenant
//! in `x-company-id` and, when known, the acting user in `x-actor-id`.

use axum::{extract::FromRequestParts, http::request::Parts};
use congrega_core::{CompanyId, Tenant, store::CommunityStore};
use uuid::Uuid;

use crate::error::ApiError;

pub const COMPANY_HEADER: &str = "x-company-id";
pub const ACTOR_HEADER: &str = "x-actor-id";

#[derive(Debug, Clone, Copy)]
pub struct Caller {
  pub company: CompanyId,
  pub actor:   Option<Uuid>,
}

impl Caller {
  /// Scope `store` to this caller's tenant.
  pub fn tenant<'a, S: CommunityStore>(&self, store: &'a S) -> Tenant<'a, S> {
    Tenant::new(store, self.company)
  }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Option<Uuid>, ApiError> {
  let Some(value) = parts.headers.get(name) else {
    return Ok(None);
  };
  value
    .to_str()
    .ok()
    .and_then(|s| Uuid::parse_str(s.trim()).ok())
    .map(Some)
    .ok_or_else(|| ApiError::Unauthorized(format!("invalid {name} header")))
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let company = header_uuid(parts, COMPANY_HEADER)?.ok_or_else(|| {
      ApiError::Unauthorized(format!("missing {COMPANY_HEADER} header"))
    })?;
    let actor = header_uuid(parts, ACTOR_HEADER)?;
    Ok(Self { company: CompanyId::new(company), actor })
  }
}
