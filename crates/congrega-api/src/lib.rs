//! JSON REST API for Congrega.
//!
//! Exposes an axum [`Router`] backed by any
//! [`congrega_core::store::CommunityStore`]. Every route is tenant-scoped:
//! the tenant comes from the `x-company-id` header set by the upstream
//! gateway (see [`caller`]), and requests without it are rejected with 401.
//! The roles and permissions catalog ([`access`]) is shared across tenants
//! but sits behind the same header check.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", congrega_api::api_router(store.clone()))
//! ```

pub mod access;
pub mod attendance;
pub mod caller;
pub mod cells;
pub mod error;
pub mod events;
pub mod ministries;
pub mod people;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post, put},
};
use congrega_core::store::CommunityStore;

pub use caller::Caller;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CommunityStore + 'static,
{
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::update::<S>)
        .delete(people::deactivate::<S>),
    )
    .route("/people/{id}/toggle-status", patch(people::toggle_status::<S>))
    .route("/people/{id}/attendance", get(people::attendance::<S>))
    // Events
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    .route(
      "/events/{id}",
      get(events::get_one::<S>)
        .put(events::update::<S>)
        .delete(events::cancel::<S>),
    )
    .route("/events/{id}/people", get(events::roster::<S>))
    .route("/events/{id}/attendance", get(events::attendance::<S>))
    // Attendance
    .route("/attendance", post(attendance::mark::<S>))
    .route("/attendance/mark-multiple", post(attendance::mark_multiple::<S>))
    .route("/attendance/toggle", post(attendance::toggle::<S>))
    // Ministries
    .route(
      "/ministries",
      get(ministries::list::<S>).post(ministries::create::<S>),
    )
    .route("/ministries/{id}", get(ministries::get_one::<S>))
    .route(
      "/ministries/{id}/members/{person_id}",
      put(ministries::assign_role::<S>),
    )
    .route("/ministries/{id}/cell-groups", get(ministries::cell_groups::<S>))
    // Cell groups
    .route("/cell-groups", post(cells::create::<S>))
    .route(
      "/cell-groups/{id}",
      get(cells::get_one::<S>).put(cells::update::<S>),
    )
    // Access catalog
    .route(
      "/roles",
      get(access::list_roles::<S>).post(access::create_role::<S>),
    )
    .route("/roles/{id}", get(access::get_role::<S>))
    .route(
      "/permissions",
      get(access::list_permissions::<S>).post(access::create_permission::<S>),
    )
    .route("/permissions/{id}", get(access::get_permission::<S>))
    .with_state(store)
}
