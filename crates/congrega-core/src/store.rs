//! The `CommunityStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `congrega-store-sqlite`). Every method takes the owning [`CompanyId`]
//! explicitly, and implementations must filter every read and write by it:
//! a record of another tenant behaves exactly as if it did not exist.
//!
//! Higher layers do not call the trait directly; they go through
//! [`Tenant`](crate::Tenant), which validates input and supplies the tenant.

use std::future::Future;

use uuid::Uuid;

use crate::{
  CompanyId,
  access::{NewPermission, NewRole, Permission, Role},
  attendance::AttendanceRecord,
  cell::{CellGroup, CellGroupUpdate, CellMembership, NewCellGroup},
  event::{Event, EventStatus, EventUpdate, NewEvent},
  ministry::{Ministry, MinistryMembership, NewMinistry},
  person::{NewPerson, Person, PersonStatus, PersonUpdate},
};

/// Error type of a [`CommunityStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the failure is a uniqueness-constraint violation, e.g. a
  /// second attendance record for the same `(event_id, person_id)`.
  fn is_conflict(&self) -> bool;
}

/// Abstraction over a tenant-partitioned community store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CommunityStore: Send + Sync {
  type Error: StoreError;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist a new, active person. `name` has already been validated.
  fn add_person(
    &self,
    company: CompanyId,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    company: CompanyId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// People of the tenant in insertion order, optionally filtered by status.
  fn list_people(
    &self,
    company: CompanyId,
    status: Option<PersonStatus>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Apply the `Some` fields of `update`; `Some(None)` clears the photo.
  /// Returns `None` if not found.
  fn update_person(
    &self,
    company: CompanyId,
    id: Uuid,
    update: PersonUpdate,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn set_person_status(
    &self,
    company: CompanyId,
    id: Uuid,
    status: PersonStatus,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Flip active and inactive in a single atomic write.
  fn toggle_person_status(
    &self,
    company: CompanyId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  fn add_event(
    &self,
    company: CompanyId,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// Fetch an event regardless of status.
  fn get_event(
    &self,
    company: CompanyId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn list_events(
    &self,
    company: CompanyId,
    status: Option<EventStatus>,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  fn update_event(
    &self,
    company: CompanyId,
    id: Uuid,
    update: EventUpdate,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn set_event_status(
    &self,
    company: CompanyId,
    id: Uuid,
    status: EventStatus,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Insert a presence record. A second record for the same pair must fail
  /// with an error whose [`StoreError::is_conflict`] is `true`.
  fn mark_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  /// Atomically remove the pair's record if present, or insert one if not.
  /// Returns whether the person is present afterwards.
  fn toggle_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_event_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  fn list_person_attendance(
    &self,
    company: CompanyId,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  // ── Ministries ────────────────────────────────────────────────────────

  fn add_ministry(
    &self,
    company: CompanyId,
    input: NewMinistry,
  ) -> impl Future<Output = Result<Ministry, Self::Error>> + Send + '_;

  fn get_ministry(
    &self,
    company: CompanyId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Ministry>, Self::Error>> + Send + '_;

  fn list_ministries(
    &self,
    company: CompanyId,
  ) -> impl Future<Output = Result<Vec<Ministry>, Self::Error>> + Send + '_;

  /// Insert or replace the role for `(ministry_id, person_id)`.
  fn set_ministry_role(
    &self,
    company: CompanyId,
    membership: MinistryMembership,
  ) -> impl Future<Output = Result<MinistryMembership, Self::Error>> + Send + '_;

  fn get_ministry_membership(
    &self,
    company: CompanyId,
    ministry_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Option<MinistryMembership>, Self::Error>>
  + Send
  + '_;

  // ── Cell groups ───────────────────────────────────────────────────────

  /// Insert a cell group and its member links in one transaction.
  /// `input.members` is already free of duplicates.
  fn add_cell_group(
    &self,
    company: CompanyId,
    input: NewCellGroup,
  ) -> impl Future<Output = Result<CellGroup, Self::Error>> + Send + '_;

  fn get_cell_group(
    &self,
    company: CompanyId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CellGroup>, Self::Error>> + Send + '_;

  fn list_cell_groups(
    &self,
    company: CompanyId,
    ministry_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CellGroup>, Self::Error>> + Send + '_;

  /// In one transaction: overwrite name and description, and when
  /// `update.members` is `Some`, delete every existing link and insert the
  /// new list. Returns `None` (with nothing written) if not found.
  fn update_cell_group(
    &self,
    company: CompanyId,
    id: Uuid,
    update: CellGroupUpdate,
  ) -> impl Future<Output = Result<Option<CellGroup>, Self::Error>> + Send + '_;

  /// Member links of a cell group in insertion order.
  fn list_cell_members(
    &self,
    company: CompanyId,
    cell_group_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CellMembership>, Self::Error>> + Send + '_;

  // ── Access catalog ────────────────────────────────────────────────────
  //
  // Shared by all tenants, so these methods take no `CompanyId`.

  fn add_role(
    &self,
    input: NewRole,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_;

  fn get_role(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  fn list_roles(
    &self,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  /// A permission name already in use must fail with a conflict error.
  fn add_permission(
    &self,
    input: NewPermission,
  ) -> impl Future<Output = Result<Permission, Self::Error>> + Send + '_;

  fn get_permission(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Permission>, Self::Error>> + Send + '_;

  fn list_permissions(
    &self,
  ) -> impl Future<Output = Result<Vec<Permission>, Self::Error>> + Send + '_;
}
