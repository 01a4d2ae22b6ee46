//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone as _, Utc};
use congrega_core::{
  Catalog, CompanyId, Error as CoreError, Tenant,
  access::{NewPermission, NewRole, PERMISSION_TAKEN},
  cell::{CellGroupUpdate, NewCellGroup, UNKNOWN_NAME},
  event::{EventStatus, EventUpdate, NewEvent},
  ministry::{DEFAULT_ROLE, MinistryMembership, NewMinistry},
  person::{NewPerson, PersonStatus, PersonUpdate},
  store::{CommunityStore, StoreError},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_person(name: &str) -> NewPerson {
  NewPerson {
    name:  name.into(),
    kind:  "member".into(),
    photo: None,
  }
}

fn new_event(name: &str) -> NewEvent {
  NewEvent {
    name:        name.into(),
    description: None,
    starts_at:   None,
  }
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;
  let company = CompanyId::random();

  let person = s.add_person(company, new_person("Alice")).await.unwrap();
  assert_eq!(person.status, PersonStatus::Active);

  let fetched = s.get_person(company, person.person_id).await.unwrap();
  assert_eq!(fetched, Some(person));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  let result = s.get_person(CompanyId::random(), Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn person_of_other_company_is_invisible() {
  let s = store().await;
  let owner = CompanyId::random();
  let other = CompanyId::random();
  let person = s.add_person(owner, new_person("Alice")).await.unwrap();

  assert!(s.get_person(other, person.person_id).await.unwrap().is_none());
  assert!(s.list_people(other, None).await.unwrap().is_empty());
  assert!(
    s.set_person_status(other, person.person_id, PersonStatus::Inactive)
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn list_people_filters_by_status_in_insertion_order() {
  let s = store().await;
  let company = CompanyId::random();
  let a = s.add_person(company, new_person("A")).await.unwrap();
  let b = s.add_person(company, new_person("B")).await.unwrap();
  let c = s.add_person(company, new_person("C")).await.unwrap();
  s.set_person_status(company, b.person_id, PersonStatus::Inactive)
    .await
    .unwrap();

  let all: Vec<_> = s
    .list_people(company, None)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.person_id)
    .collect();
  assert_eq!(all, [a.person_id, b.person_id, c.person_id]);

  let active: Vec<_> = s
    .list_people(company, Some(PersonStatus::Active))
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.person_id)
    .collect();
  assert_eq!(active, [a.person_id, c.person_id]);
}

#[tokio::test]
async fn update_person_keeps_absent_fields() {
  let s = store().await;
  let company = CompanyId::random();
  let person = s
    .add_person(company, NewPerson {
      name:  "Alice".into(),
      kind:  "visitor".into(),
      photo: Some("alice.png".into()),
    })
    .await
    .unwrap();

  let updated = s
    .update_person(company, person.person_id, PersonUpdate {
      name: Some("Alice L.".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.name, "Alice L.");
  assert_eq!(updated.kind, "visitor");
  assert_eq!(updated.photo.as_deref(), Some("alice.png"));

  let cleared = s
    .update_person(company, person.person_id, PersonUpdate {
      photo: Some(None),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(cleared.photo, None);
  assert_eq!(cleared.name, "Alice L.");
}

#[tokio::test]
async fn concurrent_status_toggles_all_apply() {
  let s = store().await;
  let company = CompanyId::random();
  let person = s.add_person(company, new_person("Alice")).await.unwrap();

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.toggle_person_status(company, person.person_id).await })
    })
    .collect();
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  // Eight flips from active land back on active only if none was lost.
  let fetched = s.get_person(company, person.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, PersonStatus::Active);
}

#[tokio::test]
async fn status_toggle_of_other_company_is_none() {
  let s = store().await;
  let company = CompanyId::random();
  let person = s.add_person(company, new_person("Alice")).await.unwrap();

  let toggled = s
    .toggle_person_status(CompanyId::random(), person.person_id)
    .await
    .unwrap();
  assert!(toggled.is_none());
  let fetched = s.get_person(company, person.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, PersonStatus::Active);
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_status_roundtrip_and_filter() {
  let s = store().await;
  let company = CompanyId::random();
  let kept = s.add_event(company, new_event("Prayer")).await.unwrap();
  let dropped = s.add_event(company, new_event("Picnic")).await.unwrap();

  let canceled = s
    .set_event_status(company, dropped.event_id, EventStatus::Canceled)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(canceled.status, EventStatus::Canceled);

  let active = s
    .list_events(company, Some(EventStatus::Active))
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].event_id, kept.event_id);

  // Still reachable by id regardless of status.
  let fetched = s.get_event(company, dropped.event_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, EventStatus::Canceled);
}

#[tokio::test]
async fn update_event_sets_keeps_and_clears() {
  let s = store().await;
  let company = CompanyId::random();
  let starts = Utc.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap();
  let event = s
    .add_event(company, NewEvent {
      name:        "Vigil".into(),
      description: Some("All night".into()),
      starts_at:   Some(starts),
    })
    .await
    .unwrap();

  let kept = s
    .update_event(company, event.event_id, EventUpdate {
      name: Some("Night vigil".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(kept.description.as_deref(), Some("All night"));
  assert_eq!(kept.starts_at, Some(starts));

  let cleared = s
    .update_event(company, event.event_id, EventUpdate {
      description: Some(None),
      starts_at: Some(None),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(cleared.name, "Night vigil");
  assert_eq!(cleared.description, None);
  assert_eq!(cleared.starts_at, None);

  let replaced = s
    .update_event(company, event.event_id, EventUpdate {
      description: Some(Some("Dusk to dawn".into())),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(replaced.description.as_deref(), Some("Dusk to dawn"));
  assert_eq!(replaced.starts_at, None);
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_mark_is_a_conflict() {
  let s = store().await;
  let company = CompanyId::random();
  let event = s.add_event(company, new_event("Service")).await.unwrap();
  let person = s.add_person(company, new_person("Alice")).await.unwrap();

  s.mark_attendance(company, event.event_id, person.person_id)
    .await
    .unwrap();
  let err = s
    .mark_attendance(company, event.event_id, person.person_id)
    .await
    .unwrap_err();
  assert!(err.is_conflict());
  // The client-facing message carries none of the SQLite wording.
  let core = CoreError::from_store(err);
  assert!(matches!(core, CoreError::Conflict(_)));
  assert!(!core.to_string().contains("UNIQUE"));
}

#[tokio::test]
async fn toggle_flips_presence() {
  let s = store().await;
  let company = CompanyId::random();
  let event = s.add_event(company, new_event("Service")).await.unwrap();
  let person = s.add_person(company, new_person("Alice")).await.unwrap();

  let on = s
    .toggle_attendance(company, event.event_id, person.person_id)
    .await
    .unwrap();
  assert!(on);
  assert_eq!(
    s.list_event_attendance(company, event.event_id)
      .await
      .unwrap()
      .len(),
    1
  );

  let off = s
    .toggle_attendance(company, event.event_id, person.person_id)
    .await
    .unwrap();
  assert!(!off);
  assert!(
    s.list_person_attendance(company, person.person_id)
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn concurrent_toggles_never_duplicate() {
  let s = store().await;
  let company = CompanyId::random();
  let event = s.add_event(company, new_event("Service")).await.unwrap();
  let person = s.add_person(company, new_person("Alice")).await.unwrap();

  let handles: Vec<_> = (0..7)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move {
        s.toggle_attendance(company, event.event_id, person.person_id)
          .await
      })
    })
    .collect();
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  // An odd number of flips from absent leaves exactly one record.
  let rows = s
    .attendance_rows(event.event_id, person.person_id)
    .await
    .unwrap();
  assert_eq!(rows, 1);
}

// ─── Ministries ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn ministry_role_is_upserted() {
  let s = store().await;
  let company = CompanyId::random();
  let ministry = s
    .add_ministry(company, NewMinistry {
      name:        "Worship".into(),
      description: None,
    })
    .await
    .unwrap();
  let person = s.add_person(company, new_person("Alice")).await.unwrap();

  for role in ["MEMBER", "LEADER"] {
    s.set_ministry_role(company, MinistryMembership {
      company_id:  company,
      ministry_id: ministry.ministry_id,
      person_id:   person.person_id,
      role:        role.into(),
    })
    .await
    .unwrap();
  }

  let membership = s
    .get_ministry_membership(company, ministry.ministry_id, person.person_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(membership.role, "LEADER");
}

// ─── Cell groups ─────────────────────────────────────────────────────────────

async fn ministry(s: &SqliteStore, company: CompanyId) -> Uuid {
  s.add_ministry(company, NewMinistry {
    name:        "Youth".into(),
    description: None,
  })
  .await
  .unwrap()
  .ministry_id
}

async fn member_ids(s: &SqliteStore, company: CompanyId, cell: Uuid) -> Vec<Uuid> {
  s.list_cell_members(company, cell)
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.person_id)
    .collect()
}

#[tokio::test]
async fn cell_group_created_with_members_in_order() {
  let s = store().await;
  let company = CompanyId::random();
  let ministry_id = ministry(&s, company).await;
  let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

  let cell = s
    .add_cell_group(company, NewCellGroup {
      ministry_id,
      name: "Tuesday group".into(),
      description: None,
      members: ids.to_vec(),
    })
    .await
    .unwrap();

  assert_eq!(member_ids(&s, company, cell.cell_group_id).await, ids);
  let listed = s.list_cell_groups(company, ministry_id).await.unwrap();
  assert_eq!(listed, [cell]);
}

#[tokio::test]
async fn update_replaces_members_only_when_given() {
  let s = store().await;
  let company = CompanyId::random();
  let ministry_id = ministry(&s, company).await;
  let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

  let cell = s
    .add_cell_group(company, NewCellGroup {
      ministry_id,
      name: "Group".into(),
      description: Some("old".into()),
      members: vec![a, b],
    })
    .await
    .unwrap();
  let id = cell.cell_group_id;

  // Omitted members: links untouched, description cleared.
  let updated = s
    .update_cell_group(company, id, CellGroupUpdate {
      name:        "Renamed".into(),
      description: None,
      members:     None,
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.name, "Renamed");
  assert_eq!(updated.description, None);
  assert_eq!(member_ids(&s, company, id).await, [a, b]);

  s.update_cell_group(company, id, CellGroupUpdate {
    name:        "Renamed".into(),
    description: None,
    members:     Some(vec![c, a]),
  })
  .await
  .unwrap();
  assert_eq!(member_ids(&s, company, id).await, [c, a]);

  s.update_cell_group(company, id, CellGroupUpdate {
    name:        "Renamed".into(),
    description: None,
    members:     Some(Vec::new()),
  })
  .await
  .unwrap();
  assert!(member_ids(&s, company, id).await.is_empty());
}

#[tokio::test]
async fn update_of_foreign_cell_group_writes_nothing() {
  let s = store().await;
  let owner = CompanyId::random();
  let other = CompanyId::random();
  let ministry_id = ministry(&s, owner).await;
  let a = Uuid::new_v4();
  let cell = s
    .add_cell_group(owner, NewCellGroup {
      ministry_id,
      name: "Group".into(),
      description: None,
      members: vec![a],
    })
    .await
    .unwrap();

  let result = s
    .update_cell_group(other, cell.cell_group_id, CellGroupUpdate {
      name:        "Hijacked".into(),
      description: None,
      members:     Some(Vec::new()),
    })
    .await
    .unwrap();
  assert!(result.is_none());

  let unchanged = s
    .get_cell_group(owner, cell.cell_group_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(unchanged.name, "Group");
  assert_eq!(member_ids(&s, owner, cell.cell_group_id).await, [a]);
}

// ─── Tenant resolvers over SQLite ────────────────────────────────────────────

#[tokio::test]
async fn roster_resolves_against_sqlite() {
  let s = store().await;
  let tenant = Tenant::new(&s, CompanyId::random());
  let event = tenant.create_event(new_event("Service")).await.unwrap();
  let a = tenant.create_person(new_person("A")).await.unwrap();
  let b = tenant.create_person(new_person("B")).await.unwrap();

  let presence = tenant
    .toggle_attendance(event.event_id, b.person_id)
    .await
    .unwrap();
  assert!(presence.present);

  let roster = tenant.resolve_roster(event.event_id).await.unwrap();
  let rows: Vec<_> = roster.iter().map(|r| (r.id, r.present)).collect();
  assert_eq!(rows, [(a.person_id, false), (b.person_id, true)]);
}

#[tokio::test]
async fn cell_members_resolve_roles_and_unknowns() {
  let s = store().await;
  let company = CompanyId::random();
  let tenant = Tenant::new(&s, company);
  let foreign = Tenant::new(&s, CompanyId::random());

  let ministry = tenant
    .create_ministry(NewMinistry {
      name:        "Worship".into(),
      description: None,
    })
    .await
    .unwrap();
  let leader = tenant.create_person(new_person("Leader")).await.unwrap();
  let plain = tenant.create_person(new_person("Plain")).await.unwrap();
  let outsider = foreign.create_person(new_person("Outsider")).await.unwrap();
  tenant
    .assign_ministry_role(ministry.ministry_id, leader.person_id, "LEADER")
    .await
    .unwrap();

  let cell = tenant
    .create_cell_group(NewCellGroup {
      ministry_id: ministry.ministry_id,
      name:        "Band".into(),
      description: None,
      members:     vec![leader.person_id, outsider.person_id, plain.person_id],
    })
    .await
    .unwrap();

  let view = tenant
    .resolve_cell_members(cell.cell_group_id)
    .await
    .unwrap();
  let members: Vec<_> = view
    .members
    .iter()
    .map(|m| (m.id, m.name.as_str(), m.role.as_str()))
    .collect();
  assert_eq!(members, [
    (leader.person_id, "Leader", "LEADER"),
    (outsider.person_id, UNKNOWN_NAME, DEFAULT_ROLE),
    (plain.person_id, "Plain", DEFAULT_ROLE),
  ]);
}

// ─── Access catalog ──────────────────────────────────────────────────────────

fn new_permission(name: &str) -> NewPermission {
  NewPermission {
    name:        name.into(),
    token:       format!("tok-{name}"),
    description: None,
  }
}

#[tokio::test]
async fn catalog_roles_list_in_insertion_order() {
  let s = store().await;
  let catalog = Catalog::new(&s);
  let module_id = Uuid::new_v4();

  let pastor = catalog
    .create_role(NewRole {
      module_id,
      name: "Pastor".into(),
      description: Some("Leads the church".into()),
    })
    .await
    .unwrap();
  let deacon = catalog
    .create_role(NewRole { module_id, name: "Deacon".into(), description: None })
    .await
    .unwrap();

  let listed = catalog.list_roles().await.unwrap();
  assert_eq!(listed, [pastor.clone(), deacon]);
  assert_eq!(catalog.get_role(pastor.role_id).await.unwrap(), pastor);
}

#[tokio::test]
async fn duplicate_permission_name_is_a_conflict() {
  let s = store().await;
  let catalog = Catalog::new(&s);

  let first = catalog
    .create_permission(new_permission("people.write"))
    .await
    .unwrap();
  let err = catalog
    .create_permission(new_permission("people.write"))
    .await
    .unwrap_err();
  assert!(matches!(&err, CoreError::Conflict(m) if m == PERMISSION_TAKEN));

  assert_eq!(catalog.list_permissions().await.unwrap(), [first.clone()]);
  assert_eq!(
    catalog.get_permission(first.permission_id).await.unwrap(),
    first
  );
  assert!(matches!(
    catalog.get_permission(Uuid::new_v4()).await,
    Err(CoreError::NotFound { entity: "permission", .. })
  ));
}

#[tokio::test]
async fn reopening_file_store_keeps_data() {
  let dir = std::env::temp_dir().join(format!("congrega-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("congrega.sqlite");
  let company = CompanyId::random();

  let person = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_person(company, new_person("Alice")).await.unwrap()
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let fetched = s.get_person(company, person.person_id).await.unwrap();
  assert_eq!(fetched.map(|p| p.name).as_deref(), Some("Alice"));

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
