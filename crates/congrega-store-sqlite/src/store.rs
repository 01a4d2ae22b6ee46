//! [`SqliteStore`]: the SQLite implementation of [`CommunityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use congrega_core::{
  CompanyId,
  access::{NewPermission, NewRole, Permission, Role},
  attendance::AttendanceRecord,
  cell::{CellGroup, CellGroupUpdate, CellMembership, NewCellGroup},
  event::{Event, EventStatus, EventUpdate, NewEvent},
  ministry::{Ministry, MinistryMembership, NewMinistry},
  person::{NewPerson, Person, PersonStatus, PersonUpdate},
  store::CommunityStore,
};

use crate::{
  Result,
  encode::{
    RawAttendance, RawCellGroup, RawCellMember, RawEvent, RawMinistry,
    RawMinistryMember, RawPermission, RawPerson, RawRole, encode_company, encode_dt,
    encode_event_status, encode_person_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Congrega community store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Count attendance rows for a pair across all tenants. Used by tests to
  /// check the one-row-per-pair invariant directly.
  #[cfg(test)]
  pub(crate) async fn attendance_rows(
    &self,
    event_id: Uuid,
    person_id: Uuid,
  ) -> Result<i64> {
    let event_str  = encode_uuid(event_id);
    let person_str = encode_uuid(person_id);
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE event_id = ?1 AND person_id = ?2",
            rusqlite::params![event_str, person_str],
            |r| r.get(0),
          )?)
        })
        .await?,
    )
  }
}

/// Insert cell member links with an already-open connection or transaction.
fn insert_links(
  conn: &rusqlite::Connection,
  company: &str,
  cell_group_id: &str,
  members: &[String],
) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO cell_members (company_id, cell_group_id, person_id)
     VALUES (?1, ?2, ?3)",
  )?;
  for person_id in members {
    stmt.execute(rusqlite::params![company, cell_group_id, person_id])?;
  }
  Ok(())
}

// ─── CommunityStore impl ─────────────────────────────────────────────────────

impl CommunityStore for SqliteStore {
  type Error = crate::Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, company: CompanyId, input: NewPerson) -> Result<Person> {
    let person = Person {
      person_id:  Uuid::new_v4(),
      company_id: company,
      name:       input.name,
      kind:       input.kind,
      photo:      input.photo,
      status:     PersonStatus::Active,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(person.person_id);
    let company_str = encode_company(company);
    let name        = person.name.clone();
    let kind        = person.kind.clone();
    let photo       = person.photo.clone();
    let status_str  = encode_person_status(person.status);
    let at_str      = encode_dt(person.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (person_id, company_id, name, kind, photo, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, company_str, name, kind, photo, status_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn get_person(&self, company: CompanyId, id: Uuid) -> Result<Option<Person>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM people WHERE company_id = ?1 AND person_id = ?2",
              RawPerson::COLUMNS
            ),
            rusqlite::params![company_str, id_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(
    &self,
    company: CompanyId,
    status: Option<PersonStatus>,
  ) -> Result<Vec<Person>> {
    let company_str = encode_company(company);
    let status_str  = status.map(encode_person_status);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM people
           WHERE company_id = ?1 AND (?2 IS NULL OR status = ?2)
           ORDER BY rowid",
          RawPerson::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![company_str, status_str], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn update_person(
    &self,
    company: CompanyId,
    id: Uuid,
    update: PersonUpdate,
  ) -> Result<Option<Person>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);
    // `?5` says whether the photo is patched at all; `?6` may then be NULL.
    let set_photo   = update.photo.is_some();
    let photo       = update.photo.flatten();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE people
               SET name  = COALESCE(?3, name),
                   kind  = COALESCE(?4, kind),
                   photo = CASE WHEN ?5 THEN ?6 ELSE photo END
               WHERE company_id = ?1 AND person_id = ?2
               RETURNING {}",
              RawPerson::COLUMNS
            ),
            rusqlite::params![
              company_str,
              id_str,
              update.name,
              update.kind,
              set_photo,
              photo,
            ],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn set_person_status(
    &self,
    company: CompanyId,
    id: Uuid,
    status: PersonStatus,
  ) -> Result<Option<Person>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);
    let status_str  = encode_person_status(status);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE people SET status = ?3
               WHERE company_id = ?1 AND person_id = ?2
               RETURNING {}",
              RawPerson::COLUMNS
            ),
            rusqlite::params![company_str, id_str, status_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn toggle_person_status(
    &self,
    company: CompanyId,
    id: Uuid,
  ) -> Result<Option<Person>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);

    // The flip happens inside one statement, so concurrent toggles apply
    // one after the other instead of both writing the same status.
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE people
               SET status = CASE status WHEN 'active' THEN 'inactive' ELSE 'active' END
               WHERE company_id = ?1 AND person_id = ?2
               RETURNING {}",
              RawPerson::COLUMNS
            ),
            rusqlite::params![company_str, id_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn add_event(&self, company: CompanyId, input: NewEvent) -> Result<Event> {
    let event = Event {
      event_id:    Uuid::new_v4(),
      company_id:  company,
      name:        input.name,
      description: input.description,
      starts_at:   input.starts_at,
      status:      EventStatus::Active,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(event.event_id);
    let company_str = encode_company(company);
    let name        = event.name.clone();
    let description = event.description.clone();
    let starts_str  = event.starts_at.map(encode_dt);
    let status_str  = encode_event_status(event.status);
    let at_str      = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (event_id, company_id, name, description, starts_at, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            company_str,
            name,
            description,
            starts_str,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn get_event(&self, company: CompanyId, id: Uuid) -> Result<Option<Event>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM events WHERE company_id = ?1 AND event_id = ?2",
              RawEvent::COLUMNS
            ),
            rusqlite::params![company_str, id_str],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn list_events(
    &self,
    company: CompanyId,
    status: Option<EventStatus>,
  ) -> Result<Vec<Event>> {
    let company_str = encode_company(company);
    let status_str  = status.map(encode_event_status);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM events
           WHERE company_id = ?1 AND (?2 IS NULL OR status = ?2)
           ORDER BY rowid",
          RawEvent::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![company_str, status_str], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn update_event(
    &self,
    company: CompanyId,
    id: Uuid,
    update: EventUpdate,
  ) -> Result<Option<Event>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);
    let set_desc    = update.description.is_some();
    let description = update.description.flatten();
    let set_starts  = update.starts_at.is_some();
    let starts_str  = update.starts_at.flatten().map(encode_dt);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE events
               SET name        = COALESCE(?3, name),
                   description = CASE WHEN ?4 THEN ?5 ELSE description END,
                   starts_at   = CASE WHEN ?6 THEN ?7 ELSE starts_at END
               WHERE company_id = ?1 AND event_id = ?2
               RETURNING {}",
              RawEvent::COLUMNS
            ),
            rusqlite::params![
              company_str,
              id_str,
              update.name,
              set_desc,
              description,
              set_starts,
              starts_str,
            ],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn set_event_status(
    &self,
    company: CompanyId,
    id: Uuid,
    status: EventStatus,
  ) -> Result<Option<Event>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);
    let status_str  = encode_event_status(status);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE events SET status = ?3
               WHERE company_id = ?1 AND event_id = ?2
               RETURNING {}",
              RawEvent::COLUMNS
            ),
            rusqlite::params![company_str, id_str, status_str],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn mark_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
    person_id: Uuid,
  ) -> Result<AttendanceRecord> {
    let record = AttendanceRecord {
      attendance_id: Uuid::new_v4(),
      company_id:    company,
      event_id,
      person_id,
      recorded_at:   Utc::now(),
    };

    let id_str      = encode_uuid(record.attendance_id);
    let company_str = encode_company(company);
    let event_str   = encode_uuid(event_id);
    let person_str  = encode_uuid(person_id);
    let at_str      = encode_dt(record.recorded_at);

    // A second row for the pair violates UNIQUE (event_id, person_id) and
    // comes back as a conflict.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attendance (attendance_id, company_id, event_id, person_id, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, company_str, event_str, person_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn toggle_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
    person_id: Uuid,
  ) -> Result<bool> {
    let id_str      = encode_uuid(Uuid::new_v4());
    let company_str = encode_company(company);
    let event_str   = encode_uuid(event_id);
    let person_str  = encode_uuid(person_id);
    let at_str      = encode_dt(Utc::now());

    let present = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute(
          "DELETE FROM attendance
           WHERE company_id = ?1 AND event_id = ?2 AND person_id = ?3",
          rusqlite::params![company_str, event_str, person_str],
        )?;
        if removed == 0 {
          tx.execute(
            "INSERT INTO attendance (attendance_id, company_id, event_id, person_id, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id_str, company_str, event_str, person_str, at_str],
          )?;
        }
        tx.commit()?;
        Ok(removed == 0)
      })
      .await?;

    Ok(present)
  }

  async fn list_event_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>> {
    let company_str = encode_company(company);
    let event_str   = encode_uuid(event_id);

    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM attendance
           WHERE company_id = ?1 AND event_id = ?2
           ORDER BY rowid",
          RawAttendance::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![company_str, event_str], RawAttendance::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendance::into_record).collect()
  }

  async fn list_person_attendance(
    &self,
    company: CompanyId,
    person_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>> {
    let company_str = encode_company(company);
    let person_str  = encode_uuid(person_id);

    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM attendance
           WHERE company_id = ?1 AND person_id = ?2
           ORDER BY rowid",
          RawAttendance::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![company_str, person_str], RawAttendance::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendance::into_record).collect()
  }

  // ── Ministries ────────────────────────────────────────────────────────────

  async fn add_ministry(&self, company: CompanyId, input: NewMinistry) -> Result<Ministry> {
    let ministry = Ministry {
      ministry_id: Uuid::new_v4(),
      company_id:  company,
      name:        input.name,
      description: input.description,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(ministry.ministry_id);
    let company_str = encode_company(company);
    let name        = ministry.name.clone();
    let description = ministry.description.clone();
    let at_str      = encode_dt(ministry.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ministries (ministry_id, company_id, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, company_str, name, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(ministry)
  }

  async fn get_ministry(&self, company: CompanyId, id: Uuid) -> Result<Option<Ministry>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);

    let raw: Option<RawMinistry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM ministries WHERE company_id = ?1 AND ministry_id = ?2",
              RawMinistry::COLUMNS
            ),
            rusqlite::params![company_str, id_str],
            RawMinistry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMinistry::into_ministry).transpose()
  }

  async fn list_ministries(&self, company: CompanyId) -> Result<Vec<Ministry>> {
    let company_str = encode_company(company);

    let raws: Vec<RawMinistry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM ministries WHERE company_id = ?1 ORDER BY rowid",
          RawMinistry::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![company_str], RawMinistry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMinistry::into_ministry).collect()
  }

  async fn set_ministry_role(
    &self,
    company: CompanyId,
    membership: MinistryMembership,
  ) -> Result<MinistryMembership> {
    let company_str  = encode_company(company);
    let ministry_str = encode_uuid(membership.ministry_id);
    let person_str   = encode_uuid(membership.person_id);
    let role         = membership.role.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ministry_members (company_id, ministry_id, person_id, role)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (ministry_id, person_id) DO UPDATE SET role = excluded.role",
          rusqlite::params![company_str, ministry_str, person_str, role],
        )?;
        Ok(())
      })
      .await?;

    Ok(MinistryMembership { company_id: company, ..membership })
  }

  async fn get_ministry_membership(
    &self,
    company: CompanyId,
    ministry_id: Uuid,
    person_id: Uuid,
  ) -> Result<Option<MinistryMembership>> {
    let company_str  = encode_company(company);
    let ministry_str = encode_uuid(ministry_id);
    let person_str   = encode_uuid(person_id);

    let raw: Option<RawMinistryMember> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM ministry_members
               WHERE company_id = ?1 AND ministry_id = ?2 AND person_id = ?3",
              RawMinistryMember::COLUMNS
            ),
            rusqlite::params![company_str, ministry_str, person_str],
            RawMinistryMember::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMinistryMember::into_membership).transpose()
  }

  // ── Cell groups ───────────────────────────────────────────────────────────

  async fn add_cell_group(&self, company: CompanyId, input: NewCellGroup) -> Result<CellGroup> {
    let cell = CellGroup {
      cell_group_id: Uuid::new_v4(),
      company_id:    company,
      ministry_id:   input.ministry_id,
      name:          input.name,
      description:   input.description,
      created_at:    Utc::now(),
    };

    let id_str       = encode_uuid(cell.cell_group_id);
    let company_str  = encode_company(company);
    let ministry_str = encode_uuid(cell.ministry_id);
    let name         = cell.name.clone();
    let description  = cell.description.clone();
    let at_str       = encode_dt(cell.created_at);
    let members: Vec<String> = input.members.into_iter().map(encode_uuid).collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "INSERT INTO cell_groups (cell_group_id, company_id, ministry_id, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, company_str, ministry_str, name, description, at_str],
        )?;
        insert_links(&tx, &company_str, &id_str, &members)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(cell)
  }

  async fn get_cell_group(&self, company: CompanyId, id: Uuid) -> Result<Option<CellGroup>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);

    let raw: Option<RawCellGroup> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM cell_groups WHERE company_id = ?1 AND cell_group_id = ?2",
              RawCellGroup::COLUMNS
            ),
            rusqlite::params![company_str, id_str],
            RawCellGroup::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCellGroup::into_cell_group).transpose()
  }

  async fn list_cell_groups(
    &self,
    company: CompanyId,
    ministry_id: Uuid,
  ) -> Result<Vec<CellGroup>> {
    let company_str  = encode_company(company);
    let ministry_str = encode_uuid(ministry_id);

    let raws: Vec<RawCellGroup> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM cell_groups
           WHERE company_id = ?1 AND ministry_id = ?2
           ORDER BY rowid",
          RawCellGroup::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![company_str, ministry_str], RawCellGroup::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCellGroup::into_cell_group).collect()
  }

  async fn update_cell_group(
    &self,
    company: CompanyId,
    id: Uuid,
    update: CellGroupUpdate,
  ) -> Result<Option<CellGroup>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(id);
    let members: Option<Vec<String>> = update
      .members
      .map(|ids| ids.into_iter().map(encode_uuid).collect());

    let raw: Option<RawCellGroup> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let raw = tx
          .query_row(
            &format!(
              "UPDATE cell_groups SET name = ?3, description = ?4
               WHERE company_id = ?1 AND cell_group_id = ?2
               RETURNING {}",
              RawCellGroup::COLUMNS
            ),
            rusqlite::params![company_str, id_str, update.name, update.description],
            RawCellGroup::from_row,
          )
          .optional()?;

        // Dropping the transaction without commit rolls back.
        let Some(raw) = raw else { return Ok(None) };

        if let Some(members) = members {
          tx.execute(
            "DELETE FROM cell_members WHERE company_id = ?1 AND cell_group_id = ?2",
            rusqlite::params![company_str, id_str],
          )?;
          insert_links(&tx, &company_str, &id_str, &members)?;
        }
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawCellGroup::into_cell_group).transpose()
  }

  async fn list_cell_members(
    &self,
    company: CompanyId,
    cell_group_id: Uuid,
  ) -> Result<Vec<CellMembership>> {
    let company_str = encode_company(company);
    let id_str      = encode_uuid(cell_group_id);

    let raws: Vec<RawCellMember> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM cell_members
           WHERE company_id = ?1 AND cell_group_id = ?2
           ORDER BY rowid",
          RawCellMember::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![company_str, id_str], RawCellMember::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCellMember::into_membership).collect()
  }

  // ── Access catalog ────────────────────────────────────────────────────────

  async fn add_role(&self, input: NewRole) -> Result<Role> {
    let role = Role {
      role_id:     Uuid::new_v4(),
      module_id:   input.module_id,
      name:        input.name,
      description: input.description,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(role.role_id);
    let module_str  = encode_uuid(role.module_id);
    let name        = role.name.clone();
    let description = role.description.clone();
    let at_str      = encode_dt(role.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO roles (role_id, module_id, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, module_str, name, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(role)
  }

  async fn get_role(&self, id: Uuid) -> Result<Option<Role>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRole> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM roles WHERE role_id = ?1", RawRole::COLUMNS),
            rusqlite::params![id_str],
            RawRole::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRole::into_role).transpose()
  }

  async fn list_roles(&self) -> Result<Vec<Role>> {
    let raws: Vec<RawRole> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM roles ORDER BY rowid",
          RawRole::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawRole::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRole::into_role).collect()
  }

  async fn add_permission(&self, input: NewPermission) -> Result<Permission> {
    let permission = Permission {
      permission_id: Uuid::new_v4(),
      name:          input.name,
      token:         input.token,
      description:   input.description,
      created_at:    Utc::now(),
    };

    let id_str      = encode_uuid(permission.permission_id);
    let name        = permission.name.clone();
    let token       = permission.token.clone();
    let description = permission.description.clone();
    let at_str      = encode_dt(permission.created_at);

    // A taken name trips the UNIQUE constraint and surfaces as a conflict.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO permissions (permission_id, name, token, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, token, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(permission)
  }

  async fn get_permission(&self, id: Uuid) -> Result<Option<Permission>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPermission> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM permissions WHERE permission_id = ?1",
              RawPermission::COLUMNS
            ),
            rusqlite::params![id_str],
            RawPermission::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPermission::into_permission).transpose()
  }

  async fn list_permissions(&self) -> Result<Vec<Permission>> {
    let raws: Vec<RawPermission> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM permissions ORDER BY rowid",
          RawPermission::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawPermission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPermission::into_permission).collect()
  }
}
