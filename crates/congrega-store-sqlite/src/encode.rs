//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs (including the tenant
//! id) are stored as hyphenated lowercase strings. Status enums are stored as
//! their lowercase names.

use chrono::{DateTime, Utc};
use congrega_core::{
  CompanyId,
  access::{Permission, Role},
  attendance::AttendanceRecord,
  cell::{CellGroup, CellMembership},
  event::{Event, EventStatus},
  ministry::{Ministry, MinistryMembership},
  person::{Person, PersonStatus},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_company(company: CompanyId) -> String {
  encode_uuid(company.as_uuid())
}

fn decode_company(s: &str) -> Result<CompanyId> {
  decode_uuid(s).map(CompanyId::new)
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status enums ─────────────────────────────────────────────────────────────

pub fn encode_person_status(s: PersonStatus) -> &'static str {
  match s {
    PersonStatus::Active => "active",
    PersonStatus::Inactive => "inactive",
  }
}

pub fn decode_person_status(s: &str) -> Result<PersonStatus> {
  match s {
    "active" => Ok(PersonStatus::Active),
    "inactive" => Ok(PersonStatus::Inactive),
    other => Err(Error::UnknownValue {
      column: "people.status",
      value:  other.to_owned(),
    }),
  }
}

pub fn encode_event_status(s: EventStatus) -> &'static str {
  match s {
    EventStatus::Active => "active",
    EventStatus::Canceled => "canceled",
  }
}

pub fn decode_event_status(s: &str) -> Result<EventStatus> {
  match s {
    "active" => Ok(EventStatus::Active),
    "canceled" => Ok(EventStatus::Canceled),
    other => Err(Error::UnknownValue {
      column: "events.status",
      value:  other.to_owned(),
    }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `COLUMNS` constant lists the SELECT order its `from_row` expects.

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_id:  String,
  pub company_id: String,
  pub name:       String,
  pub kind:       String,
  pub photo:      Option<String>,
  pub status:     String,
  pub created_at: String,
}

impl RawPerson {
  pub const COLUMNS: &'static str =
    "person_id, company_id, name, kind, photo, status, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:  row.get(0)?,
      company_id: row.get(1)?,
      name:       row.get(2)?,
      kind:       row.get(3)?,
      photo:      row.get(4)?,
      status:     row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:  decode_uuid(&self.person_id)?,
      company_id: decode_company(&self.company_id)?,
      name:       self.name,
      kind:       self.kind,
      photo:      self.photo,
      status:     decode_person_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub company_id:  String,
  pub name:        String,
  pub description: Option<String>,
  pub starts_at:   Option<String>,
  pub status:      String,
  pub created_at:  String,
}

impl RawEvent {
  pub const COLUMNS: &'static str =
    "event_id, company_id, name, description, starts_at, status, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      company_id:  row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      starts_at:   row.get(4)?,
      status:      row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:    decode_uuid(&self.event_id)?,
      company_id:  decode_company(&self.company_id)?,
      name:        self.name,
      description: self.description,
      starts_at:   self.starts_at.as_deref().map(decode_dt).transpose()?,
      status:      decode_event_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `attendance` row.
pub struct RawAttendance {
  pub attendance_id: String,
  pub company_id:    String,
  pub event_id:      String,
  pub person_id:     String,
  pub recorded_at:   String,
}

impl RawAttendance {
  pub const COLUMNS: &'static str =
    "attendance_id, company_id, event_id, person_id, recorded_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      attendance_id: row.get(0)?,
      company_id:    row.get(1)?,
      event_id:      row.get(2)?,
      person_id:     row.get(3)?,
      recorded_at:   row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      attendance_id: decode_uuid(&self.attendance_id)?,
      company_id:    decode_company(&self.company_id)?,
      event_id:      decode_uuid(&self.event_id)?,
      person_id:     decode_uuid(&self.person_id)?,
      recorded_at:   decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from a `ministries` row.
pub struct RawMinistry {
  pub ministry_id: String,
  pub company_id:  String,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawMinistry {
  pub const COLUMNS: &'static str =
    "ministry_id, company_id, name, description, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      ministry_id: row.get(0)?,
      company_id:  row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_ministry(self) -> Result<Ministry> {
    Ok(Ministry {
      ministry_id: decode_uuid(&self.ministry_id)?,
      company_id:  decode_company(&self.company_id)?,
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `ministry_members` row.
pub struct RawMinistryMember {
  pub company_id:  String,
  pub ministry_id: String,
  pub person_id:   String,
  pub role:        String,
}

impl RawMinistryMember {
  pub const COLUMNS: &'static str = "company_id, ministry_id, person_id, role";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      company_id:  row.get(0)?,
      ministry_id: row.get(1)?,
      person_id:   row.get(2)?,
      role:        row.get(3)?,
    })
  }

  pub fn into_membership(self) -> Result<MinistryMembership> {
    Ok(MinistryMembership {
      company_id:  decode_company(&self.company_id)?,
      ministry_id: decode_uuid(&self.ministry_id)?,
      person_id:   decode_uuid(&self.person_id)?,
      role:        self.role,
    })
  }
}

/// Raw strings read directly from a `cell_groups` row.
pub struct RawCellGroup {
  pub cell_group_id: String,
  pub company_id:    String,
  pub ministry_id:   String,
  pub name:          String,
  pub description:   Option<String>,
  pub created_at:    String,
}

impl RawCellGroup {
  pub const COLUMNS: &'static str =
    "cell_group_id, company_id, ministry_id, name, description, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      cell_group_id: row.get(0)?,
      company_id:    row.get(1)?,
      ministry_id:   row.get(2)?,
      name:          row.get(3)?,
      description:   row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_cell_group(self) -> Result<CellGroup> {
    Ok(CellGroup {
      cell_group_id: decode_uuid(&self.cell_group_id)?,
      company_id:    decode_company(&self.company_id)?,
      ministry_id:   decode_uuid(&self.ministry_id)?,
      name:          self.name,
      description:   self.description,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `cell_members` row.
pub struct RawCellMember {
  pub company_id:    String,
  pub cell_group_id: String,
  pub person_id:     String,
}

impl RawCellMember {
  pub const COLUMNS: &'static str = "company_id, cell_group_id, person_id";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      company_id:    row.get(0)?,
      cell_group_id: row.get(1)?,
      person_id:     row.get(2)?,
    })
  }

  pub fn into_membership(self) -> Result<CellMembership> {
    Ok(CellMembership {
      company_id:    decode_company(&self.company_id)?,
      cell_group_id: decode_uuid(&self.cell_group_id)?,
      person_id:     decode_uuid(&self.person_id)?,
    })
  }
}

/// Raw strings read directly from a `roles` row.
pub struct RawRole {
  pub role_id:     String,
  pub module_id:   String,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawRole {
  pub const COLUMNS: &'static str =
    "role_id, module_id, name, description, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      role_id:     row.get(0)?,
      module_id:   row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_role(self) -> Result<Role> {
    Ok(Role {
      role_id:     decode_uuid(&self.role_id)?,
      module_id:   decode_uuid(&self.module_id)?,
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `permissions` row.
pub struct RawPermission {
  pub permission_id: String,
  pub name:          String,
  pub token:         String,
  pub description:   Option<String>,
  pub created_at:    String,
}

impl RawPermission {
  pub const COLUMNS: &'static str =
    "permission_id, name, token, description, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      permission_id: row.get(0)?,
      name:          row.get(1)?,
      token:         row.get(2)?,
      description:   row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_permission(self) -> Result<Permission> {
    Ok(Permission {
      permission_id: decode_uuid(&self.permission_id)?,
      name:          self.name,
      token:         self.token,
      description:   self.description,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
