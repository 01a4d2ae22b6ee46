//! In-memory [`CommunityStore`] used by the unit tests of this crate.
//!
//! One mutex guards the whole state, so every method (including the toggle
//! and replace-all operations) is trivially atomic.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  CompanyId,
  access::{NewPermission, NewRole, Permission, Role},
  attendance::AttendanceRecord,
  cell::{CellGroup, CellGroupUpdate, CellMembership, NewCellGroup},
  event::{Event, EventStatus, EventUpdate, NewEvent},
  ministry::{Ministry, MinistryMembership, NewMinistry},
  person::{NewPerson, Person, PersonStatus, PersonUpdate},
  store::{CommunityStore, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
  #[error("duplicate {0}")]
  Duplicate(&'static str),
}

impl StoreError for MemoryError {
  fn is_conflict(&self) -> bool { matches!(self, Self::Duplicate(_)) }
}

#[derive(Debug, Default)]
struct State {
  people:     Vec<Person>,
  events:     Vec<Event>,
  attendance: Vec<AttendanceRecord>,
  ministries: Vec<Ministry>,
  roles:      Vec<MinistryMembership>,
  cells:      Vec<CellGroup>,
  links:      Vec<CellMembership>,
  catalog:    Vec<Role>,
  grants:     Vec<Permission>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  state: Mutex<State>,
}

impl MemoryStore {
  fn lock(&self) -> MutexGuard<'_, State> { self.state.lock().unwrap() }

  /// Raw link rows, bypassing the resolver.
  pub fn cell_links(&self, company: CompanyId, cell_group_id: Uuid) -> Vec<CellMembership> {
    self
      .lock()
      .links
      .iter()
      .filter(|l| l.company_id == company && l.cell_group_id == cell_group_id)
      .cloned()
      .collect()
  }
}

fn new_record(company: CompanyId, event_id: Uuid, person_id: Uuid) -> AttendanceRecord {
  AttendanceRecord {
    attendance_id: Uuid::new_v4(),
    company_id: company,
    event_id,
    person_id,
    recorded_at: Utc::now(),
  }
}

impl CommunityStore for MemoryStore {
  type Error = MemoryError;

  async fn add_person(&self, company: CompanyId, input: NewPerson) -> Result<Person, MemoryError> {
    let person = Person {
      person_id:  Uuid::new_v4(),
      company_id: company,
      name:       input.name,
      kind:       input.kind,
      photo:      input.photo,
      status:     PersonStatus::Active,
      created_at: Utc::now(),
    };
    self.lock().people.push(person.clone());
    Ok(person)
  }

  async fn get_person(&self, company: CompanyId, id: Uuid) -> Result<Option<Person>, MemoryError> {
    Ok(
      self
        .lock()
        .people
        .iter()
        .find(|p| p.company_id == company && p.person_id == id)
        .cloned(),
    )
  }

  async fn list_people(
    &self,
    company: CompanyId,
    status: Option<PersonStatus>,
  ) -> Result<Vec<Person>, MemoryError> {
    Ok(
      self
        .lock()
        .people
        .iter()
        .filter(|p| p.company_id == company && status.is_none_or(|s| p.status == s))
        .cloned()
        .collect(),
    )
  }

  async fn update_person(
    &self,
    company: CompanyId,
    id: Uuid,
    update: PersonUpdate,
  ) -> Result<Option<Person>, MemoryError> {
    let mut state = self.lock();
    let Some(p) = state
      .people
      .iter_mut()
      .find(|p| p.company_id == company && p.person_id == id)
    else {
      return Ok(None);
    };
    if let Some(name) = update.name {
      p.name = name;
    }
    if let Some(kind) = update.kind {
      p.kind = kind;
    }
    if let Some(photo) = update.photo {
      p.photo = photo;
    }
    Ok(Some(p.clone()))
  }

  async fn set_person_status(
    &self,
    company: CompanyId,
    id: Uuid,
    status: PersonStatus,
  ) -> Result<Option<Person>, MemoryError> {
    let mut state = self.lock();
    Ok(
      state
        .people
        .iter_mut()
        .find(|p| p.company_id == company && p.person_id == id)
        .map(|p| {
          p.status = status;
          p.clone()
        }),
    )
  }

  async fn toggle_person_status(
    &self,
    company: CompanyId,
    id: Uuid,
  ) -> Result<Option<Person>, MemoryError> {
    let mut state = self.lock();
    Ok(
      state
        .people
        .iter_mut()
        .find(|p| p.company_id == company && p.person_id == id)
        .map(|p| {
          p.status = p.status.toggled();
          p.clone()
        }),
    )
  }

  async fn add_event(&self, company: CompanyId, input: NewEvent) -> Result<Event, MemoryError> {
    let event = Event {
      event_id:    Uuid::new_v4(),
      company_id:  company,
      name:        input.name,
      description: input.description,
      starts_at:   input.starts_at,
      status:      EventStatus::Active,
      created_at:  Utc::now(),
    };
    self.lock().events.push(event.clone());
    Ok(event)
  }

  async fn get_event(&self, company: CompanyId, id: Uuid) -> Result<Option<Event>, MemoryError> {
    Ok(
      self
        .lock()
        .events
        .iter()
        .find(|e| e.company_id == company && e.event_id == id)
        .cloned(),
    )
  }

  async fn list_events(
    &self,
    company: CompanyId,
    status: Option<EventStatus>,
  ) -> Result<Vec<Event>, MemoryError> {
    Ok(
      self
        .lock()
        .events
        .iter()
        .filter(|e| e.company_id == company && status.is_none_or(|s| e.status == s))
        .cloned()
        .collect(),
    )
  }

  async fn update_event(
    &self,
    company: CompanyId,
    id: Uuid,
    update: EventUpdate,
  ) -> Result<Option<Event>, MemoryError> {
    let mut state = self.lock();
    let Some(e) = state
      .events
      .iter_mut()
      .find(|e| e.company_id == company && e.event_id == id)
    else {
      return Ok(None);
    };
    if let Some(name) = update.name {
      e.name = name;
    }
    if let Some(description) = update.description {
      e.description = description;
    }
    if let Some(starts_at) = update.starts_at {
      e.starts_at = starts_at;
    }
    Ok(Some(e.clone()))
  }

  async fn set_event_status(
    &self,
    company: CompanyId,
    id: Uuid,
    status: EventStatus,
  ) -> Result<Option<Event>, MemoryError> {
    let mut state = self.lock();
    Ok(
      state
        .events
        .iter_mut()
        .find(|e| e.company_id == company && e.event_id == id)
        .map(|e| {
          e.status = status;
          e.clone()
        }),
    )
  }

  async fn mark_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
    person_id: Uuid,
  ) -> Result<AttendanceRecord, MemoryError> {
    let mut state = self.lock();
    if state
      .attendance
      .iter()
      .any(|a| a.event_id == event_id && a.person_id == person_id)
    {
      return Err(MemoryError::Duplicate("attendance"));
    }
    let record = new_record(company, event_id, person_id);
    state.attendance.push(record.clone());
    Ok(record)
  }

  async fn toggle_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
    person_id: Uuid,
  ) -> Result<bool, MemoryError> {
    let mut state = self.lock();
    let before = state.attendance.len();
    state.attendance.retain(|a| {
      !(a.company_id == company && a.event_id == event_id && a.person_id == person_id)
    });
    if state.attendance.len() < before {
      return Ok(false);
    }
    state.attendance.push(new_record(company, event_id, person_id));
    Ok(true)
  }

  async fn list_event_attendance(
    &self,
    company: CompanyId,
    event_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>, MemoryError> {
    Ok(
      self
        .lock()
        .attendance
        .iter()
        .filter(|a| a.company_id == company && a.event_id == event_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_person_attendance(
    &self,
    company: CompanyId,
    person_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>, MemoryError> {
    Ok(
      self
        .lock()
        .attendance
        .iter()
        .filter(|a| a.company_id == company && a.person_id == person_id)
        .cloned()
        .collect(),
    )
  }

  async fn add_ministry(&self, company: CompanyId, input: NewMinistry) -> Result<Ministry, MemoryError> {
    let ministry = Ministry {
      ministry_id: Uuid::new_v4(),
      company_id:  company,
      name:        input.name,
      description: input.description,
      created_at:  Utc::now(),
    };
    self.lock().ministries.push(ministry.clone());
    Ok(ministry)
  }

  async fn get_ministry(&self, company: CompanyId, id: Uuid) -> Result<Option<Ministry>, MemoryError> {
    Ok(
      self
        .lock()
        .ministries
        .iter()
        .find(|m| m.company_id == company && m.ministry_id == id)
        .cloned(),
    )
  }

  async fn list_ministries(&self, company: CompanyId) -> Result<Vec<Ministry>, MemoryError> {
    Ok(
      self
        .lock()
        .ministries
        .iter()
        .filter(|m| m.company_id == company)
        .cloned()
        .collect(),
    )
  }

  async fn set_ministry_role(
    &self,
    company: CompanyId,
    membership: MinistryMembership,
  ) -> Result<MinistryMembership, MemoryError> {
    let mut state = self.lock();
    state.roles.retain(|r| {
      !(r.company_id == company
        && r.ministry_id == membership.ministry_id
        && r.person_id == membership.person_id)
    });
    state.roles.push(membership.clone());
    Ok(membership)
  }

  async fn get_ministry_membership(
    &self,
    company: CompanyId,
    ministry_id: Uuid,
    person_id: Uuid,
  ) -> Result<Option<MinistryMembership>, MemoryError> {
    Ok(
      self
        .lock()
        .roles
        .iter()
        .find(|r| {
          r.company_id == company && r.ministry_id == ministry_id && r.person_id == person_id
        })
        .cloned(),
    )
  }

  async fn add_cell_group(&self, company: CompanyId, input: NewCellGroup) -> Result<CellGroup, MemoryError> {
    let cell = CellGroup {
      cell_group_id: Uuid::new_v4(),
      company_id:    company,
      ministry_id:   input.ministry_id,
      name:          input.name,
      description:   input.description,
      created_at:    Utc::now(),
    };
    let mut state = self.lock();
    state.links.extend(input.members.into_iter().map(|person_id| CellMembership {
      company_id: company,
      cell_group_id: cell.cell_group_id,
      person_id,
    }));
    state.cells.push(cell.clone());
    Ok(cell)
  }

  async fn get_cell_group(&self, company: CompanyId, id: Uuid) -> Result<Option<CellGroup>, MemoryError> {
    Ok(
      self
        .lock()
        .cells
        .iter()
        .find(|c| c.company_id == company && c.cell_group_id == id)
        .cloned(),
    )
  }

  async fn list_cell_groups(
    &self,
    company: CompanyId,
    ministry_id: Uuid,
  ) -> Result<Vec<CellGroup>, MemoryError> {
    Ok(
      self
        .lock()
        .cells
        .iter()
        .filter(|c| c.company_id == company && c.ministry_id == ministry_id)
        .cloned()
        .collect(),
    )
  }

  async fn update_cell_group(
    &self,
    company: CompanyId,
    id: Uuid,
    update: CellGroupUpdate,
  ) -> Result<Option<CellGroup>, MemoryError> {
    let mut state = self.lock();
    let Some(cell) = state
      .cells
      .iter_mut()
      .find(|c| c.company_id == company && c.cell_group_id == id)
    else {
      return Ok(None);
    };
    cell.name = update.name;
    cell.description = update.description;
    let cell = cell.clone();

    if let Some(members) = update.members {
      state
        .links
        .retain(|l| !(l.company_id == company && l.cell_group_id == id));
      state.links.extend(members.into_iter().map(|person_id| CellMembership {
        company_id: company,
        cell_group_id: id,
        person_id,
      }));
    }
    Ok(Some(cell))
  }

  async fn list_cell_members(
    &self,
    company: CompanyId,
    cell_group_id: Uuid,
  ) -> Result<Vec<CellMembership>, MemoryError> {
    Ok(self.cell_links(company, cell_group_id))
  }

  async fn add_role(&self, input: NewRole) -> Result<Role, MemoryError> {
    let role = Role {
      role_id:     Uuid::new_v4(),
      module_id:   input.module_id,
      name:        input.name,
      description: input.description,
      created_at:  Utc::now(),
    };
    self.lock().catalog.push(role.clone());
    Ok(role)
  }

  async fn get_role(&self, id: Uuid) -> Result<Option<Role>, MemoryError> {
    Ok(self.lock().catalog.iter().find(|r| r.role_id == id).cloned())
  }

  async fn list_roles(&self) -> Result<Vec<Role>, MemoryError> {
    Ok(self.lock().catalog.clone())
  }

  async fn add_permission(&self, input: NewPermission) -> Result<Permission, MemoryError> {
    let mut state = self.lock();
    if state.grants.iter().any(|p| p.name == input.name) {
      return Err(MemoryError::Duplicate("permission"));
    }
    let permission = Permission {
      permission_id: Uuid::new_v4(),
      name:          input.name,
      token:         input.token,
      description:   input.description,
      created_at:    Utc::now(),
    };
    state.grants.push(permission.clone());
    Ok(permission)
  }

  async fn get_permission(&self, id: Uuid) -> Result<Option<Permission>, MemoryError> {
    Ok(self.lock().grants.iter().find(|p| p.permission_id == id).cloned())
  }

  async fn list_permissions(&self) -> Result<Vec<Permission>, MemoryError> {
    Ok(self.lock().grants.clone())
  }
}
