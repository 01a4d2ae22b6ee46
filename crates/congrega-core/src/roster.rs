//! The event roster: every active person of the tenant, tagged with whether
//! they were present at a given event.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result, Tenant,
  person::PersonStatus,
  store::CommunityStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
  pub id:      Uuid,
  pub name:    String,
  #[serde(rename = "type")]
  pub kind:    String,
  pub photo:   Option<String>,
  pub present: bool,
}

impl<S: CommunityStore> Tenant<'_, S> {
  /// Build the roster for an event of this tenant (active or canceled).
  ///
  /// Iteration is driven by the active people list, in insertion order.
  /// Attendance of inactive people still lands in the presence set but
  /// produces no row.
  #[tracing::instrument(skip(self), fields(company = %self.company))]
  pub async fn resolve_roster(&self, event_id: Uuid) -> Result<Vec<RosterEntry>> {
    self.require_event(event_id).await?;

    let people = self
      .store
      .list_people(self.company, Some(PersonStatus::Active))
      .await
      .map_err(Error::from_store)?;
    let attendance = self
      .store
      .list_event_attendance(self.company, event_id)
      .await
      .map_err(Error::from_store)?;

    let present: HashSet<Uuid> =
      attendance.into_iter().map(|a| a.person_id).collect();

    Ok(
      people
        .into_iter()
        .map(|p| RosterEntry {
          present: present.contains(&p.person_id),
          id:      p.person_id,
          name:    p.name,
          kind:    p.kind,
          photo:   p.photo,
        })
        .collect(),
    )
  }
}
