//! Advisory "currently editing" markers. Nothing here blocks a write; the
//! board only tells other editors who else has a section open.

use chrono::{DateTime, Utc};
use constitution_model::{Actor, SectionId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub actor: Actor,
    pub since: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct PresenceBoard {
    markers: RwLock<HashMap<SectionId, Vec<Presence>>>,
}

impl PresenceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `actor` as editing `section_id`. Repeated calls keep the original
    /// start time.
    pub fn begin_editing(&self, section_id: &SectionId, actor: &Actor) {
        let mut markers = self.markers.write().unwrap_or_else(PoisonError::into_inner);
        let editors = markers.entry(section_id.clone()).or_default();
        if !editors.iter().any(|p| p.actor.id == actor.id) {
            editors.push(Presence {
                actor: actor.clone(),
                since: Utc::now(),
            });
        }
    }

    pub fn end_editing(&self, section_id: &SectionId, actor_id: &str) {
        let mut markers = self.markers.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(editors) = markers.get_mut(section_id) {
            editors.retain(|p| p.actor.id != actor_id);
            if editors.is_empty() {
                markers.remove(section_id);
            }
        }
    }

    /// Everyone editing `section_id`, earliest first
    pub fn editors_of(&self, section_id: &SectionId) -> Vec<Presence> {
        self.markers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(section_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop every marker held by `actor_id`, e.g. on disconnect
    pub fn clear_actor(&self, actor_id: &str) {
        let mut markers = self.markers.write().unwrap_or_else(PoisonError::into_inner);
        markers.retain(|_, editors| {
            editors.retain(|p| p.actor.id != actor_id);
            !editors.is_empty()
        });
    }
}
