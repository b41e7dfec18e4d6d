use crate::describe::describe_change;
use crate::snapshot::{ChangeKind, SectionSnapshot};
use chrono::{DateTime, Utc};
use constitution_model::{Actor, SectionId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of one change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub constitution_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    pub change_kind: ChangeKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<SectionSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<SectionSnapshot>,
    pub actor_id: String,
    pub actor_name: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Build an entry stamped now, generating its description
    pub fn record(
        constitution_id: impl Into<String>,
        section_id: Option<SectionId>,
        change_kind: ChangeKind,
        before: Option<SectionSnapshot>,
        after: Option<SectionSnapshot>,
        actor: &Actor,
    ) -> Self {
        let description = describe_change(change_kind, before.as_ref(), after.as_ref());
        Self {
            id: Uuid::new_v4().to_string(),
            constitution_id: constitution_id.into(),
            section_id,
            change_kind,
            description,
            before,
            after,
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Titles carried by either snapshot
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.before
            .iter()
            .chain(self.after.iter())
            .filter_map(|s| s.title_text())
    }
}
