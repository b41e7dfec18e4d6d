//! # Section Store
//!
//! Boundary to the hosted document store. The engine only needs get-all,
//! batched writes, and a change stream; [`MemorySectionStore`] is the
//! in-process implementation used by tests and the CLI.
//!
//! ## Write Semantics
//!
//! - A batch commits entirely or not at all
//! - `expected_version` turns an update into compare-and-swap
//! - Every committed batch bumps each touched section's `version` and
//!   pushes one full snapshot to subscribers

use chrono::Utc;
use constitution_model::{Section, SectionId, SectionPatch};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Full section list delivered to subscribers after each commit
pub type Snapshot = Arc<Vec<Section>>;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Section not found: {0}")]
    NotFound(SectionId),

    #[error("Section already exists: {0}")]
    Duplicate(SectionId),

    #[error("Version conflict on {id}: expected {expected}, found {actual}")]
    Conflict {
        id: SectionId,
        expected: u64,
        actual: u64,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// One write inside a batch
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Insert(Section),
    Update {
        id: SectionId,
        patch: SectionPatch,
        expected_version: Option<u64>,
    },
    /// Overwrite the cached positional counters
    SetCounters {
        id: SectionId,
        article_number: Option<u32>,
        section_number: Option<u32>,
        amendment_number: Option<u32>,
    },
    Delete {
        id: SectionId,
        expected_version: Option<u64>,
    },
}

impl StoreWrite {
    pub fn update(id: SectionId, patch: SectionPatch) -> Self {
        StoreWrite::Update {
            id,
            patch,
            expected_version: None,
        }
    }
}

/// Section collection scoped to one constitution
pub trait SectionStore: Send + Sync {
    fn constitution_id(&self) -> &str;

    fn list(&self) -> Result<Vec<Section>, StoreError>;

    /// Apply all writes atomically on behalf of `actor_id`. Returns the
    /// resulting section for each write (the removed one for deletes).
    fn commit(&self, writes: Vec<StoreWrite>, actor_id: &str) -> Result<Vec<Section>, StoreError>;

    /// Receive a full snapshot after every committed batch, from any writer
    fn subscribe(&self) -> broadcast::Receiver<Snapshot>;

    fn get(&self, id: &SectionId) -> Result<Option<Section>, StoreError> {
        Ok(self.list()?.into_iter().find(|s| &s.id == id))
    }

    fn insert(&self, section: Section, actor_id: &str) -> Result<Section, StoreError> {
        single(self.commit(vec![StoreWrite::Insert(section)], actor_id)?)
    }

    fn update(
        &self,
        id: &SectionId,
        patch: SectionPatch,
        actor_id: &str,
    ) -> Result<Section, StoreError> {
        single(self.commit(vec![StoreWrite::update(id.clone(), patch)], actor_id)?)
    }

    fn delete(&self, id: &SectionId, actor_id: &str) -> Result<Section, StoreError> {
        let write = StoreWrite::Delete {
            id: id.clone(),
            expected_version: None,
        };
        single(self.commit(vec![write], actor_id)?)
    }
}

fn single(mut results: Vec<Section>) -> Result<Section, StoreError> {
    results
        .pop()
        .ok_or_else(|| StoreError::Unavailable("store returned no result".to_string()))
}

/// In-memory store with snapshot broadcasting
pub struct MemorySectionStore {
    constitution_id: String,
    sections: Mutex<Vec<Section>>,
    changes: broadcast::Sender<Snapshot>,
}

impl MemorySectionStore {
    pub fn new(constitution_id: impl Into<String>) -> Self {
        Self::with_sections(constitution_id, Vec::new())
    }

    /// Seed the store, e.g. from a loaded document file
    pub fn with_sections(constitution_id: impl Into<String>, sections: Vec<Section>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            constitution_id: constitution_id.into(),
            sections: Mutex::new(sections),
            changes,
        }
    }

    fn apply_write(
        sections: &mut Vec<Section>,
        write: StoreWrite,
        actor_id: &str,
    ) -> Result<Section, StoreError> {
        let now = Utc::now();

        match write {
            StoreWrite::Insert(mut section) => {
                if sections.iter().any(|s| s.id == section.id) {
                    return Err(StoreError::Duplicate(section.id));
                }
                section.version = 1;
                section.last_modified = now;
                section.last_modified_by = actor_id.to_string();
                sections.push(section.clone());
                Ok(section)
            }

            StoreWrite::Update {
                id,
                patch,
                expected_version,
            } => {
                let section = find_mut(sections, &id)?;
                check_version(section, expected_version)?;
                patch.apply_to(section);
                touch(section, actor_id);
                Ok(section.clone())
            }

            StoreWrite::SetCounters {
                id,
                article_number,
                section_number,
                amendment_number,
            } => {
                let section = find_mut(sections, &id)?;
                section.article_number = article_number;
                section.section_number = section_number;
                section.amendment_number = amendment_number;
                section.version += 1;
                Ok(section.clone())
            }

            StoreWrite::Delete {
                id,
                expected_version,
            } => {
                let index = sections
                    .iter()
                    .position(|s| s.id == id)
                    .ok_or_else(|| StoreError::NotFound(id.clone()))?;
                check_version(&sections[index], expected_version)?;
                Ok(sections.remove(index))
            }
        }
    }
}

fn find_mut<'s>(sections: &'s mut [Section], id: &SectionId) -> Result<&'s mut Section, StoreError> {
    sections
        .iter_mut()
        .find(|s| &s.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

fn check_version(section: &Section, expected: Option<u64>) -> Result<(), StoreError> {
    match expected {
        Some(expected) if expected != section.version => Err(StoreError::Conflict {
            id: section.id.clone(),
            expected,
            actual: section.version,
        }),
        _ => Ok(()),
    }
}

fn touch(section: &mut Section, actor_id: &str) {
    section.version += 1;
    section.last_modified = Utc::now();
    section.last_modified_by = actor_id.to_string();
}

impl SectionStore for MemorySectionStore {
    fn constitution_id(&self) -> &str {
        &self.constitution_id
    }

    fn list(&self) -> Result<Vec<Section>, StoreError> {
        Ok(self
            .sections
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clone())
    }

    fn commit(&self, writes: Vec<StoreWrite>, actor_id: &str) -> Result<Vec<Section>, StoreError> {
        let mut sections = self.sections.lock().map_err(|_| StoreError::Poisoned)?;

        // Work on a copy so a failing write leaves nothing behind
        let mut staged = sections.clone();
        let mut results = Vec::with_capacity(writes.len());
        for write in writes {
            results.push(Self::apply_write(&mut staged, write, actor_id)?);
        }

        *sections = staged;
        let snapshot: Snapshot = Arc::new(sections.clone());
        drop(sections);

        // No subscribers is not an error
        let receivers = self.changes.send(snapshot).unwrap_or(0);
        debug!(
            constitution_id = %self.constitution_id,
            writes = results.len(),
            receivers,
            "Committed batch"
        );

        Ok(results)
    }

    fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constitution_model::SectionType;

    fn store_with(ids: &[&str]) -> MemorySectionStore {
        let sections = ids
            .iter()
            .enumerate()
            .map(|(i, id)| Section::new(*id, SectionType::Article, i as f64 + 1.0, None))
            .collect();
        MemorySectionStore::with_sections("club", sections)
    }

    #[test]
    fn test_failed_batch_applies_nothing() {
        let store = store_with(&["a1", "a2"]);

        let result = store.commit(
            vec![
                StoreWrite::update("a1".into(), SectionPatch::order(2.0)),
                StoreWrite::Update {
                    id: "a2".into(),
                    patch: SectionPatch::order(1.0),
                    expected_version: Some(7),
                },
            ],
            "u1",
        );

        assert!(matches!(result, Err(StoreError::Conflict { expected: 7, .. })));
        let sections = store.list().unwrap();
        assert_eq!(sections[0].order, 1.0);
        assert_eq!(sections[1].order, 2.0);
    }

    #[test]
    fn test_update_bumps_version_and_author() {
        let store = store_with(&["a1"]);
        let updated = store
            .update(&"a1".into(), SectionPatch::title("Name"), "u9")
            .unwrap();
        assert_eq!(updated.version, 1);
        assert_eq!(updated.last_modified_by, "u9");
        assert_eq!(updated.title.as_deref(), Some("Name"));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = store_with(&["a1"]);
        let again = Section::new("a1", SectionType::Article, 5.0, None);
        assert_eq!(
            store.insert(again, "u1").unwrap_err(),
            StoreError::Duplicate("a1".into())
        );
    }

    #[test]
    fn test_subscribers_get_snapshot_per_commit() {
        let store = store_with(&["a1"]);
        let mut rx = store.subscribe();

        store.delete(&"a1".into(), "u1").unwrap();
        let snapshot = rx.try_recv().unwrap();
        assert!(snapshot.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
