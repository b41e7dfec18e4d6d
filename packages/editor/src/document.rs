//! # Document
//!
//! Create, update and delete sections of one constitution against a
//! [`SectionStore`], recording an audit entry for every committed write.
//!
//! Audit writes are best-effort: a failing [`AuditLog`] is reported through
//! `tracing` and never fails the mutation that triggered it.

use crate::errors::EditorError;
use crate::store::{MemorySectionStore, SectionStore, Snapshot, StoreWrite};
use constitution_audit::{AuditEntry, AuditLog, ChangeKind, MemoryAuditLog, SectionSnapshot};
use constitution_model::{
    check_parentage, Actor, Hierarchy, Section, SectionId, SectionPatch, SectionType,
};
use constitution_numbering::{Numberer, NumberingError};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Title given to a freshly created section
pub fn default_title(section_type: SectionType) -> &'static str {
    match section_type {
        SectionType::Preamble => "Preamble",
        SectionType::Article => "New Article",
        SectionType::Section => "New Section",
        SectionType::Subsection => "New Subsection",
        SectionType::Amendment => "New Amendment",
    }
}

/// One constitution's sections plus its audit trail
#[derive(Clone)]
pub struct Document {
    store: Arc<dyn SectionStore>,
    audit: Arc<dyn AuditLog>,
}

impl Document {
    pub fn new(store: Arc<dyn SectionStore>, audit: Arc<dyn AuditLog>) -> Self {
        Self { store, audit }
    }

    /// Empty document backed by in-memory store and audit log
    pub fn in_memory(constitution_id: impl Into<String>) -> Self {
        Self::from_sections(constitution_id, Vec::new())
    }

    /// In-memory document seeded with existing sections
    pub fn from_sections(constitution_id: impl Into<String>, sections: Vec<Section>) -> Self {
        Self::new(
            Arc::new(MemorySectionStore::with_sections(constitution_id, sections)),
            Arc::new(MemoryAuditLog::new()),
        )
    }

    pub fn constitution_id(&self) -> &str {
        self.store.constitution_id()
    }

    pub fn store(&self) -> &Arc<dyn SectionStore> {
        &self.store
    }

    pub fn audit_log(&self) -> &Arc<dyn AuditLog> {
        &self.audit
    }

    pub fn list(&self) -> Result<Vec<Section>, EditorError> {
        Ok(self.store.list()?)
    }

    pub fn get(&self, id: &SectionId) -> Result<Section, EditorError> {
        self.store
            .get(id)?
            .ok_or_else(|| EditorError::NotFound(id.clone()))
    }

    /// Full snapshot after every committed write, from any editor
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.store.subscribe()
    }

    /// Add a section at the end of its sibling group
    #[instrument(skip(self, actor), fields(constitution_id = %self.constitution_id()))]
    pub fn create(
        &self,
        section_type: SectionType,
        parent_id: Option<SectionId>,
        actor: &Actor,
    ) -> Result<Section, EditorError> {
        let sections = self.store.list()?;
        let hierarchy = Hierarchy::new(&sections);

        if section_type == SectionType::Preamble
            && sections
                .iter()
                .any(|s| s.section_type == SectionType::Preamble)
        {
            return Err(EditorError::Validation(
                "A constitution may only have one preamble".to_string(),
            ));
        }

        let parent = resolve_parent(&hierarchy, parent_id.as_ref())?;
        check_parentage(section_type, parent).map_err(EditorError::Validation)?;

        let siblings = hierarchy.children_of(parent_id.as_ref());
        let order = siblings
            .iter()
            .map(|s| s.order)
            .fold(None, |max: Option<f64>, o| Some(max.map_or(o, |m| m.max(o))))
            .map_or(1.0, |max| max + 1.0);

        let mut section = Section::new(
            Uuid::new_v4().to_string(),
            section_type,
            order,
            parent_id,
        )
        .with_title(default_title(section_type));

        // Counters cached for display in audit entries and legacy readers
        let next = |ty: SectionType, pool: &[&Section]| {
            Some(pool.iter().filter(|s| s.section_type == ty).count() as u32 + 1)
        };
        match section_type {
            SectionType::Article => {
                section.article_number = next(SectionType::Article, &hierarchy.top_level())
            }
            SectionType::Amendment => {
                section.amendment_number = next(SectionType::Amendment, &hierarchy.top_level())
            }
            SectionType::Section => section.section_number = next(SectionType::Section, &siblings),
            SectionType::Preamble | SectionType::Subsection => {}
        }

        let created = self.store.insert(section, &actor.id)?;
        info!(section_id = %created.id, section_type = %created.section_type, "Created section");

        self.record(
            ChangeKind::Create,
            &created.id,
            None,
            Some(SectionSnapshot::from(&created)),
            actor,
        );
        Ok(created)
    }

    /// Apply a partial update. An empty patch writes and records nothing.
    #[instrument(skip(self, patch, actor), fields(constitution_id = %self.constitution_id()))]
    pub fn update(
        &self,
        id: &SectionId,
        patch: SectionPatch,
        actor: &Actor,
    ) -> Result<Section, EditorError> {
        self.patch_section(id, patch, ChangeKind::Update, actor)
    }

    /// Shared write path for updates and relocations
    pub(crate) fn patch_section(
        &self,
        id: &SectionId,
        patch: SectionPatch,
        kind: ChangeKind,
        actor: &Actor,
    ) -> Result<Section, EditorError> {
        let sections = self.store.list()?;
        let before = sections
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| EditorError::NotFound(id.clone()))?;

        if patch.is_empty() {
            debug!(section_id = %id, "Empty patch, nothing to write");
            return Ok(before);
        }

        if patch.touches_structure() {
            validate_placement(&sections, &before, &patch)?;
        }

        let after = self.store.update(id, patch, &actor.id)?;
        debug!(section_id = %id, version = after.version, "Updated section");

        self.record(
            kind,
            id,
            Some(SectionSnapshot::from(&before)),
            Some(SectionSnapshot::from(&after)),
            actor,
        );
        Ok(after)
    }

    /// Hard delete. Children are left in place with a dangling parent.
    #[instrument(skip(self, actor), fields(constitution_id = %self.constitution_id()))]
    pub fn delete(&self, id: &SectionId, actor: &Actor) -> Result<Section, EditorError> {
        let orphaned = self
            .store
            .list()?
            .iter()
            .filter(|s| s.parent_id.as_ref() == Some(id))
            .count();
        let removed = self.store.delete(id, &actor.id)?;

        if orphaned > 0 {
            warn!(section_id = %id, orphaned, "Deleted section left children without a parent");
        } else {
            info!(section_id = %id, "Deleted section");
        }

        self.record(
            ChangeKind::Delete,
            id,
            Some(SectionSnapshot::from(&removed)),
            None,
            actor,
        );
        Ok(removed)
    }

    /// Overwrite stale counter caches with positional numbers. Returns how
    /// many sections changed. Not audited.
    #[instrument(skip(self, actor), fields(constitution_id = %self.constitution_id()))]
    pub fn refresh_numbering(&self, actor: &Actor) -> Result<usize, EditorError> {
        let sections = self.store.list()?;
        let numberer = Numberer::new(&sections);

        let writes: Vec<StoreWrite> = sections
            .iter()
            .filter_map(|section| {
                let rank = numberer.rank(section).map(|r| r as u32);
                let (article_number, section_number, amendment_number) =
                    match section.section_type {
                        SectionType::Article => (rank, None, None),
                        SectionType::Section => (None, rank, None),
                        SectionType::Amendment => (None, None, rank),
                        SectionType::Preamble | SectionType::Subsection => (None, None, None),
                    };

                let stale = section.article_number != article_number
                    || section.section_number != section_number
                    || section.amendment_number != amendment_number;

                stale.then(|| StoreWrite::SetCounters {
                    id: section.id.clone(),
                    article_number,
                    section_number,
                    amendment_number,
                })
            })
            .collect();

        let changed = writes.len();
        if changed > 0 {
            self.store.commit(writes, &actor.id)?;
        }
        info!(changed, "Refreshed numbering");
        Ok(changed)
    }

    /// Sections whose parent no longer exists
    pub fn orphans(&self) -> Result<Vec<Section>, EditorError> {
        let sections = self.store.list()?;
        let orphans = Hierarchy::new(&sections)
            .orphans()
            .into_iter()
            .cloned()
            .collect();
        Ok(orphans)
    }

    pub fn display_title(&self, id: &SectionId) -> Result<String, EditorError> {
        let sections = self.store.list()?;
        let section = find(&sections, id)?;
        Ok(Numberer::new(&sections).display_title(section)?)
    }

    pub fn indent_level(&self, id: &SectionId) -> Result<usize, EditorError> {
        let sections = self.store.list()?;
        let section = find(&sections, id)?;
        Ok(Numberer::new(&sections).indent_level(section)?)
    }

    pub(crate) fn record(
        &self,
        kind: ChangeKind,
        section_id: &SectionId,
        before: Option<SectionSnapshot>,
        after: Option<SectionSnapshot>,
        actor: &Actor,
    ) {
        let entry = AuditEntry::record(
            self.constitution_id(),
            Some(section_id.clone()),
            kind,
            before,
            after,
            actor,
        );

        if let Err(e) = self.audit.append(entry) {
            warn!(
                section_id = %section_id,
                change_kind = %kind,
                error = %e,
                "Failed to record audit entry"
            );
        }
    }
}

pub(crate) fn find<'s>(sections: &'s [Section], id: &SectionId) -> Result<&'s Section, EditorError> {
    sections
        .iter()
        .find(|s| &s.id == id)
        .ok_or_else(|| EditorError::NotFound(id.clone()))
}

fn resolve_parent<'a>(
    hierarchy: &Hierarchy<'a>,
    parent_id: Option<&SectionId>,
) -> Result<Option<&'a Section>, EditorError> {
    match parent_id {
        None => Ok(None),
        Some(id) => hierarchy
            .get(id)
            .map(Some)
            .ok_or_else(|| EditorError::ParentNotFound(id.clone())),
    }
}

/// Re-check parentage for a patch that changes type or parent
fn validate_placement(
    sections: &[Section],
    current: &Section,
    patch: &SectionPatch,
) -> Result<(), EditorError> {
    let hierarchy = Hierarchy::new(sections);
    let section_type = patch.section_type.unwrap_or(current.section_type);
    let parent_id = match &patch.parent_id {
        Some(parent_id) => parent_id.as_ref(),
        None => current.parent_id.as_ref(),
    };

    if section_type == SectionType::Preamble
        && sections
            .iter()
            .any(|s| s.section_type == SectionType::Preamble && s.id != current.id)
    {
        return Err(EditorError::Validation(
            "A constitution may only have one preamble".to_string(),
        ));
    }

    let parent = resolve_parent(&hierarchy, parent_id)?;
    check_parentage(section_type, parent).map_err(EditorError::Validation)?;

    // Existing children must still be allowed under the new type
    if section_type != current.section_type {
        let mut retyped = current.clone();
        retyped.section_type = section_type;
        for child in hierarchy.children_of(Some(&current.id)) {
            check_parentage(child.section_type, Some(&retyped))
                .map_err(EditorError::Validation)?;
        }
    }

    if let Some(parent) = parent {
        let ancestors = hierarchy
            .ancestors(parent)
            .map_err(NumberingError::from)?;
        if parent.id == current.id || ancestors.iter().any(|a| a.id == current.id) {
            return Err(EditorError::CycleDetected {
                id: current.id.clone(),
                parent_id: parent.id.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use constitution_audit::AuditError;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn actor() -> Actor {
        Actor::new("u1", "Dana")
    }

    struct FailingAuditLog;

    impl AuditLog for FailingAuditLog {
        fn append(&self, _entry: AuditEntry) -> Result<(), AuditError> {
            Err(AuditError::Unavailable("offline".to_string()))
        }

        fn recent(&self, _limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
            Err(AuditError::Unavailable("offline".to_string()))
        }
    }

    /// Reads fail once a delete has committed
    struct ReadsFailAfterDelete {
        inner: MemorySectionStore,
        deleted: AtomicBool,
    }

    impl SectionStore for ReadsFailAfterDelete {
        fn constitution_id(&self) -> &str {
            self.inner.constitution_id()
        }

        fn list(&self) -> Result<Vec<Section>, StoreError> {
            if self.deleted.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("replica lag".to_string()));
            }
            self.inner.list()
        }

        fn commit(
            &self,
            writes: Vec<StoreWrite>,
            actor_id: &str,
        ) -> Result<Vec<Section>, StoreError> {
            let deletes = writes.iter().any(|w| matches!(w, StoreWrite::Delete { .. }));
            let committed = self.inner.commit(writes, actor_id)?;
            if deletes {
                self.deleted.store(true, Ordering::SeqCst);
            }
            Ok(committed)
        }

        fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
            self.inner.subscribe()
        }
    }

    #[test]
    fn test_create_assigns_order_title_and_counters() {
        let doc = Document::in_memory("club");
        let a1 = doc.create(SectionType::Article, None, &actor()).unwrap();
        let a2 = doc.create(SectionType::Article, None, &actor()).unwrap();
        let s1 = doc
            .create(SectionType::Section, Some(a1.id.clone()), &actor())
            .unwrap();

        assert_eq!(a1.order, 1.0);
        assert_eq!(a2.order, 2.0);
        assert_eq!(s1.order, 1.0);
        assert_eq!(a2.title.as_deref(), Some("New Article"));
        assert_eq!(a2.article_number, Some(2));
        assert_eq!(s1.section_number, Some(1));
        assert_eq!(s1.last_modified_by, "u1");
    }

    #[test]
    fn test_create_rejects_invalid_parentage() {
        let doc = Document::in_memory("club");
        let preamble = doc.create(SectionType::Preamble, None, &actor()).unwrap();

        assert!(matches!(
            doc.create(SectionType::Preamble, None, &actor()),
            Err(EditorError::Validation(_))
        ));
        assert_eq!(
            doc.create(SectionType::Section, None, &actor()).unwrap_err(),
            EditorError::Validation("Section sections must have a parent".to_string())
        );
        assert!(matches!(
            doc.create(SectionType::Section, Some(preamble.id), &actor()),
            Err(EditorError::Validation(_))
        ));
        assert_eq!(
            doc.create(SectionType::Subsection, Some("gone".into()), &actor())
                .unwrap_err(),
            EditorError::ParentNotFound("gone".into())
        );
        assert_eq!(doc.list().unwrap().len(), 1);
    }

    #[test]
    fn test_update_rejects_cycles() {
        let doc = Document::in_memory("club");
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        let s = doc
            .create(SectionType::Section, Some(a.id.clone()), &actor())
            .unwrap();
        let ss1 = doc
            .create(SectionType::Subsection, Some(s.id.clone()), &actor())
            .unwrap();
        let ss2 = doc
            .create(SectionType::Subsection, Some(ss1.id.clone()), &actor())
            .unwrap();

        let patch = SectionPatch {
            parent_id: Some(Some(ss2.id.clone())),
            ..Default::default()
        };
        assert!(matches!(
            doc.update(&ss1.id, patch, &actor()),
            Err(EditorError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_update_rejects_type_change_that_strands_children() {
        let doc = Document::in_memory("club");
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        doc.create(SectionType::Section, Some(a.id.clone()), &actor())
            .unwrap();

        let patch = SectionPatch {
            section_type: Some(SectionType::Amendment),
            ..Default::default()
        };
        assert_eq!(
            doc.update(&a.id, patch, &actor()).unwrap_err(),
            EditorError::Validation("Section cannot be nested under Amendment".to_string())
        );
        assert_eq!(doc.get(&a.id).unwrap().section_type, SectionType::Article);
        assert!(constitution_model::validate_structure(&doc.list().unwrap()).is_empty());

        // A childless article may become an amendment
        let empty = doc.create(SectionType::Article, None, &actor()).unwrap();
        let patch = SectionPatch {
            section_type: Some(SectionType::Amendment),
            ..Default::default()
        };
        let amended = doc.update(&empty.id, patch, &actor()).unwrap();
        assert_eq!(amended.section_type, SectionType::Amendment);
    }

    #[test]
    fn test_update_rejects_illegal_parent() {
        let doc = Document::in_memory("club");
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        let s = doc
            .create(SectionType::Section, Some(a.id.clone()), &actor())
            .unwrap();
        let ss = doc
            .create(SectionType::Subsection, Some(s.id.clone()), &actor())
            .unwrap();

        let patch = SectionPatch {
            parent_id: Some(Some(a.id.clone())),
            ..Default::default()
        };
        assert!(matches!(
            doc.update(&ss.id, patch, &actor()),
            Err(EditorError::Validation(_))
        ));
        assert_eq!(doc.get(&ss.id).unwrap().parent_id, Some(s.id));
    }

    #[test]
    fn test_empty_patch_writes_nothing() {
        let doc = Document::in_memory("club");
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        let unchanged = doc.update(&a.id, SectionPatch::default(), &actor()).unwrap();

        assert_eq!(unchanged.version, a.version);
        assert_eq!(doc.audit_log().recent(10).unwrap().len(), 1);
    }

    #[test]
    fn test_every_write_is_audited() {
        let doc = Document::in_memory("club");
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        doc.update(&a.id, SectionPatch::title("Name"), &actor())
            .unwrap();
        doc.delete(&a.id, &actor()).unwrap();

        let kinds: Vec<ChangeKind> = doc
            .audit_log()
            .recent(10)
            .unwrap()
            .iter()
            .map(|e| e.change_kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Delete, ChangeKind::Update, ChangeKind::Create]
        );
    }

    #[test]
    fn test_failing_audit_log_does_not_fail_writes() {
        let doc = Document::new(
            Arc::new(MemorySectionStore::new("club")),
            Arc::new(FailingAuditLog),
        );
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        doc.update(&a.id, SectionPatch::content("Text"), &actor())
            .unwrap();

        assert_eq!(doc.get(&a.id).unwrap().content, "Text");
    }

    #[test]
    fn test_delete_leaves_orphans() {
        let doc = Document::in_memory("club");
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        let s = doc
            .create(SectionType::Section, Some(a.id.clone()), &actor())
            .unwrap();
        doc.delete(&a.id, &actor()).unwrap();

        let orphans = doc.orphans().unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, s.id);
        assert_eq!(doc.display_title(&s.id).unwrap(), "Section 1 - New Section");
    }

    #[test]
    fn test_delete_succeeds_when_later_reads_fail() {
        let doc = Document::new(
            Arc::new(ReadsFailAfterDelete {
                inner: MemorySectionStore::new("club"),
                deleted: AtomicBool::new(false),
            }),
            Arc::new(MemoryAuditLog::new()),
        );
        let a = doc.create(SectionType::Article, None, &actor()).unwrap();
        doc.create(SectionType::Section, Some(a.id.clone()), &actor())
            .unwrap();

        let removed = doc.delete(&a.id, &actor()).unwrap();
        assert_eq!(removed.id, a.id);

        let latest = &doc.audit_log().recent(1).unwrap()[0];
        assert_eq!(latest.change_kind, ChangeKind::Delete);
    }

    #[test]
    fn test_refresh_numbering_rewrites_stale_counters() {
        let doc = Document::in_memory("club");
        let a1 = doc.create(SectionType::Article, None, &actor()).unwrap();
        let a2 = doc.create(SectionType::Article, None, &actor()).unwrap();
        doc.update(&a2.id, SectionPatch::order(0.5), &actor())
            .unwrap();

        assert_eq!(doc.refresh_numbering(&Actor::system()).unwrap(), 2);
        assert_eq!(doc.get(&a2.id).unwrap().article_number, Some(1));
        assert_eq!(doc.get(&a1.id).unwrap().article_number, Some(2));
        assert_eq!(doc.refresh_numbering(&Actor::system()).unwrap(), 0);
    }
}
