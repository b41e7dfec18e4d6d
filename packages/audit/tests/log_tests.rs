//! Audit log read-back and search

use constitution_audit::{
    search, AuditEntry, AuditLog, AuditQuery, ChangeKind, MemoryAuditLog, SectionSnapshot,
};
use constitution_model::{Actor, SectionType};

fn snapshot(title: &str) -> SectionSnapshot {
    SectionSnapshot {
        title: Some(title.to_string()),
        content: String::new(),
        section_type: SectionType::Article,
        order: 1.0,
        parent_id: None,
        article_number: None,
        section_number: None,
        amendment_number: None,
    }
}

fn entry(kind: ChangeKind, title: &str, actor: &Actor) -> AuditEntry {
    let snap = snapshot(title);
    let (before, after) = match kind {
        ChangeKind::Delete => (Some(snap), None),
        ChangeKind::Create => (None, Some(snap)),
        _ => (Some(snap.clone()), Some(snap)),
    };
    AuditEntry::record("club", None, kind, before, after, actor)
}

#[test]
fn test_recent_is_newest_first_and_capped() {
    let log = MemoryAuditLog::new();
    let actor = Actor::new("u1", "Dana");
    for i in 0..120 {
        log.append(entry(ChangeKind::Create, &format!("Article {}", i), &actor))
            .unwrap();
    }

    let recent = log.recent(100).unwrap();
    assert_eq!(recent.len(), 100);
    assert_eq!(recent[0].after.as_ref().unwrap().title.as_deref(), Some("Article 119"));
    assert_eq!(recent[99].after.as_ref().unwrap().title.as_deref(), Some("Article 20"));
}

#[test]
fn test_search_by_actor_kind_and_text() {
    let log = MemoryAuditLog::new();
    let dana = Actor::new("u1", "Dana");
    let lee = Actor::new("u2", "Lee");

    log.append(entry(ChangeKind::Create, "Membership", &dana)).unwrap();
    log.append(entry(ChangeKind::Delete, "Elections", &lee)).unwrap();
    log.append(entry(ChangeKind::Update, "Finances", &dana)).unwrap();

    let by_actor = search(
        &log,
        &AuditQuery {
            actor_id: Some("u1".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_actor.len(), 2);

    let deletes = search(
        &log,
        &AuditQuery {
            change_kind: Some(ChangeKind::Delete),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].actor_name, "Lee");

    // Update descriptions never mention the title, so this hits the snapshot
    let finances = search(
        &log,
        &AuditQuery {
            text: Some("FINANCE".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(finances.len(), 1);
    assert_eq!(finances[0].change_kind, ChangeKind::Update);

    let everything = search(&log, &AuditQuery::default()).unwrap();
    assert_eq!(everything.len(), 3);
}
