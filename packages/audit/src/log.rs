//! # Audit Log
//!
//! Append-only log contract plus the client-side search the history view
//! runs over the most recent entries.

use crate::entry::AuditEntry;
use crate::snapshot::ChangeKind;
use std::sync::RwLock;
use thiserror::Error;

/// Read-back cap for the history view
pub const RECENT_LIMIT: usize = 100;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuditError {
    #[error("Audit log unavailable: {0}")]
    Unavailable(String),

    #[error("Audit log lock poisoned")]
    Poisoned,
}

/// Append-only audit storage
pub trait AuditLog: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;

    /// Latest `limit` entries, newest first
    fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError>;
}

/// In-process audit log
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .write()
            .map_err(|_| AuditError::Poisoned)?
            .push(entry);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self.entries.read().map_err(|_| AuditError::Poisoned)?;
        // Newest appended first, then a stable sort keeps that for equal stamps
        let mut latest: Vec<AuditEntry> = entries.iter().rev().cloned().collect();
        latest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        latest.truncate(limit);
        Ok(latest)
    }
}

/// History filter; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditQuery {
    pub actor_id: Option<String>,
    pub change_kind: Option<ChangeKind>,
    /// Case-insensitive match against description and snapshot titles
    pub text: Option<String>,
}

impl AuditQuery {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(actor_id) = &self.actor_id {
            if &entry.actor_id != actor_id {
                return false;
            }
        }

        if let Some(kind) = self.change_kind {
            if entry.change_kind != kind {
                return false;
            }
        }

        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                entry.description.to_lowercase().contains(&needle)
                    || entry
                        .titles()
                        .any(|title| title.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Most recent entries matching `query`, newest first
pub fn search(log: &dyn AuditLog, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError> {
    Ok(log
        .recent(RECENT_LIMIT)?
        .into_iter()
        .filter(|entry| query.matches(entry))
        .collect())
}
