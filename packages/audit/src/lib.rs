//! # Constitution Audit
//!
//! Converts before/after section snapshots into audit entries with a
//! generated description, and defines the append-only log those entries
//! are written to.

mod describe;
mod entry;
mod log;
mod snapshot;

pub use describe::{describe_change, diff_fragments, display_name, format_order};
pub use entry::AuditEntry;
pub use log::{search, AuditError, AuditLog, AuditQuery, MemoryAuditLog, RECENT_LIMIT};
pub use snapshot::{ChangeKind, SectionSnapshot};
