//! # Constitution Editor
//!
//! Editing engine for constitution documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ store: SectionStore (batched writes, CAS,   │
//! │        snapshot broadcast)                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document                            │
//! │  - create / update / delete with validation │
//! │  - move up/down, drag-and-drop relocation   │
//! │  - counter cache refresh                    │
//! │  - audit entry per committed write          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ numbering / pagination: pure views over a   │
//! │ section snapshot                            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Position is truth**: numbers are derived from `order` and `parentId`
//! 2. **Deletes do not cascade**: children become orphans and are reported
//! 3. **Swaps are atomic**: both rows or neither
//! 4. **Audit is best-effort**: a log outage never blocks an edit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use constitution_editor::{Direction, Document};
//! use constitution_model::{Actor, SectionType};
//!
//! let doc = Document::in_memory("club");
//! let actor = Actor::new("u1", "Dana");
//!
//! let article = doc.create(SectionType::Article, None, &actor)?;
//! doc.create(SectionType::Section, Some(article.id.clone()), &actor)?;
//! doc.move_section(&article.id, Direction::Down, &actor)?;
//!
//! let mut changes = doc.subscribe();
//! let snapshot = changes.recv().await?;
//! ```

mod document;
mod errors;
mod mutations;
mod presence;
mod reorder;
mod store;

pub use document::{default_title, Document};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationResult};
pub use presence::{Presence, PresenceBoard};
pub use reorder::{validate_move, Direction, MoveOutcome, MoveRejection};
pub use store::{MemorySectionStore, SectionStore, Snapshot, StoreError, StoreWrite};
