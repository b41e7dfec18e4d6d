//! # Mutations
//!
//! Serializable editing operations, so a batch of edits can be replayed
//! from a file or sent over the wire and applied through one entry point.
//!
//! ```json
//! [
//!   { "op": "create", "type": "article" },
//!   { "op": "update", "id": "a1", "patch": { "title": "Membership" } },
//!   { "op": "move", "id": "a1", "direction": "up" },
//!   { "op": "relocate", "id": "s3", "destinationIndex": 4 }
//! ]
//! ```

use crate::document::Document;
use crate::errors::EditorError;
use crate::reorder::{Direction, MoveOutcome};
use constitution_model::{Actor, Section, SectionId, SectionPatch, SectionType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    Create {
        #[serde(rename = "type")]
        section_type: SectionType,
        #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
        parent_id: Option<SectionId>,
    },

    Update {
        id: SectionId,
        patch: SectionPatch,
    },

    Delete {
        id: SectionId,
    },

    Move {
        id: SectionId,
        direction: Direction,
    },

    Relocate {
        id: SectionId,
        #[serde(rename = "destinationIndex")]
        destination_index: usize,
    },

    RefreshNumbering,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum MutationResult {
    Created { section: Section },
    Updated { section: Section },
    Deleted { section: Section },
    Moved { outcome: MoveOutcome },
    Refreshed { changed: usize },
}

impl Document {
    /// Apply one mutation on behalf of `actor`
    pub fn apply(&self, mutation: Mutation, actor: &Actor) -> Result<MutationResult, EditorError> {
        match mutation {
            Mutation::Create {
                section_type,
                parent_id,
            } => Ok(MutationResult::Created {
                section: self.create(section_type, parent_id, actor)?,
            }),

            Mutation::Update { id, patch } => Ok(MutationResult::Updated {
                section: self.update(&id, patch, actor)?,
            }),

            Mutation::Delete { id } => Ok(MutationResult::Deleted {
                section: self.delete(&id, actor)?,
            }),

            Mutation::Move { id, direction } => Ok(MutationResult::Moved {
                outcome: self.move_section(&id, direction, actor)?,
            }),

            Mutation::Relocate {
                id,
                destination_index,
            } => Ok(MutationResult::Updated {
                section: self.relocate(&id, destination_index, actor)?,
            }),

            Mutation::RefreshNumbering => Ok(MutationResult::Refreshed {
                changed: self.refresh_numbering(actor)?,
            }),
        }
    }

    /// Apply mutations in sequence, stopping at the first failure. Earlier
    /// mutations stay applied.
    pub fn apply_all(
        &self,
        mutations: impl IntoIterator<Item = Mutation>,
        actor: &Actor,
    ) -> Result<Vec<MutationResult>, EditorError> {
        mutations
            .into_iter()
            .map(|mutation| self.apply(mutation, actor))
            .collect()
    }
}
