//! # Reordering
//!
//! Two ways to move a section:
//!
//! - [`Document::move_section`] swaps `order` with the adjacent sibling. Both
//!   rows are written in one batch guarded by their versions, so a concurrent
//!   writer causes a conflict instead of a half-applied swap.
//! - [`Document::relocate`] drops a section at an index of the flattened
//!   outline. Inside its current parent's block it only changes `order`;
//!   elsewhere it is re-parented to the nearest eligible section above.
//!
//! [`validate_move`] decides whether a drop index is legal before anything is
//! written.

use crate::document::{find, Document};
use crate::errors::EditorError;
use crate::store::StoreWrite;
use constitution_audit::{ChangeKind, SectionSnapshot};
use constitution_model::{Actor, Hierarchy, Section, SectionId, SectionPatch, SectionType};
use constitution_numbering::NumberingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MoveOutcome {
    /// Orders were exchanged with this sibling
    Moved {
        #[serde(rename = "swappedWith")]
        swapped_with: SectionId,
    },
    /// Already at the edge of its group, or tied with the neighbor
    Unchanged,
}

/// Why a drop position is not allowed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct MoveRejection {
    pub reason: String,
}

impl MoveRejection {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Check whether `section` may be dropped at `destination_index` of the
/// flattened outline. Only the entries above the index matter; the moving
/// section itself is ignored.
pub fn validate_move(
    section: &Section,
    destination_index: usize,
    hierarchy: &[Section],
) -> Result<(), MoveRejection> {
    let end = destination_index.min(hierarchy.len());
    let mut above = hierarchy[..end].iter().filter(|s| s.id != section.id);

    match section.section_type {
        SectionType::Preamble | SectionType::Article | SectionType::Amendment => Ok(()),
        SectionType::Section => {
            if above.any(|s| s.section_type == SectionType::Article) {
                Ok(())
            } else {
                Err(MoveRejection::new("Sections must be placed under an article"))
            }
        }
        SectionType::Subsection => {
            if above.any(|s| {
                matches!(s.section_type, SectionType::Section | SectionType::Subsection)
            }) {
                Ok(())
            } else {
                Err(MoveRejection::new(
                    "Subsections must be placed under a section or subsection",
                ))
            }
        }
    }
}

impl Document {
    /// Swap with the previous or next sibling
    #[instrument(skip(self, actor), fields(constitution_id = %self.constitution_id()))]
    pub fn move_section(
        &self,
        id: &SectionId,
        direction: Direction,
        actor: &Actor,
    ) -> Result<MoveOutcome, EditorError> {
        let sections = self.list()?;
        let hierarchy = Hierarchy::new(&sections);
        let section = find(&sections, id)?;

        let group = hierarchy.sibling_group(section);
        let Some(index) = group.iter().position(|s| s.id == section.id) else {
            return Err(EditorError::NotFound(id.clone()));
        };

        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&t| t < group.len()),
        };
        let Some(neighbor) = target.map(|t| group[t]) else {
            debug!(section_id = %id, ?direction, "Already at the edge of its group");
            return Ok(MoveOutcome::Unchanged);
        };

        if neighbor.order == section.order {
            debug!(section_id = %id, neighbor = %neighbor.id, "Tied orders, swap is a no-op");
            return Ok(MoveOutcome::Unchanged);
        }

        let writes = vec![
            StoreWrite::Update {
                id: section.id.clone(),
                patch: SectionPatch::order(neighbor.order),
                expected_version: Some(section.version),
            },
            StoreWrite::Update {
                id: neighbor.id.clone(),
                patch: SectionPatch::order(section.order),
                expected_version: Some(neighbor.version),
            },
        ];
        let committed = self.store().commit(writes, &actor.id)?;

        for (before, after) in [section, neighbor].into_iter().zip(&committed) {
            self.record(
                ChangeKind::Reorder,
                &before.id,
                Some(SectionSnapshot::from(before)),
                Some(SectionSnapshot::from(after)),
                actor,
            );
        }

        info!(section_id = %id, swapped_with = %neighbor.id, "Moved section");
        Ok(MoveOutcome::Moved {
            swapped_with: neighbor.id.clone(),
        })
    }

    /// Drop a section at `destination_index` of the flattened outline. The
    /// section keeps its subtree. It keeps its parent while the drop point
    /// stays inside that parent's block, and otherwise takes the nearest
    /// eligible parent above the drop point.
    #[instrument(skip(self, actor), fields(constitution_id = %self.constitution_id()))]
    pub fn relocate(
        &self,
        id: &SectionId,
        destination_index: usize,
        actor: &Actor,
    ) -> Result<Section, EditorError> {
        let sections = self.list()?;
        let hierarchy = Hierarchy::new(&sections);
        let section = find(&sections, id)?;

        let outline: Vec<Section> = hierarchy.depth_first().into_iter().cloned().collect();
        validate_move(section, destination_index, &outline)?;

        // The moving subtree travels with the section, so it cannot host it
        let mut moving: Vec<&SectionId> = vec![&section.id];
        moving.extend(hierarchy.descendants(section).iter().map(|s| &s.id));
        let end = destination_index.min(outline.len());
        let above: Vec<&Section> = outline[..end]
            .iter()
            .filter(|s| !moving.contains(&&s.id))
            .collect();
        let below: Vec<&Section> = outline[end..]
            .iter()
            .filter(|s| !moving.contains(&&s.id))
            .collect();

        let parent_id = match section.section_type {
            SectionType::Preamble | SectionType::Article | SectionType::Amendment => None,
            _ if stays_with_parent(&hierarchy, section, above.last().copied())? => {
                section.parent_id.clone()
            }
            SectionType::Section => nearest(&above, |t| t == SectionType::Article),
            SectionType::Subsection => nearest(&above, |t| {
                matches!(t, SectionType::Section | SectionType::Subsection)
            }),
        };
        if section.section_type.requires_parent() && parent_id.is_none() {
            return Err(EditorError::MoveRejected(MoveRejection::new(
                "No eligible parent above the drop position",
            )));
        }

        let prev = above
            .iter()
            .rev()
            .find(|s| s.parent_id == parent_id)
            .map(|s| s.order);
        let next = below
            .iter()
            .find(|s| s.parent_id == parent_id)
            .map(|s| s.order);
        let order = match (prev, next) {
            (Some(p), Some(n)) => (p + n) / 2.0,
            (Some(p), None) => p + 1.0,
            (None, Some(n)) => n - 1.0,
            (None, None) => 1.0,
        };

        let mut patch = SectionPatch::order(order);
        let kind = if parent_id != section.parent_id {
            patch.parent_id = Some(parent_id);
            ChangeKind::Update
        } else {
            ChangeKind::Reorder
        };

        self.patch_section(id, patch, kind, actor)
    }
}

/// Whether the drop point is still inside the current parent's block: the
/// entry directly above is the parent itself or one of its descendants.
fn stays_with_parent(
    hierarchy: &Hierarchy<'_>,
    section: &Section,
    prev: Option<&Section>,
) -> Result<bool, EditorError> {
    let (Some(parent_id), Some(prev)) = (section.parent_id.as_ref(), prev) else {
        return Ok(false);
    };
    if &prev.id == parent_id {
        return Ok(true);
    }
    let ancestors = hierarchy.ancestors(prev).map_err(NumberingError::from)?;
    Ok(ancestors.iter().any(|a| &a.id == parent_id))
}

fn nearest(above: &[&Section], eligible: impl Fn(SectionType) -> bool) -> Option<SectionId> {
    above
        .iter()
        .rev()
        .find(|s| eligible(s.section_type))
        .map(|s| s.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sec(id: &str, ty: SectionType, order: f64, parent: Option<&str>) -> Section {
        Section::new(id, ty, order, parent.map(SectionId::from))
    }

    #[test]
    fn test_validate_move_requires_preceding_article() {
        let section = sec("s", SectionType::Section, 1.0, Some("a"));
        let outline = vec![
            sec("a", SectionType::Article, 1.0, None),
            section.clone(),
        ];

        assert_eq!(
            validate_move(&section, 0, &outline).unwrap_err().reason,
            "Sections must be placed under an article"
        );
        assert!(validate_move(&section, 1, &outline).is_ok());
    }

    #[test]
    fn test_validate_move_ignores_moving_section() {
        let subsection = sec("ss", SectionType::Subsection, 1.0, Some("s"));
        let outline = vec![subsection.clone(), sec("a", SectionType::Article, 1.0, None)];

        assert!(validate_move(&subsection, 2, &outline).is_err());
    }

    #[test]
    fn test_top_level_kinds_move_anywhere() {
        let article = sec("a2", SectionType::Article, 2.0, None);
        assert!(validate_move(&article, 0, &[]).is_ok());
        assert!(validate_move(&article, 99, &[]).is_ok());
    }
}
