//! Structural validation of a section snapshot.
//!
//! Reports violations instead of failing: stored documents may legitimately
//! contain dangling parents after a non-cascading delete.

use crate::hierarchy::{Hierarchy, HierarchyError};
use crate::section::{Section, SectionId, SectionType};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StructureViolation {
    /// More than one preamble; lists every preamble after the first
    DuplicatePreamble { id: SectionId },
    /// A top-level kind that references a parent
    UnexpectedParent { id: SectionId, section_type: SectionType },
    /// A nested kind with no parent reference at all
    MissingParent { id: SectionId, section_type: SectionType },
    /// Parent exists but has a kind this section may not nest under
    IllegalParent {
        id: SectionId,
        section_type: SectionType,
        parent_type: SectionType,
    },
    /// Parent reference does not resolve
    DanglingParent { id: SectionId, parent_id: SectionId },
    /// Section sits on a parent cycle
    Cycle { id: SectionId },
}

impl fmt::Display for StructureViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureViolation::DuplicatePreamble { id } => {
                write!(f, "{}: a constitution may only have one preamble", id)
            }
            StructureViolation::UnexpectedParent { id, section_type } => {
                write!(f, "{}: {} sections cannot have a parent", id, section_type)
            }
            StructureViolation::MissingParent { id, section_type } => {
                write!(f, "{}: {} sections must have a parent", id, section_type)
            }
            StructureViolation::IllegalParent {
                id,
                section_type,
                parent_type,
            } => write!(
                f,
                "{}: {} cannot be nested under {}",
                id,
                section_type.label(),
                parent_type.label()
            ),
            StructureViolation::DanglingParent { id, parent_id } => {
                write!(f, "{}: parent {} does not exist", id, parent_id)
            }
            StructureViolation::Cycle { id } => {
                write!(f, "{}: parent chain loops back on itself", id)
            }
        }
    }
}

/// Check a section against the parentage rules given its resolved parent.
/// `parent` is `None` both for top level and for an unresolved reference.
pub fn check_parentage(
    section_type: SectionType,
    parent: Option<&Section>,
) -> Result<(), String> {
    match parent {
        None if section_type.requires_parent() => Err(format!(
            "{} sections must have a parent",
            section_type.label()
        )),
        None => Ok(()),
        Some(_) if section_type.is_top_level() => Err(format!(
            "{} sections cannot have a parent",
            section_type.label()
        )),
        Some(parent) if !section_type.can_have_parent(parent.section_type) => Err(format!(
            "{} cannot be nested under {}",
            section_type.label(),
            parent.section_type.label()
        )),
        Some(_) => Ok(()),
    }
}

/// Report every invariant violation in the snapshot
pub fn validate_structure(sections: &[Section]) -> Vec<StructureViolation> {
    let hierarchy = Hierarchy::new(sections);
    let mut violations = Vec::new();
    let mut seen_preamble = false;

    for section in sections {
        if section.section_type == SectionType::Preamble {
            if seen_preamble {
                violations.push(StructureViolation::DuplicatePreamble {
                    id: section.id.clone(),
                });
            }
            seen_preamble = true;
        }

        match (&section.parent_id, hierarchy.parent_of(section)) {
            (None, _) if section.section_type.requires_parent() => {
                violations.push(StructureViolation::MissingParent {
                    id: section.id.clone(),
                    section_type: section.section_type,
                });
            }
            (None, _) => {}
            (Some(_), _) if section.section_type.is_top_level() => {
                violations.push(StructureViolation::UnexpectedParent {
                    id: section.id.clone(),
                    section_type: section.section_type,
                });
            }
            (Some(parent_id), None) => {
                violations.push(StructureViolation::DanglingParent {
                    id: section.id.clone(),
                    parent_id: parent_id.clone(),
                });
            }
            (Some(_), Some(parent)) => {
                if !section.section_type.can_have_parent(parent.section_type) {
                    violations.push(StructureViolation::IllegalParent {
                        id: section.id.clone(),
                        section_type: section.section_type,
                        parent_type: parent.section_type,
                    });
                }
            }
        }

        if let Err(HierarchyError::Cycle { .. }) = hierarchy.ancestors(section) {
            violations.push(StructureViolation::Cycle {
                id: section.id.clone(),
            });
        }
    }

    violations
}
