//! # Constitution Model
//!
//! Typed section records and the hierarchy rules that tie them together.
//!
//! ```text
//! Preamble                 (top level, at most one)
//! Article ─┬─ Section ─┬─ Subsection ─── Subsection ...
//!          │           └─ Subsection
//!          └─ Section
//! Amendment                (top level)
//! ```
//!
//! Every other crate in the workspace computes over a `&[Section]` snapshot
//! through [`Hierarchy`].

pub mod actor;
pub mod hierarchy;
pub mod section;
pub mod validate;

pub use actor::Actor;
pub use hierarchy::{sort_by_order, Hierarchy, HierarchyError};
pub use section::{image_markers, ImageMarker, Section, SectionId, SectionPatch, SectionType};
pub use validate::{check_parentage, validate_structure, StructureViolation};
