//! # Constitution Numbering
//!
//! Derives display titles and indent levels purely from a section's position
//! in the hierarchy.
//!
//! ```rust,ignore
//! use constitution_numbering::display_title;
//!
//! let title = display_title(&sections[3], &sections)?;
//! assert_eq!(title, "Subsection 1.1A - Quorum");
//! ```
//!
//! The free functions rebuild the hierarchy index on every call. Use
//! [`Numberer`] when titling a whole document.

mod numberer;
mod roman;

pub use numberer::Numberer;
pub use roman::{letter_index, roman_numeral};

use constitution_model::{HierarchyError, Section, SectionId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumberingError {
    #[error("Parent cycle detected at section {id}")]
    Cycle { id: SectionId },
}

impl From<HierarchyError> for NumberingError {
    fn from(e: HierarchyError) -> Self {
        match e {
            HierarchyError::Cycle { id } => NumberingError::Cycle { id },
        }
    }
}

/// Numbered, human-readable title for `section` within `all_sections`
pub fn display_title(section: &Section, all_sections: &[Section]) -> Result<String, NumberingError> {
    Numberer::new(all_sections).display_title(section)
}

/// Visual nesting depth of `section` within `all_sections`
pub fn indent_level(section: &Section, all_sections: &[Section]) -> Result<usize, NumberingError> {
    Numberer::new(all_sections).indent_level(section)
}

/// 1-based rank of `section` within the group that numbers its kind
pub fn sibling_rank(section: &Section, all_sections: &[Section]) -> Option<usize> {
    Numberer::new(all_sections).rank(section)
}

/// Number part of the title only ("II", "3", "1.2B")
pub fn number_label(
    section: &Section,
    all_sections: &[Section],
) -> Result<Option<String>, NumberingError> {
    Numberer::new(all_sections).number_label(section)
}
