//! # Positional Numbering
//!
//! Display titles are derived from where a section sits, never from cached
//! counters stored on the record.
//!
//! ```text
//! Article I - Name            rank among all articles, roman
//!   Section 2 - Name          rank among sections of the same article
//!     Subsection 2.1 - Name   first level below a section: ".{rank}"
//!       Subsection 2.1A       deeper levels: letters
//! Amendment 3 - Name          rank among all amendments
//! ```

use crate::roman::{letter_index, roman_numeral};
use crate::NumberingError;
use constitution_model::{Hierarchy, Section, SectionType};
use tracing::debug;

/// Numbering over one snapshot. Build once, query many times.
pub struct Numberer<'a> {
    hierarchy: Hierarchy<'a>,
    articles: Vec<&'a Section>,
    amendments: Vec<&'a Section>,
}

impl<'a> Numberer<'a> {
    pub fn new(sections: &'a [Section]) -> Self {
        Self::from_hierarchy(Hierarchy::new(sections))
    }

    pub fn from_hierarchy(hierarchy: Hierarchy<'a>) -> Self {
        let articles = of_type(hierarchy.sections(), SectionType::Article);
        let amendments = of_type(hierarchy.sections(), SectionType::Amendment);
        Self {
            hierarchy,
            articles,
            amendments,
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy<'a> {
        &self.hierarchy
    }

    /// 1-based rank within the group that numbers this section's kind.
    /// `None` for the preamble and for sections absent from the snapshot.
    pub fn rank(&self, section: &Section) -> Option<usize> {
        match section.section_type {
            SectionType::Preamble => None,
            SectionType::Article => position(&self.articles, section),
            SectionType::Amendment => position(&self.amendments, section),
            SectionType::Section | SectionType::Subsection => {
                let peers: Vec<&Section> = self
                    .hierarchy
                    .sibling_group(section)
                    .into_iter()
                    .filter(|s| s.section_type == section.section_type)
                    .collect();
                position(&peers, section)
            }
        }
    }

    /// Number part of the title ("IV", "3", "2.1B"), if the section has one
    pub fn number_label(&self, section: &Section) -> Result<Option<String>, NumberingError> {
        let label = match section.section_type {
            SectionType::Preamble => None,
            SectionType::Article => self
                .rank(section)
                .and_then(|rank| roman_numeral(rank as u32)),
            SectionType::Section | SectionType::Amendment => {
                self.rank(section).map(|rank| rank.to_string())
            }
            SectionType::Subsection => self.subsection_number(section)?,
        };
        Ok(label)
    }

    /// Full human-readable title
    pub fn display_title(&self, section: &Section) -> Result<String, NumberingError> {
        if section.section_type == SectionType::Preamble {
            return Ok("Preamble".to_string());
        }

        let head = match self.number_label(section)? {
            Some(number) => format!("{} {}", section.section_type.label(), number),
            None => section.section_type.label().to_string(),
        };

        Ok(match section.title_text() {
            Some(title) => format!("{} - {}", head, title),
            None => head,
        })
    }

    /// Visual nesting depth. Subsections sit at 2 plus one level per
    /// subsection ancestor below their section.
    pub fn indent_level(&self, section: &Section) -> Result<usize, NumberingError> {
        match section.section_type {
            SectionType::Preamble | SectionType::Article | SectionType::Amendment => Ok(0),
            SectionType::Section => Ok(1),
            SectionType::Subsection => {
                let nested = self
                    .hierarchy
                    .ancestors(section)?
                    .into_iter()
                    .take_while(|a| a.section_type == SectionType::Subsection)
                    .count();
                Ok(2 + nested)
            }
        }
    }

    fn subsection_number(&self, section: &Section) -> Result<Option<String>, NumberingError> {
        let ancestors = self.hierarchy.ancestors(section)?;

        let Some(root_at) = ancestors
            .iter()
            .position(|a| a.section_type == SectionType::Section)
        else {
            debug!(section_id = %section.id, "Subsection has no section ancestor");
            return Ok(None);
        };

        let Some(section_rank) = self.rank(ancestors[root_at]) else {
            return Ok(None);
        };

        // Root section down to the target, excluding the root itself
        let mut path: Vec<&Section> = ancestors[..root_at].iter().rev().copied().collect();
        path.push(section);

        let mut number = section_rank.to_string();
        for (level, node) in path.iter().enumerate() {
            let Some(rank) = self.rank(node) else {
                return Ok(None);
            };
            if level == 0 {
                number.push('.');
                number.push_str(&rank.to_string());
            } else if let Some(letter) = letter_index(rank) {
                number.push_str(&letter);
            }
        }

        Ok(Some(number))
    }
}

fn of_type(sections: &[Section], section_type: SectionType) -> Vec<&Section> {
    let mut matching: Vec<&Section> = sections
        .iter()
        .filter(|s| s.section_type == section_type)
        .collect();
    constitution_model::sort_by_order(&mut matching);
    matching
}

fn position(group: &[&Section], section: &Section) -> Option<usize> {
    group
        .iter()
        .position(|s| s.id == section.id)
        .map(|index| index + 1)
}
