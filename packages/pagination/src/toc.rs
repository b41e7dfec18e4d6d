//! # Table of Contents
//!
//! TOC page numbers are estimated from content length, independently of how
//! [`group_into_pages`](crate::group_into_pages) actually lays sections out.
//! A long article advances the TOC counter by several pages while still
//! rendering on one page, so the two can disagree. [`page_mismatches`]
//! reports where.

use crate::config::PaginationConfig;
use crate::pages::{group_into_pages, Roots};
use constitution_model::{Section, SectionId};
use constitution_numbering::{Numberer, NumberingError};
use serde::Serialize;
use std::collections::HashMap;

/// One TOC line
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry<'a> {
    pub section: &'a Section,
    pub page_num: usize,
    /// Indent level from the numbering engine
    pub indent: usize,
}

/// Build the table of contents: preamble, each article followed by its
/// descendants, then each amendment.
pub fn build_toc<'a>(
    sections: &'a [Section],
    config: &PaginationConfig,
) -> Result<Vec<TocEntry<'a>>, NumberingError> {
    let numberer = Numberer::new(sections);
    let hierarchy = numberer.hierarchy();
    let roots = Roots::collect(hierarchy);

    let mut entries = Vec::with_capacity(roots.entry_count(hierarchy));
    let mut page_num = config.first_content_page;

    let mut push = |section: &'a Section, page_num: usize| -> Result<(), NumberingError> {
        entries.push(TocEntry {
            section,
            page_num,
            indent: numberer.indent_level(section)?,
        });
        Ok(())
    };

    if let Some(preamble) = roots.preamble {
        push(preamble, page_num)?;
        page_num += 1;
    }

    for &article in &roots.articles {
        let descendants = hierarchy.descendants(article);
        push(article, page_num)?;
        for &child in &descendants {
            push(child, page_num)?;
        }
        page_num += config.pages_for_chars(total_content_len(article, &descendants));
    }

    for &amendment in &roots.amendments {
        let descendants = hierarchy.descendants(amendment);
        push(amendment, page_num)?;
        page_num += config.pages_for_chars(total_content_len(amendment, &descendants));
    }

    Ok(entries)
}

fn total_content_len(root: &Section, descendants: &[&Section]) -> usize {
    root.content_len() + descendants.iter().map(|s| s.content_len()).sum::<usize>()
}

/// Split TOC entries into physical TOC pages
pub fn chunk_toc<'e, 'a>(
    entries: &'e [TocEntry<'a>],
    config: &PaginationConfig,
) -> Vec<&'e [TocEntry<'a>]> {
    entries
        .chunks(config.toc_entries_per_page.max(1))
        .collect()
}

/// A TOC entry pointing at a page other than the one its content renders on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMismatch {
    pub section_id: SectionId,
    pub toc_page: usize,
    pub rendered_page: usize,
}

/// Compare TOC page numbers with the physical page each section renders on
/// (cover, then TOC pages, then [`group_into_pages`] output).
pub fn page_mismatches(
    sections: &[Section],
    config: &PaginationConfig,
) -> Result<Vec<PageMismatch>, NumberingError> {
    let toc = build_toc(sections, config)?;
    let first_rendered = 1 + config.toc_pages(toc.len()) + 1;

    let mut rendered_at: HashMap<&str, usize> = HashMap::new();
    for (index, page) in group_into_pages(sections).iter().enumerate() {
        for section in page {
            rendered_at.insert(section.id.as_str(), first_rendered + index);
        }
    }

    Ok(toc
        .iter()
        .filter_map(|entry| {
            let rendered_page = *rendered_at.get(entry.section.id.as_str())?;
            (rendered_page != entry.page_num).then(|| PageMismatch {
                section_id: entry.section.id.clone(),
                toc_page: entry.page_num,
                rendered_page,
            })
        })
        .collect())
}
