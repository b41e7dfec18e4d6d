//! Content pagination: one page per top-level unit.

use crate::config::PaginationConfig;
use constitution_model::{Hierarchy, Section, SectionType};
use tracing::debug;

/// Sections printed together on one physical page
pub type Page<'a> = Vec<&'a Section>;

/// Top-level units in print order: preamble, articles, amendments.
/// Interleaved `order` values across kinds do not change this grouping.
pub(crate) struct Roots<'a> {
    pub preamble: Option<&'a Section>,
    pub articles: Vec<&'a Section>,
    pub amendments: Vec<&'a Section>,
}

impl<'a> Roots<'a> {
    pub fn collect(hierarchy: &Hierarchy<'a>) -> Self {
        let top = hierarchy.top_level();
        let of = |ty: SectionType| -> Vec<&'a Section> {
            top.iter().copied().filter(|s| s.section_type == ty).collect()
        };

        let skipped = hierarchy.len() - hierarchy.reachable_ids().len();
        if skipped > 0 {
            debug!(skipped, "Sections unreachable from the top level are not paginated");
        }

        Self {
            preamble: of(SectionType::Preamble).into_iter().next(),
            articles: of(SectionType::Article),
            amendments: of(SectionType::Amendment),
        }
    }

    /// Number of TOC lines these roots produce
    pub fn entry_count(&self, hierarchy: &Hierarchy<'a>) -> usize {
        usize::from(self.preamble.is_some())
            + self
                .articles
                .iter()
                .map(|&a| 1 + hierarchy.descendants(a).len())
                .sum::<usize>()
            + self.amendments.len()
    }
}

/// Group sections into printable pages. An article and all of its
/// descendants always share a single page regardless of length.
pub fn group_into_pages(sections: &[Section]) -> Vec<Page<'_>> {
    let hierarchy = Hierarchy::new(sections);
    let roots = Roots::collect(&hierarchy);
    let mut pages = Vec::with_capacity(roots.articles.len() + roots.amendments.len() + 1);

    if let Some(preamble) = roots.preamble {
        pages.push(vec![preamble]);
    }

    for &article in &roots.articles {
        let mut page = vec![article];
        page.extend(hierarchy.descendants(article));
        pages.push(page);
    }

    for &amendment in &roots.amendments {
        pages.push(vec![amendment]);
    }

    pages
}

/// Number of entries the table of contents will list
pub fn toc_entry_count(sections: &[Section]) -> usize {
    let hierarchy = Hierarchy::new(sections);
    Roots::collect(&hierarchy).entry_count(&hierarchy)
}

/// Cover + TOC pages + content pages from [`group_into_pages`]
pub fn calculate_total_pages(sections: &[Section], config: &PaginationConfig) -> usize {
    let hierarchy = Hierarchy::new(sections);
    let roots = Roots::collect(&hierarchy);
    let toc_pages = config.toc_pages(roots.entry_count(&hierarchy));
    let content_pages = group_into_pages(sections).len();

    1 + toc_pages + content_pages
}

/// Older page estimate that counts top-level units directly instead of
/// grouping. Agrees with [`calculate_total_pages`] on well-formed documents
/// and drifts when duplicates or stray top-level kinds are present.
pub fn estimate_total_pages_legacy(sections: &[Section], config: &PaginationConfig) -> usize {
    let count = |ty: SectionType| sections.iter().filter(|s| s.section_type == ty).count();

    let has_preamble = count(SectionType::Preamble) > 0;
    let content_pages =
        usize::from(has_preamble) + count(SectionType::Article) + count(SectionType::Amendment);

    1 + config.toc_pages(toc_entry_count(sections)) + content_pages
}
