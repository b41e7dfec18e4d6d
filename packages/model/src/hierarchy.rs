//! # Hierarchy Index
//!
//! Read-only view over a flat section list that answers parent/child and
//! sibling questions. Built once per snapshot; every walk is cycle-guarded
//! because nothing in the stored data forbids a `parent_id` loop.

use crate::section::{Section, SectionId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HierarchyError {
    #[error("Parent cycle detected at section {id}")]
    Cycle { id: SectionId },
}

/// Stable sort by `order`. Equal orders keep their input sequence.
pub fn sort_by_order(sections: &mut [&Section]) {
    sections.sort_by(|a, b| a.order.total_cmp(&b.order));
}

/// Index over a section snapshot
#[derive(Debug)]
pub struct Hierarchy<'a> {
    sections: &'a [Section],
    by_id: HashMap<&'a str, usize>,
    /// Children per parent id (`None` = top level), sorted by order
    children: HashMap<Option<&'a str>, Vec<usize>>,
}

impl<'a> Hierarchy<'a> {
    pub fn new(sections: &'a [Section]) -> Self {
        let mut by_id = HashMap::with_capacity(sections.len());
        for (index, section) in sections.iter().enumerate() {
            // First occurrence wins on duplicate ids
            by_id.entry(section.id.as_str()).or_insert(index);
        }

        let mut children: HashMap<Option<&'a str>, Vec<usize>> = HashMap::new();
        for (index, section) in sections.iter().enumerate() {
            let key = section.parent_id.as_ref().map(|p| p.as_str());
            children.entry(key).or_default().push(index);
        }
        for group in children.values_mut() {
            group.sort_by(|&a, &b| sections[a].order.total_cmp(&sections[b].order));
        }

        Self {
            sections,
            by_id,
            children,
        }
    }

    pub fn sections(&self) -> &'a [Section] {
        self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, id: &SectionId) -> Option<&'a Section> {
        self.by_id.get(id.as_str()).map(|&i| &self.sections[i])
    }

    /// Resolved parent, `None` for top-level sections and dangling references
    pub fn parent_of(&self, section: &Section) -> Option<&'a Section> {
        section.parent_id.as_ref().and_then(|id| self.get(id))
    }

    /// Whether the section references a parent that does not exist
    pub fn is_orphan(&self, section: &Section) -> bool {
        section.parent_id.is_some() && self.parent_of(section).is_none()
    }

    /// Children of `parent` (`None` = top level), sorted by order
    pub fn children_of(&self, parent: Option<&SectionId>) -> Vec<&'a Section> {
        self.children
            .get(&parent.map(|p| p.as_str()))
            .map(|group| group.iter().map(|&i| &self.sections[i]).collect())
            .unwrap_or_default()
    }

    /// All sections sharing `section`'s parent reference, itself included
    pub fn sibling_group(&self, section: &Section) -> Vec<&'a Section> {
        self.children_of(section.parent_id.as_ref())
    }

    pub fn top_level(&self) -> Vec<&'a Section> {
        self.children_of(None)
    }

    /// Sections whose `parent_id` does not resolve
    pub fn orphans(&self) -> Vec<&'a Section> {
        self.sections.iter().filter(|s| self.is_orphan(s)).collect()
    }

    /// Ancestors nearest-first. Stops silently at a dangling reference.
    pub fn ancestors(&self, section: &Section) -> Result<Vec<&'a Section>, HierarchyError> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(section.id.as_str());

        let mut chain = Vec::new();
        let mut current = self.parent_of(section);

        while let Some(parent) = current {
            if !visited.insert(parent.id.as_str()) {
                return Err(HierarchyError::Cycle {
                    id: parent.id.clone(),
                });
            }
            chain.push(parent);
            current = self.parent_of(parent);
        }

        Ok(chain)
    }

    /// Descendants of `section` in depth-first pre-order, excluding itself
    pub fn descendants(&self, section: &'a Section) -> Vec<&'a Section> {
        let mut out = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(section.id.as_str());
        self.collect_descendants(section, &mut visited, &mut out);
        out
    }

    fn collect_descendants(
        &self,
        section: &Section,
        visited: &mut HashSet<&'a str>,
        out: &mut Vec<&'a Section>,
    ) {
        for child in self.children_of(Some(&section.id)) {
            if !visited.insert(child.id.as_str()) {
                continue;
            }
            out.push(child);
            self.collect_descendants(child, visited, out);
        }
    }

    /// Flattened outline order: each top-level section followed by its
    /// descendants. Orphans and cycle members are not reachable.
    pub fn depth_first(&self) -> Vec<&'a Section> {
        let mut out = Vec::with_capacity(self.sections.len());
        for root in self.top_level() {
            out.push(root);
            out.extend(self.descendants(root));
        }
        out
    }

    /// Sections reachable from the top level
    pub fn reachable_ids(&self) -> HashSet<&'a str> {
        self.depth_first().into_iter().map(|s| s.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionType;

    fn sec(id: &str, ty: SectionType, order: f64, parent: Option<&str>) -> Section {
        Section::new(id, ty, order, parent.map(SectionId::from))
    }

    fn sample() -> Vec<Section> {
        vec![
            sec("a2", SectionType::Article, 2.0, None),
            sec("a1", SectionType::Article, 1.0, None),
            sec("s1", SectionType::Section, 1.0, Some("a1")),
            sec("ss1", SectionType::Subsection, 1.0, Some("s1")),
            sec("s2", SectionType::Section, 2.0, Some("a1")),
            sec("p", SectionType::Preamble, 0.0, None),
        ]
    }

    #[test]
    fn test_children_sorted_by_order() {
        let sections = sample();
        let h = Hierarchy::new(&sections);
        let ids: Vec<_> = h.top_level().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["p", "a1", "a2"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let sections = vec![
            sec("x", SectionType::Article, 1.0, None),
            sec("y", SectionType::Article, 1.0, None),
            sec("z", SectionType::Article, 0.5, None),
        ];
        let h = Hierarchy::new(&sections);
        let ids: Vec<_> = h.top_level().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_depth_first_order() {
        let sections = sample();
        let h = Hierarchy::new(&sections);
        let ids: Vec<_> = h.depth_first().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["p", "a1", "s1", "ss1", "s2", "a2"]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let sections = sample();
        let h = Hierarchy::new(&sections);
        let ss1 = h.get(&"ss1".into()).unwrap();
        let ids: Vec<_> = h
            .ancestors(ss1)
            .unwrap()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s1", "a1"]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let sections = vec![
            sec("x", SectionType::Subsection, 1.0, Some("y")),
            sec("y", SectionType::Subsection, 1.0, Some("x")),
        ];
        let h = Hierarchy::new(&sections);
        let result = h.ancestors(&sections[0]);
        assert!(matches!(result, Err(HierarchyError::Cycle { .. })));
        // Cycle members are never reachable from the top level
        assert!(h.depth_first().is_empty());
    }

    #[test]
    fn test_orphans_detected() {
        let sections = vec![
            sec("a1", SectionType::Article, 1.0, None),
            sec("s1", SectionType::Section, 1.0, Some("gone")),
        ];
        let h = Hierarchy::new(&sections);
        let orphans: Vec<_> = h.orphans().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(orphans, vec!["s1"]);
        assert!(h.ancestors(&sections[1]).unwrap().is_empty());
    }
}
