use constitution_model::{Section, SectionId, SectionType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
    Reorder,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
            ChangeKind::Reorder => "reorder",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projection of a section kept in audit entries. Numbering fields are the
/// counters cached on the record at the time of the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub order: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendment_number: Option<u32>,
}

impl SectionSnapshot {
    /// Title if present and non-empty
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

impl From<&Section> for SectionSnapshot {
    fn from(section: &Section) -> Self {
        Self {
            title: section.title.clone(),
            content: section.content.clone(),
            section_type: section.section_type,
            order: section.order,
            parent_id: section.parent_id.clone(),
            article_number: section.article_number,
            section_number: section.section_number,
            amendment_number: section.amendment_number,
        }
    }
}
