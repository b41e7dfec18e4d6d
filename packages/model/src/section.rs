//! # Section Records
//!
//! A constitution is a flat list of [`Section`] records. Hierarchy is
//! expressed through `parent_id` references and sibling sequence through
//! `order`; nothing about numbering is stored authoritatively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque, stable section identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Closed set of section kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Preamble,
    Article,
    Section,
    Subsection,
    Amendment,
}

impl SectionType {
    /// Lower-case tag as it appears in stored documents
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Preamble => "preamble",
            SectionType::Article => "article",
            SectionType::Section => "section",
            SectionType::Subsection => "subsection",
            SectionType::Amendment => "amendment",
        }
    }

    /// Capitalized label used in titles ("Article", "Subsection", ...)
    pub fn label(&self) -> &'static str {
        match self {
            SectionType::Preamble => "Preamble",
            SectionType::Article => "Article",
            SectionType::Section => "Section",
            SectionType::Subsection => "Subsection",
            SectionType::Amendment => "Amendment",
        }
    }

    /// Whether this kind lives at the top level of the document
    pub fn is_top_level(&self) -> bool {
        matches!(
            self,
            SectionType::Preamble | SectionType::Article | SectionType::Amendment
        )
    }

    /// Whether a section of this kind must reference a parent
    pub fn requires_parent(&self) -> bool {
        !self.is_top_level()
    }

    /// Whether a section of this kind may be nested under `parent`
    pub fn can_have_parent(&self, parent: SectionType) -> bool {
        match self {
            SectionType::Preamble | SectionType::Article | SectionType::Amendment => false,
            SectionType::Section => parent == SectionType::Article,
            SectionType::Subsection => {
                matches!(parent, SectionType::Section | SectionType::Subsection)
            }
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single node in the constitution's document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,

    #[serde(rename = "type")]
    pub section_type: SectionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body text; may embed `[IMAGE:<description>]` markers
    #[serde(default)]
    pub content: String,

    /// Sibling sequence key. Ties are broken by input order.
    pub order: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SectionId>,

    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,

    #[serde(default)]
    pub last_modified_by: String,

    /// Incremented by the store on every committed write
    #[serde(default)]
    pub version: u64,

    // Positional counters cached at creation time. Stale as soon as siblings
    // move; recomputed by the numbering engine, never read as ground truth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendment_number: Option<u32>,
}

impl Section {
    /// Create a section with timestamps set to now and no cached counters
    pub fn new(
        id: impl Into<SectionId>,
        section_type: SectionType,
        order: f64,
        parent_id: Option<SectionId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            section_type,
            title: None,
            content: String::new(),
            order,
            parent_id,
            created_at: now,
            last_modified: now,
            last_modified_by: String::new(),
            version: 0,
            article_number: None,
            section_number: None,
            amendment_number: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Title if present and non-empty
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Content length in characters (not bytes)
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Partial field update. `None` leaves a field untouched; the inner `Option`
/// of clearable fields distinguishes "clear" from "set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub section_type: Option<SectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<SectionId>>,
}

/// A present key, even `null`, is `Some`; an absent key falls back to
/// `default` and stays `None`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SectionPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(Some(title.into())),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn order(order: f64) -> Self {
        Self {
            order: Some(order),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.section_type.is_none()
            && self.order.is_none()
            && self.parent_id.is_none()
    }

    /// Whether applying this patch can change the section's place in the tree
    pub fn touches_structure(&self) -> bool {
        self.section_type.is_some() || self.parent_id.is_some()
    }

    /// Apply the patch in place. Does not touch timestamps or version.
    pub fn apply_to(&self, section: &mut Section) {
        if let Some(title) = &self.title {
            section.title = title.clone();
        }
        if let Some(content) = &self.content {
            section.content = content.clone();
        }
        if let Some(section_type) = self.section_type {
            section.section_type = section_type;
        }
        if let Some(order) = self.order {
            section.order = order;
        }
        if let Some(parent_id) = &self.parent_id {
            section.parent_id = parent_id.clone();
        }
    }
}

const IMAGE_MARKER: &str = "[IMAGE:";

/// An `[IMAGE:<description>]` marker found in body text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMarker<'a> {
    /// Byte offset of the opening `[`
    pub start: usize,
    /// Byte offset just past the closing `]`
    pub end: usize,
    /// Trimmed text between `[IMAGE:` and `]`
    pub description: &'a str,
}

/// Locate image markers in order of appearance. An unterminated marker is
/// treated as plain text.
pub fn image_markers(content: &str) -> Vec<ImageMarker<'_>> {
    let mut found = Vec::new();
    let mut offset = 0;

    while let Some(found_at) = content[offset..].find(IMAGE_MARKER) {
        let start = offset + found_at;
        let body = start + IMAGE_MARKER.len();
        let Some(close) = content[body..].find(']') else {
            break;
        };
        let end = body + close + 1;
        found.push(ImageMarker {
            start,
            end,
            description: content[body..body + close].trim(),
        });
        offset = end;
    }

    found
}
