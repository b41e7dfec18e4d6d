use serde::{Deserialize, Serialize};

/// Page layout constants shared by TOC numbering and page counting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    /// TOC lines per physical TOC page
    #[serde(default = "default_toc_entries_per_page")]
    pub toc_entries_per_page: usize,

    /// Characters of body text assumed to fit on one page
    #[serde(default = "default_chars_per_page")]
    pub chars_per_page: usize,

    /// Page number the TOC assigns to the first content entry
    /// (cover + first TOC page come before it)
    #[serde(default = "default_first_content_page")]
    pub first_content_page: usize,
}

fn default_toc_entries_per_page() -> usize {
    25
}

fn default_chars_per_page() -> usize {
    2000
}

fn default_first_content_page() -> usize {
    3
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            toc_entries_per_page: default_toc_entries_per_page(),
            chars_per_page: default_chars_per_page(),
            first_content_page: default_first_content_page(),
        }
    }
}

impl PaginationConfig {
    /// Physical TOC pages needed for `entries` lines
    pub fn toc_pages(&self, entries: usize) -> usize {
        entries.div_ceil(self.toc_entries_per_page.max(1))
    }

    /// Estimated pages for `chars` characters of text, never less than one
    pub fn pages_for_chars(&self, chars: usize) -> usize {
        chars.div_ceil(self.chars_per_page.max(1)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PaginationConfig = serde_json::from_str(r#"{ "charsPerPage": 1500 }"#).unwrap();
        assert_eq!(config.chars_per_page, 1500);
        assert_eq!(config.toc_entries_per_page, 25);
        assert_eq!(config.first_content_page, 3);
    }

    #[test]
    fn test_page_estimates() {
        let config = PaginationConfig::default();
        assert_eq!(config.toc_pages(0), 0);
        assert_eq!(config.toc_pages(25), 1);
        assert_eq!(config.toc_pages(26), 2);
        assert_eq!(config.pages_for_chars(0), 1);
        assert_eq!(config.pages_for_chars(2000), 1);
        assert_eq!(config.pages_for_chars(2001), 2);
    }
}
