//! # Constitution Pagination
//!
//! Lays a section snapshot out for print.
//!
//! ```text
//! page 1        cover
//! page 2..      table of contents, 25 lines per page
//! then          preamble | article + descendants | amendment   (one page each)
//! ```
//!
//! Two computations live here and they are not guaranteed to agree:
//! [`group_into_pages`] renders one page per top-level unit, while
//! [`build_toc`] estimates page numbers from content length.

mod config;
mod pages;
mod toc;

pub use config::PaginationConfig;
pub use pages::{
    calculate_total_pages, estimate_total_pages_legacy, group_into_pages, toc_entry_count, Page,
};
pub use toc::{build_toc, chunk_toc, page_mismatches, PageMismatch, TocEntry};
