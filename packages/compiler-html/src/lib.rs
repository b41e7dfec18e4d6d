//! # Constitution HTML Compiler
//!
//! Renders a section snapshot as a self-contained, print-ready HTML page
//! sequence. The browser's print dialog turns it into the final PDF.

mod compiler;

pub use compiler::{compile_to_html, escape_html, CompileError, CompileOptions};
