use constitution_model::{image_markers, Section};
use constitution_numbering::{Numberer, NumberingError};
use constitution_pagination::{build_toc, chunk_toc, group_into_pages, PaginationConfig, TocEntry};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during HTML compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Numbering failed: {0}")]
    Numbering(#[from] NumberingError),
}

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Document title shown on the cover and in `<title>`
    pub title: String,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    pub pagination: PaginationConfig,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "Constitution".to_string(),
            pretty: true,
            indent: "  ".to_string(),
            pagination: PaginationConfig::default(),
        }
    }
}

const PRINT_STYLES: &[&str] = &[
    "@page { size: letter; margin: 1in; }",
    "body { font-family: Georgia, serif; line-height: 1.5; margin: 0; }",
    ".page { page-break-after: always; position: relative; min-height: 9in; }",
    ".page:last-child { page-break-after: auto; }",
    ".cover { display: flex; flex-direction: column; justify-content: center; text-align: center; }",
    ".toc-entry { display: flex; justify-content: space-between; }",
    ".image-placeholder { border: 1px dashed #999; padding: 1em; text-align: center; }",
    ".page-number { position: absolute; bottom: 0; width: 100%; text-align: center; }",
];

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn open(&mut self, tag: &str) {
        self.add_line(tag);
        self.indent();
    }

    fn close(&mut self, tag: &str) {
        self.dedent();
        self.add_line(tag);
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a section snapshot to a printable HTML document: cover page,
/// table of contents, then one page per preamble, article or amendment.
pub fn compile_to_html(
    sections: &[Section],
    options: CompileOptions,
) -> Result<String, CompileError> {
    let numberer = Numberer::new(sections);
    let toc = build_toc(sections, &options.pagination)?;
    let toc_chunks = chunk_toc(&toc, &options.pagination);
    let pages = group_into_pages(sections);

    let first_content_page = 2 + toc_chunks.len();
    let total_pages = 1 + toc_chunks.len() + pages.len();

    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.open("<html>");
    compile_head(&mut ctx);
    ctx.open("<body>");

    compile_cover(&mut ctx, total_pages);

    for (index, chunk) in toc_chunks.iter().enumerate() {
        compile_toc_page(&numberer, chunk, index, &mut ctx)?;
    }

    for (index, page) in pages.iter().enumerate() {
        let page_num = first_content_page + index;
        ctx.open(&format!("<section class=\"page content\" id=\"page-{}\">", page_num));
        for section in page {
            compile_section(&numberer, section, &mut ctx)?;
        }
        page_footer(page_num, &mut ctx);
        ctx.close("</section>");
    }

    ctx.close("</body>");
    ctx.close("</html>");

    debug!(
        total_pages,
        toc_entries = toc.len(),
        "Compiled printable document"
    );
    Ok(ctx.get_output())
}

fn compile_head(ctx: &mut Context) {
    ctx.open("<head>");
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = escape_html(&ctx.options.title);
    ctx.add_line(&format!("<title>{}</title>", title));

    ctx.open("<style>");
    for rule in PRINT_STYLES {
        ctx.add_line(rule);
    }
    ctx.close("</style>");

    ctx.close("</head>");
}

fn compile_cover(ctx: &mut Context, total_pages: usize) {
    ctx.open("<section class=\"page cover\">");
    let title = escape_html(&ctx.options.title);
    ctx.add_line(&format!("<h1 class=\"cover-title\">{}</h1>", title));
    ctx.add_line(&format!("<p class=\"cover-meta\">{} pages</p>", total_pages));
    page_footer(1, ctx);
    ctx.close("</section>");
}

fn compile_toc_page(
    numberer: &Numberer<'_>,
    entries: &[TocEntry<'_>],
    index: usize,
    ctx: &mut Context,
) -> Result<(), CompileError> {
    ctx.open("<section class=\"page toc\">");
    if index == 0 {
        ctx.add_line("<h2>Table of Contents</h2>");
    } else {
        ctx.add_line("<h2>Table of Contents (continued)</h2>");
    }

    ctx.open("<ol class=\"toc-entries\">");
    for entry in entries {
        let title = numberer.display_title(entry.section)?;
        ctx.add_line(&format!(
            "<li class=\"toc-entry level-{}\" style=\"padding-left: {}em\"><span class=\"toc-title\">{}</span><span class=\"toc-page\">{}</span></li>",
            entry.indent,
            entry.indent as f32 * 1.5,
            escape_html(&title),
            entry.page_num
        ));
    }
    ctx.close("</ol>");

    page_footer(2 + index, ctx);
    ctx.close("</section>");
    Ok(())
}

fn compile_section(
    numberer: &Numberer<'_>,
    section: &Section,
    ctx: &mut Context,
) -> Result<(), CompileError> {
    let level = numberer.indent_level(section)?;
    let heading = (level + 2).min(6);
    let title = numberer.display_title(section)?;

    ctx.open(&format!(
        "<div class=\"section {} level-{}\" id=\"section-{}\">",
        section.section_type,
        level,
        escape_html(section.id.as_str())
    ));
    ctx.add_line(&format!("<h{0}>{1}</h{0}>", heading, escape_html(&title)));

    for block in content_blocks(&section.content) {
        match block {
            Block::Paragraph(text) => ctx.add_line(&format!("<p>{}</p>", escape_html(text))),
            Block::Image(description) => compile_image_placeholder(description, ctx),
        }
    }

    ctx.close("</div>");
    Ok(())
}

fn compile_image_placeholder(description: &str, ctx: &mut Context) {
    ctx.open("<figure class=\"image-placeholder\">");
    ctx.add_line("<div class=\"image-box\">[Image]</div>");
    if !description.is_empty() {
        ctx.add_line(&format!("<figcaption>{}</figcaption>", escape_html(description)));
    }
    ctx.close("</figure>");
}

fn page_footer(page_num: usize, ctx: &mut Context) {
    ctx.add_line(&format!("<footer class=\"page-number\">{}</footer>", page_num));
}

#[derive(Debug, PartialEq)]
enum Block<'a> {
    Paragraph(&'a str),
    Image(&'a str),
}

/// Split body text into paragraphs (one per non-blank line) and image
/// placeholders. An unterminated marker stays in the text.
fn content_blocks(content: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for marker in image_markers(content) {
        push_paragraphs(&mut blocks, &content[cursor..marker.start]);
        blocks.push(Block::Image(marker.description));
        cursor = marker.end;
    }
    push_paragraphs(&mut blocks, &content[cursor..]);

    blocks
}

fn push_paragraphs<'a>(blocks: &mut Vec<Block<'a>>, text: &'a str) {
    blocks.extend(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Block::Paragraph),
    );
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
