use crate::config::Config;
use crate::document_file::ConstitutionFile;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use constitution_numbering::Numberer;
use constitution_pagination::{
    build_toc, calculate_total_pages, estimate_total_pages_legacy, page_mismatches,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TocArgs {
    /// Constitution JSON file
    pub input: PathBuf,
}

pub fn toc(args: TocArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let file = ConstitutionFile::load(&args.input)?;
    let sections = &file.sections;

    println!("{}", "📖 Table of Contents".bright_blue().bold());
    println!();

    let numberer = Numberer::new(sections);
    for entry in build_toc(sections, &config.pagination)? {
        let title = numberer.display_title(entry.section)?;
        println!(
            "{}{:<width$} {:>4}",
            "  ".repeat(entry.indent),
            title,
            entry.page_num,
            width = 60usize.saturating_sub(entry.indent * 2)
        );
    }

    let total = calculate_total_pages(sections, &config.pagination);
    let legacy = estimate_total_pages_legacy(sections, &config.pagination);
    println!();
    println!("   Total pages: {}", total);
    if legacy != total {
        println!(
            "   {} Unit count estimate differs: {} pages",
            "⚠️".yellow(),
            legacy
        );
    }

    let mismatches = page_mismatches(sections, &config.pagination)?;
    for mismatch in &mismatches {
        println!(
            "   {} {} listed on page {} but prints on page {}",
            "⚠️".yellow(),
            mismatch.section_id,
            mismatch.toc_page,
            mismatch.rendered_page
        );
    }

    Ok(())
}
