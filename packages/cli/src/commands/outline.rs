use crate::document_file::ConstitutionFile;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use constitution_model::{Hierarchy, Section};
use constitution_numbering::Numberer;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Constitution JSON file
    pub input: PathBuf,

    /// Indentation per nesting level
    #[arg(long, default_value_t = 2)]
    pub indent: usize,
}

pub fn outline(args: OutlineArgs, _cwd: &str) -> Result<()> {
    let file = ConstitutionFile::load(&args.input)?;

    for line in render_outline(&file.sections, args.indent)? {
        println!("{}", line);
    }

    let orphans = Hierarchy::new(&file.sections).orphans();
    if !orphans.is_empty() {
        println!();
        println!(
            "{} {} sections are detached from the outline",
            "⚠️".yellow(),
            orphans.len()
        );
    }

    Ok(())
}

/// Indented display titles in outline order
pub fn render_outline(sections: &[Section], indent: usize) -> Result<Vec<String>> {
    let numberer = Numberer::new(sections);
    numberer
        .hierarchy()
        .depth_first()
        .into_iter()
        .map(|section| -> Result<String> {
            let level = numberer.indent_level(section)?;
            let title = numberer.display_title(section)?;
            Ok(format!("{}{}", " ".repeat(level * indent), title))
        })
        .collect()
}
