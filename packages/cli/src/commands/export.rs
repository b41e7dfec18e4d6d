use crate::config::Config;
use crate::document_file::ConstitutionFile;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use constitution_compiler_html::{compile_to_html, CompileOptions};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Constitution JSON file
    pub input: PathBuf,

    /// Output file (defaults to the input name with .html)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Emit compact HTML
    #[arg(long)]
    pub compact: bool,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let file = ConstitutionFile::load(&args.input)?;

    let options = CompileOptions {
        title: file.title.clone().unwrap_or(config.document_title),
        pretty: !args.compact,
        pagination: config.pagination,
        ..Default::default()
    };
    let html = compile_to_html(&file.sections, options)?;

    if args.stdout {
        println!("{}", html);
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("html"));
    fs::write(&output, html)?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.input.display(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use constitution_model::{Section, SectionType};

    #[test]
    fn test_export_writes_html_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bylaws.json");
        ConstitutionFile {
            id: "club".to_string(),
            title: Some("Chess Club".to_string()),
            sections: vec![Section::new("a", SectionType::Article, 1.0, None).with_title("Name")],
        }
        .save(&input)
        .unwrap();

        let args = ExportArgs {
            input: input.clone(),
            output: None,
            stdout: false,
            compact: false,
        };
        export(args, &dir.path().display().to_string()).unwrap();

        let html = fs::read_to_string(dir.path().join("bylaws.html")).unwrap();
        assert!(html.contains("<title>Chess Club</title>"));
        assert!(html.contains("Article I - Name"));
    }
}
