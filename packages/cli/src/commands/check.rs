use crate::document_file::ConstitutionFile;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use constitution_model::validate_structure;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Constitution JSON file
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn check(args: CheckArgs, _cwd: &str) -> Result<()> {
    let file = ConstitutionFile::load(&args.input)?;
    let violations = validate_structure(&file.sections);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&violations)?),
        "text" => {
            println!("🔍 {} {}", "Checking".green().bold(), args.input.display());
            for violation in &violations {
                println!("   {} {}", "✗".red(), violation);
            }
        }
        other => return Err(anyhow!("Unknown format: {}. Use: text or json", other)),
    }

    if violations.is_empty() {
        if args.format == "text" {
            println!(
                "   {} {} sections, no problems found",
                "✓".green(),
                file.sections.len()
            );
        }
        Ok(())
    } else {
        Err(anyhow!("{} structural problems found", violations.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_file::ConstitutionFile;
    use constitution_model::{Section, SectionType};

    fn write(dir: &std::path::Path, sections: Vec<Section>) -> PathBuf {
        let path = dir.join("constitution.json");
        ConstitutionFile {
            id: "club".to_string(),
            title: None,
            sections,
        }
        .save(&path)
        .unwrap();
        path
    }

    #[test]
    fn test_check_fails_on_violations() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            vec![Section::new("s", SectionType::Section, 1.0, None)],
        );
        let args = CheckArgs {
            input,
            format: "json".to_string(),
        };
        assert!(check(args, ".").is_err());
    }

    #[test]
    fn test_check_passes_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            vec![Section::new("a", SectionType::Article, 1.0, None)],
        );
        let args = CheckArgs {
            input,
            format: "text".to_string(),
        };
        assert!(check(args, ".").is_ok());
    }
}
