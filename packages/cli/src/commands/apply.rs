use crate::document_file::ConstitutionFile;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use constitution_audit::AuditEntry;
use constitution_editor::{Document, Mutation};
use constitution_model::Actor;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Constitution JSON file
    pub input: PathBuf,

    /// JSON array of mutations to apply in order
    pub mutations: PathBuf,

    /// Write the result here instead of back to the input file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Actor id recorded in the audit trail
    #[arg(long, default_value = "cli")]
    pub actor_id: String,

    /// Actor name recorded in the audit trail
    #[arg(long, default_value = "Command Line")]
    pub actor_name: String,

    /// Also write the audit entries produced by this run as JSON
    #[arg(long)]
    pub audit_out: Option<PathBuf>,
}

pub fn apply(args: ApplyArgs, _cwd: &str) -> Result<()> {
    let file = ConstitutionFile::load(&args.input)?;
    let content = fs::read_to_string(&args.mutations)
        .with_context(|| format!("Cannot read {}", args.mutations.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid mutations in {}", args.mutations.display()))?;

    let actor = Actor::new(args.actor_id, args.actor_name);
    let doc = Document::from_sections(file.id.clone(), file.sections);

    println!(
        "✏️  {} {} mutations to {}",
        "Applying".green().bold(),
        mutations.len(),
        args.input.display()
    );

    let outcome = doc.apply_all(mutations, &actor);
    let entries = history(&doc)?;
    for entry in &entries {
        println!("   {} {}", "✓".green(), entry.description);
    }
    outcome?;

    let result = ConstitutionFile {
        id: file.id,
        title: file.title,
        sections: doc.list()?,
    };
    let output = args.output.unwrap_or(args.input);
    result.save(&output)?;

    if let Some(audit_out) = args.audit_out {
        fs::write(&audit_out, serde_json::to_string_pretty(&entries)?)?;
    }

    println!("   Saved {}", output.display());
    Ok(())
}

/// Audit entries of this run, oldest first
fn history(doc: &Document) -> Result<Vec<AuditEntry>> {
    let mut entries = doc.audit_log().recent(usize::MAX)?;
    entries.reverse();
    Ok(entries)
}
