mod commands;
mod config;
mod document_file;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, check, export, outline, toc, ApplyArgs, CheckArgs, ExportArgs, OutlineArgs, TocArgs,
};
use tracing_subscriber::EnvFilter;

/// Constitution CLI - numbering, pagination and print export for club constitutions
#[derive(Parser, Debug)]
#[command(name = "constitution")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the numbered outline
    Outline(OutlineArgs),

    /// Print the table of contents with page numbers
    Toc(TocArgs),

    /// Validate the section structure
    Check(CheckArgs),

    /// Export printable HTML
    Export(ExportArgs),

    /// Apply a batch of edits and record them in the audit trail
    Apply(ApplyArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Outline(args) => outline(args, &cwd),
        Command::Toc(args) => toc(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Export(args) => export(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
