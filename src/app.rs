// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use self::cli::Cli;
use self::config::resolve_config;
use self::error::IndexError;
use self::formatter::OutputGenerator;
use self::models::{IndexSummary, RuntimeConfig};
use self::scanner::Scanner;
use self::writer::write_atomic;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration against the working directory
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let config = resolve_config(args, &current_dir)?;

    // 3. Dry run prints instead of touching the index; stdout carries the document only
    if config.dry_run {
        eprintln!("Base directory: {}", config.base_dir.display());
        let document = render_index(&config)?;
        print!("{}", document);
        return Ok(());
    }

    println!("Base directory: {}", config.base_dir.display());

    // 4. Scan + write
    let summary = build_index(&config)
        .with_context(|| format!("Failed to index {}", config.base_dir.display()))?;

    log::info!(
        "Wrote {} entries to {}",
        summary.entry_count,
        summary.output_path.display()
    );
    Ok(())
}

/// Walks the base directory and renders the full document without writing it.
pub fn render_index(config: &RuntimeConfig) -> Result<String, IndexError> {
    let entries = Scanner::new(config)?.scan()?;
    Ok(OutputGenerator::render(&entries, config.escape_xml))
}

/// Regenerates `index.xml` from scratch. A walk failure writes nothing.
pub fn build_index(config: &RuntimeConfig) -> Result<IndexSummary, IndexError> {
    let entries = Scanner::new(config)?.scan()?;

    if entries.is_empty() {
        log::warn!("No files found under {}", config.base_dir.display());
    }

    let document = OutputGenerator::render(&entries, config.escape_xml);
    let output_path = config.output_path();
    write_atomic(&output_path, &document)?;

    Ok(IndexSummary {
        output_path,
        entry_count: entries.len(),
    })
}
