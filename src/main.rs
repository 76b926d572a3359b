//! Mocha context to closure codemod CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use mocha_closure::models::ConversionReport;
use mocha_closure::{collect_files, report, CodemodOptions, QuoteStyle};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mocha-closure")]
#[command(about = "Rewrite Mocha `this` context sharing into closures over suite variables", long_about = None)]
#[command(version)]
struct Cli {
    /// Log rewrite decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite test files in place
    Transform {
        /// Test files or directories to rewrite
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Quote style for string literals: single, double or preserve
        #[arg(short, long)]
        quote: Option<QuoteStyle>,

        /// Regex matched against file names when walking directories
        #[arg(long)]
        include: Option<String>,

        /// JSON5 config file; command line flags take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write a report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Write the report as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Print the rewritten file to stdout without touching it
    Print {
        file: PathBuf,

        /// Quote style for string literals: single, double or preserve
        #[arg(short, long)]
        quote: Option<QuoteStyle>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Transform {
            paths,
            dry_run,
            quote,
            include,
            config,
            report,
            json,
        } => load_options(config.as_deref(), quote, include, dry_run)
            .and_then(|options| run_transform(&paths, &options, report.as_deref(), json)),
        Commands::Print { file, quote } => run_print(&file, quote),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", "❌ Codemod failed!".red().bold());
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then command line flags
fn load_options(
    config: Option<&Path>,
    quote: Option<QuoteStyle>,
    include: Option<String>,
    dry_run: bool,
) -> Result<CodemodOptions> {
    let mut options = match config {
        Some(path) => CodemodOptions::from_file(path)?,
        None => CodemodOptions::default(),
    };

    if let Some(quote) = quote {
        options.quote = quote;
    }
    if let Some(include) = include {
        options.include = include;
    }
    options.dry_run |= dry_run;

    Ok(options)
}

/// Returns false when any file failed
fn run_transform(
    paths: &[PathBuf],
    options: &CodemodOptions,
    report_path: Option<&Path>,
    json: bool,
) -> Result<bool> {
    println!("{}", "Mocha Context to Closure Codemod".bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!();

    let include = options.include_regex()?;
    let files = collect_files(paths, &include)?;

    let progress = progress_bar(files.len() as u64);
    let result = mocha_closure::transformer::transform_files_with_progress(&files, options, |path| {
        progress.set_message(path.display().to_string());
        progress.inc(1);
    });
    progress.finish_and_clear();

    print_summary(&result);

    if let Some(report_path) = report_path {
        let content = report::generate_report(&result, json)?;
        std::fs::write(report_path, content)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        println!("  - Report: {}", report_path.display());
    }

    Ok(result.is_successful())
}

fn run_print(file: &Path, quote: Option<QuoteStyle>) -> Result<bool> {
    let mut options = CodemodOptions::default();
    if let Some(quote) = quote {
        options.quote = quote;
    }

    let source = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let output = mocha_closure::transform_source_with(&source, file, &options)?;
    print!("{}", output);

    Ok(true)
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn print_summary(result: &ConversionReport) {
    let summary = &result.summary;

    if result.is_successful() {
        println!("{}", "✅ Codemod completed successfully!".green().bold());
    } else {
        println!("{}", "⚠️  Codemod finished with failures".yellow().bold());
    }
    if summary.dry_run {
        println!("{}", "(dry run, no files were written)".dimmed());
    }
    println!();
    println!("📊 Summary:");
    println!("  - Files scanned: {}", summary.files_scanned);
    println!("  - Files modified: {}", summary.files_modified);
    println!("  - Suites rewritten: {}", summary.suites_rewritten);
    println!("  - Variables hoisted: {}", summary.variables_hoisted);
    println!("  - Callbacks converted: {}", summary.callbacks_converted);

    let unresolved: Vec<_> = result
        .files
        .iter()
        .filter(|file| !file.stats.unresolved_reads.is_empty())
        .collect();
    if !unresolved.is_empty() {
        println!();
        println!("{}", "ℹ️  Left as `this` (no setup found):".yellow().bold());
        for file in unresolved {
            println!("  - {}: {}", file.path.display(), file.stats.unresolved_reads.join(", "));
        }
    }

    if !result.failures.is_empty() {
        println!();
        println!("{}", "❌ Failed files:".red().bold());
        for failure in &result.failures {
            println!("  - {}: {}", failure.path.display(), failure.error);
        }
    }
}
