//! Rewriting of Mocha test files, one file or a whole batch

pub mod ast;
pub mod javascript;

pub use ast::AstTransformer;
pub use javascript::TestFileTransformer;

use crate::config::CodemodOptions;
use crate::loader;
use crate::models::{ConversionReport, FileFailure, ModifiedFile, ReportSummary};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Transform every file in `files`, writing changed files back unless
/// `options.dry_run` is set. A file that fails is recorded and the batch
/// moves on.
pub fn transform_files(files: &[PathBuf], options: &CodemodOptions) -> ConversionReport {
    transform_files_with_progress(files, options, |_| {})
}

/// Like [`transform_files`], calling `on_file` after each file is done
pub fn transform_files_with_progress<F>(
    files: &[PathBuf],
    options: &CodemodOptions,
    mut on_file: F,
) -> ConversionReport
where
    F: FnMut(&Path),
{
    let mut transformer = TestFileTransformer::new(options);
    let mut report = ConversionReport::default();

    for path in files {
        match transform_file(&mut transformer, path, options.dry_run) {
            Ok(modified) => {
                if modified.is_changed() {
                    info!(
                        path = %path.display(),
                        suites = modified.stats.suites,
                        hoisted = modified.stats.hoisted.len(),
                        "rewrote test file"
                    );
                    report.files.push(modified);
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to transform file");
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
        on_file(path);
    }

    report.summary = summarize(files.len(), &report, options.dry_run);
    report
}

fn transform_file(
    transformer: &mut TestFileTransformer,
    path: &Path,
    dry_run: bool,
) -> Result<ModifiedFile> {
    let content = loader::read_file(path)?;
    let modified = transformer.transform(&content, path)?;

    if modified.is_changed() && !dry_run {
        loader::write_file(path, &modified.new_content)?;
    }

    Ok(modified)
}

fn summarize(files_scanned: usize, report: &ConversionReport, dry_run: bool) -> ReportSummary {
    let mut summary = ReportSummary {
        files_scanned,
        files_modified: report.files.len(),
        files_failed: report.failures.len(),
        dry_run,
        ..ReportSummary::default()
    };

    for file in &report.files {
        summary.suites_rewritten += file.stats.suites;
        summary.variables_hoisted += file.stats.hoisted.len();
        summary.callbacks_converted += file.stats.callbacks_converted;
        summary.unresolved_reads += file.stats.unresolved_reads.len();
    }

    summary
}
