//! Rewrite results and batch reports

use serde::Serialize;
use std::path::PathBuf;

/// What the rewriter did to one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Top-level suites that were rewritten
    pub suites: usize,
    /// Variables declared for hoisted context properties, in declaration order
    pub hoisted: Vec<String>,
    /// Callbacks converted to arrow functions
    pub callbacks_converted: usize,
    /// Context reads with no matching setup in any enclosing suite
    pub unresolved_reads: Vec<String>,
    /// Local bindings renamed to avoid clashing with a hoisted variable
    pub renamed_locals: Vec<String>,
}

impl TransformStats {
    pub fn merge(&mut self, other: TransformStats) {
        self.suites += other.suites;
        self.hoisted.extend(other.hoisted);
        self.callbacks_converted += other.callbacks_converted;
        self.unresolved_reads.extend(other.unresolved_reads);
        self.renamed_locals.extend(other.renamed_locals);
    }

    pub fn is_empty(&self) -> bool {
        self.suites == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModifiedFile {
    pub path: PathBuf,
    #[serde(skip)]
    pub original_content: String,
    #[serde(skip)]
    pub new_content: String,
    pub changes: Vec<FileChange>,
    pub stats: TransformStats,
}

impl ModifiedFile {
    pub fn is_changed(&self) -> bool {
        self.original_content != self.new_content
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub change_type: ChangeType,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Addition,
    Modification,
    Warning,
}

/// A file the batch could not rewrite
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    pub summary: ReportSummary,
    pub files: Vec<ModifiedFile>,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    pub files_scanned: usize,
    pub files_modified: usize,
    pub files_failed: usize,
    pub suites_rewritten: usize,
    pub variables_hoisted: usize,
    pub callbacks_converted: usize,
    pub unresolved_reads: usize,
    pub dry_run: bool,
}

impl ConversionReport {
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }
}
