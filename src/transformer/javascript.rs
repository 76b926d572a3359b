//! Per-file wrapper around the AST rewrite
//!
//! Runs the rewrite on one test file and describes what changed in terms a
//! report reader cares about.

use crate::config::CodemodOptions;
use crate::models::{ChangeType, FileChange, ModifiedFile, TransformStats};
use crate::transformer::ast::AstTransformer;
use anyhow::Result;
use std::path::Path;

/// Rewrites Mocha test files that share state through `this`
pub struct TestFileTransformer {
    transformer: AstTransformer,
}

impl TestFileTransformer {
    pub fn new(options: &CodemodOptions) -> Self {
        Self {
            transformer: AstTransformer::with_options(options.clone()),
        }
    }

    /// Transform one file's contents
    pub fn transform(&mut self, content: &str, path: &Path) -> Result<ModifiedFile> {
        let new_content = self.transformer.transform(content, path)?;
        let stats = self.transformer.last_stats().clone();
        let changes = describe_changes(&stats);

        Ok(ModifiedFile {
            path: path.to_path_buf(),
            original_content: content.to_string(),
            new_content,
            changes,
            stats,
        })
    }
}

fn describe_changes(stats: &TransformStats) -> Vec<FileChange> {
    let mut changes = Vec::new();

    if stats.suites > 0 {
        changes.push(FileChange {
            change_type: ChangeType::Modification,
            description: format!("Rewrote {} top-level suite(s)", stats.suites),
        });
    }

    if !stats.hoisted.is_empty() {
        changes.push(FileChange {
            change_type: ChangeType::Addition,
            description: format!(
                "Hoisted {} context variable(s): {}",
                stats.hoisted.len(),
                stats.hoisted.join(", ")
            ),
        });
    }

    if stats.callbacks_converted > 0 {
        changes.push(FileChange {
            change_type: ChangeType::Modification,
            description: format!(
                "Converted {} callback(s) to arrow functions",
                stats.callbacks_converted
            ),
        });
    }

    for local in &stats.renamed_locals {
        changes.push(FileChange {
            change_type: ChangeType::Warning,
            description: format!("Renamed local `{}` to avoid a hoisted name", local),
        });
    }

    for name in &stats.unresolved_reads {
        changes.push(FileChange {
            change_type: ChangeType::Warning,
            description: format!("`this.{}` is never set up, left as is", name),
        });
    }

    changes
}
