//! Report generation

use crate::models::{ChangeType, ConversionReport};
use anyhow::Result;

pub fn generate_markdown_report(report: &ConversionReport) -> Result<String> {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str("# Mocha Context Rewrite Report\n\n");

    // Summary
    out.push_str("## Summary\n\n");
    out.push_str(&format!(
        "- **Status**: {}\n",
        if report.is_successful() { "✅ Success" } else { "❌ Some files failed" }
    ));
    if summary.dry_run {
        out.push_str("- **Mode**: dry run, nothing written\n");
    }
    out.push_str(&format!("- **Files Scanned**: {}\n", summary.files_scanned));
    out.push_str(&format!("- **Files Modified**: {}\n", summary.files_modified));
    out.push_str(&format!("- **Files Failed**: {}\n", summary.files_failed));
    out.push_str(&format!("- **Suites Rewritten**: {}\n", summary.suites_rewritten));
    out.push_str(&format!("- **Variables Hoisted**: {}\n", summary.variables_hoisted));
    out.push_str(&format!("- **Callbacks → Arrows**: {}\n", summary.callbacks_converted));
    out.push_str(&format!("- **Unresolved `this` Reads**: {}\n\n", summary.unresolved_reads));

    // Per-file changes
    if !report.files.is_empty() {
        out.push_str("## Modified Files\n\n");
        for file in &report.files {
            out.push_str(&format!("### {}\n\n", file.path.display()));
            for change in &file.changes {
                let marker = match change.change_type {
                    ChangeType::Addition => "+",
                    ChangeType::Modification => "~",
                    ChangeType::Warning => "⚠️",
                };
                out.push_str(&format!("- {} {}\n", marker, change.description));
            }
            out.push('\n');
        }
    }

    // Failures
    if !report.failures.is_empty() {
        out.push_str("## ⛔ Failures\n\n");
        for failure in &report.failures {
            out.push_str(&format!("- `{}`: {}\n", failure.path.display(), failure.error));
        }
        out.push('\n');
    }

    Ok(out)
}

pub fn generate_json_report(report: &ConversionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
