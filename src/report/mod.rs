//! Report generation

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::models::ConversionReport;
use anyhow::Result;

pub fn generate_report(report: &ConversionReport, json: bool) -> Result<String> {
    if json {
        generator::generate_json_report(report)
    } else {
        generator::generate_markdown_report(report)
    }
}
