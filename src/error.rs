//! Errors raised by the batch and configuration layers
//!
//! The rewrite itself never fails on its own; parse and print failures come
//! back from swc as `anyhow::Error`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodemodError {
    #[error("input path does not exist: {0}")]
    MissingInput(PathBuf),

    #[error("invalid include pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid quote style `{0}` (expected single, double or preserve)")]
    InvalidQuoteStyle(String),

    #[error("failed to load config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}
