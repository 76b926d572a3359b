//! Mocha `this` context to closure codemod
//!
//! Rewrites Mocha test files that share state between hooks and tests
//! through `this.<name>` so that the state lives in `let` variables
//! declared in the enclosing suite callback, and turns the callbacks into
//! arrow functions.

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod transformer;
pub mod wasm;

pub use config::{CodemodOptions, QuoteStyle};
pub use error::CodemodError;
pub use loader::collect_files;
pub use models::{ConversionReport, ModifiedFile, TransformStats};
pub use transformer::{transform_files, AstTransformer};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Rewrite one JavaScript source text with the default options
pub fn transform_source(source: &str) -> Result<String> {
    transform_source_with(source, Path::new("input.js"), &CodemodOptions::default())
}

/// Rewrite one source text. `path` only selects the syntax (by extension)
/// and labels parse errors.
pub fn transform_source_with(source: &str, path: &Path, options: &CodemodOptions) -> Result<String> {
    let mut transformer = AstTransformer::with_options(options.clone());
    transformer.transform(source, path)
}

/// Main entry point for the batch codemod: collect test files under
/// `paths` and rewrite them
pub fn convert_paths(paths: &[PathBuf], options: &CodemodOptions) -> Result<ConversionReport> {
    let include = options.include_regex()?;
    let files = collect_files(paths, &include)?;
    Ok(transform_files(&files, options))
}
