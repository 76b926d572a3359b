//! AST-based rewrite of Mocha `this` context suites
//!
//! Parses a test file with SWC, runs the suite driver over the module and
//! prints the result back to source.

pub mod classifier;
pub mod codegen;
pub mod driver;
pub mod function_shape;
pub mod members;
pub mod parser;
pub mod quotes;
pub mod scope;

pub use classifier::{classify, CallRole};
pub use codegen::CodeGenerator;
pub use driver::ContextToClosure;
pub use parser::AstParser;
pub use quotes::QuoteNormalizer;
pub use scope::{Binding, ScopeAnalyzer};

use anyhow::Result;
use std::path::Path;
use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::{sync::Lrc, FilePathMapping, SourceMap};
use swc_core::ecma::visit::VisitMutWith;
use tracing::debug;

use crate::config::CodemodOptions;
use crate::models::TransformStats;

/// Parse, rewrite and print one source file
pub struct AstTransformer {
    options: CodemodOptions,
    last_stats: TransformStats,
}

impl AstTransformer {
    pub fn new() -> Self {
        Self::with_options(CodemodOptions::default())
    }

    pub fn with_options(options: CodemodOptions) -> Self {
        Self {
            options,
            last_stats: TransformStats::default(),
        }
    }

    /// Statistics of the most recent `transform` call
    pub fn last_stats(&self) -> &TransformStats {
        &self.last_stats
    }

    /// Rewrite `code`. A file without any top-level suite comes back
    /// byte-for-byte unchanged.
    pub fn transform(&mut self, code: &str, path: &Path) -> Result<String> {
        let (parser, codegen) = if self.options.preserve_comments {
            let source_map = Lrc::new(SourceMap::new(FilePathMapping::empty()));
            let comments = SingleThreadedComments::default();
            (
                AstParser::with_comments(source_map.clone(), comments.clone()),
                CodeGenerator::with_comments(source_map, comments),
            )
        } else {
            (AstParser::new(), CodeGenerator::new())
        };

        let mut module = parser.parse(code, path)?;

        let mut driver = ContextToClosure::new();
        driver.run(&mut module);
        self.last_stats = driver.into_stats();

        if self.last_stats.is_empty() {
            debug!(path = %path.display(), "no top-level suites, leaving file as is");
            return Ok(code.to_string());
        }

        if let Some(mut quotes) = QuoteNormalizer::new(self.options.quote) {
            module.visit_mut_with(&mut quotes);
        }

        codegen.generate(&module)
    }
}

impl Default for AstTransformer {
    fn default() -> Self {
        Self::new()
    }
}
