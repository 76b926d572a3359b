//! AST Parser for JavaScript and TypeScript test files
//!
//! Provides parsing with auto-detection of the syntax from the file
//! extension. Comments are collected into a shared store so the code
//! generator can print them back.

use anyhow::{anyhow, Result};
use std::path::Path;

use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::{sync::Lrc, FileName, FilePathMapping, SourceMap};
use swc_core::ecma::ast::Module;
use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// AST parser with TypeScript and JSX support
pub struct AstParser {
    source_map: Lrc<SourceMap>,
    comments: Option<SingleThreadedComments>,
}

impl AstParser {
    /// Create a parser with its own source map that discards comments
    pub fn new() -> Self {
        Self {
            source_map: Lrc::new(SourceMap::new(FilePathMapping::empty())),
            comments: None,
        }
    }

    /// Create a parser that registers files in `source_map` and records
    /// comments into `comments`
    pub fn with_comments(source_map: Lrc<SourceMap>, comments: SingleThreadedComments) -> Self {
        Self {
            source_map,
            comments: Some(comments),
        }
    }

    /// Parse JavaScript or TypeScript code into an AST
    ///
    /// Automatically detects the syntax based on file extension:
    /// - `.ts`, `.mts`, `.cts` → TypeScript
    /// - `.tsx` → TypeScript with JSX
    /// - `.jsx` → JavaScript with JSX
    /// - `.js` or other → JavaScript
    pub fn parse(&self, code: &str, path: &Path) -> Result<Module> {
        use swc_core::common::GLOBALS;

        GLOBALS.set(&Default::default(), || {
            let syntax = self.detect_syntax(path);

            let source_file = self.source_map.new_source_file(
                Lrc::new(FileName::Real(path.to_path_buf())),
                code.to_string(),
            );

            let input = StringInput::from(&*source_file);
            let comments = self
                .comments
                .as_ref()
                .map(|c| c as &dyn swc_core::common::comments::Comments);
            let mut parser = Parser::new(syntax, input, comments);

            parser
                .parse_module()
                .map_err(|e| anyhow!("Parse error at {:?}: {:?}", path, e))
        })
    }

    /// Detect syntax mode based on file extension
    fn detect_syntax(&self, path: &Path) -> Syntax {
        match path.extension().and_then(|s| s.to_str()) {
            Some("ts") | Some("mts") | Some("cts") => Syntax::Typescript(TsSyntax {
                tsx: false,
                decorators: true,
                no_early_errors: true,
                ..Default::default()
            }),
            Some("tsx") => Syntax::Typescript(TsSyntax {
                tsx: true,
                decorators: true,
                no_early_errors: true,
                ..Default::default()
            }),
            Some("jsx") => Syntax::Es(EsSyntax {
                jsx: true,
                export_default_from: true,
                import_attributes: true,
                ..Default::default()
            }),
            _ => Syntax::Es(EsSyntax {
                jsx: false,
                export_default_from: true,
                import_attributes: true,
                ..Default::default()
            }),
        }
    }

    /// Get the source map for error reporting
    pub fn source_map(&self) -> Lrc<SourceMap> {
        self.source_map.clone()
    }
}

impl Default for AstParser {
    fn default() -> Self {
        Self::new()
    }
}
