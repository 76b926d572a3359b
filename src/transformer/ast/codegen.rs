//! Code generation from AST
//!
//! Converts the rewritten AST back to JavaScript/TypeScript source code.

use anyhow::Result;

use swc_core::common::comments::{Comments, SingleThreadedComments};
use swc_core::common::{sync::Lrc, FilePathMapping, SourceMap};
use swc_core::ecma::ast::Module;
use swc_core::ecma::codegen::{text_writer::JsWriter, Config, Emitter};

/// Code generator for producing JavaScript from AST
pub struct CodeGenerator {
    source_map: Lrc<SourceMap>,
    comments: Option<SingleThreadedComments>,
}

impl CodeGenerator {
    /// Create a new code generator that prints no comments
    pub fn new() -> Self {
        Self {
            source_map: Lrc::new(SourceMap::new(FilePathMapping::empty())),
            comments: None,
        }
    }

    /// Create a generator sharing the parser's source map and comments
    pub fn with_comments(source_map: Lrc<SourceMap>, comments: SingleThreadedComments) -> Self {
        Self {
            source_map,
            comments: Some(comments),
        }
    }

    /// Generate JavaScript code from an AST module
    pub fn generate(&self, module: &Module) -> Result<String> {
        self.generate_with_config(module, Config::default())
    }

    /// Generate with custom configuration
    pub fn generate_with_config(&self, module: &Module, config: Config) -> Result<String> {
        use swc_core::common::GLOBALS;

        GLOBALS.set(&Default::default(), || {
            let mut buf = vec![];

            {
                let writer = JsWriter::new(self.source_map.clone(), "\n", &mut buf, None);

                let mut emitter = Emitter {
                    cfg: config,
                    cm: self.source_map.clone(),
                    comments: self.comments.as_ref().map(|c| c as &dyn Comments),
                    wr: Box::new(writer),
                };

                emitter
                    .emit_module(module)
                    .map_err(|e| anyhow::anyhow!("Code generation error: {:?}", e))?;
            }

            String::from_utf8(buf).map_err(|e| anyhow::anyhow!("UTF-8 conversion error: {}", e))
        })
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::ast::parser::AstParser;
    use std::path::Path;

    #[test]
    fn test_roundtrip_suite() {
        let parser = AstParser::new();
        let codegen = CodeGenerator::new();

        let original = "describe('Foo', function() {\n  let x = 1;\n});";
        let module = parser.parse(original, Path::new("test.js")).unwrap();
        let generated = codegen.generate(&module).unwrap();

        assert!(generated.contains("describe('Foo'"));
        assert!(generated.contains("let x = 1"));
    }

    #[test]
    fn test_comments_are_printed_when_shared() {
        let source_map = Lrc::new(SourceMap::new(FilePathMapping::empty()));
        let comments = SingleThreadedComments::default();
        let parser = AstParser::with_comments(source_map.clone(), comments.clone());
        let codegen = CodeGenerator::with_comments(source_map, comments);

        let original = "// keep me\nit('works', function() {});";
        let module = parser.parse(original, Path::new("test.js")).unwrap();
        let generated = codegen.generate(&module).unwrap();

        assert!(generated.contains("// keep me"));
    }

    #[test]
    fn test_comments_dropped_without_store() {
        let parser = AstParser::new();
        let codegen = CodeGenerator::new();

        let module = parser.parse("// gone\nfoo();", Path::new("test.js")).unwrap();
        let generated = codegen.generate(&module).unwrap();

        assert!(!generated.contains("gone"));
        assert!(generated.contains("foo()"));
    }
}
