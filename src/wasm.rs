//! WebAssembly bindings for the codemod

use crate::config::{CodemodOptions, QuoteStyle};
use std::path::Path;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Rewrite one JavaScript source text with the default options
#[wasm_bindgen]
pub fn transform(source: &str) -> Result<String, JsValue> {
    crate::transform_source(source).map_err(|e| JsValue::from_str(&format!("Transformation failed: {}", e)))
}

/// Rewrite one source text. `file_name` picks the syntax (`.ts`, `.tsx`,
/// `.jsx`); `quote` is `single`, `double` or `preserve`.
#[wasm_bindgen]
pub fn transform_with(source: &str, file_name: &str, quote: &str) -> Result<String, JsValue> {
    let quote: QuoteStyle = quote
        .parse()
        .map_err(|e: crate::error::CodemodError| JsValue::from_str(&e.to_string()))?;
    let options = CodemodOptions {
        quote,
        ..CodemodOptions::default()
    };

    crate::transform_source_with(source, Path::new(file_name), &options)
        .map_err(|e| JsValue::from_str(&format!("Transformation failed: {}", e)))
}
