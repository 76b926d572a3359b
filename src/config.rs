//! Codemod options and config file loading

use crate::error::CodemodError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File names the batch layer picks up when walking directories
pub const DEFAULT_INCLUDE: &str = r"\.(js|jsx|mjs|cjs|ts|tsx)$";

/// Quoting applied to string literals when printing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
    Preserve,
}

impl std::str::FromStr for QuoteStyle {
    type Err = CodemodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(QuoteStyle::Single),
            "double" => Ok(QuoteStyle::Double),
            "preserve" => Ok(QuoteStyle::Preserve),
            other => Err(CodemodError::InvalidQuoteStyle(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodemodOptions {
    pub quote: QuoteStyle,
    pub dry_run: bool,
    /// Regex matched against file names found while walking directories
    pub include: String,
    pub preserve_comments: bool,
}

impl Default for CodemodOptions {
    fn default() -> Self {
        Self {
            quote: QuoteStyle::Single,
            dry_run: false,
            include: DEFAULT_INCLUDE.to_string(),
            preserve_comments: true,
        }
    }
}

impl CodemodOptions {
    /// Load options from a JSON5 file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, CodemodError> {
        let content = fs::read_to_string(path).map_err(|source| CodemodError::Config {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        Self::from_json5(&content).map_err(|e| match e {
            CodemodError::Config { message, .. } => CodemodError::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_json5(content: &str) -> Result<Self, CodemodError> {
        let options: CodemodOptions = json5::from_str(content).map_err(|e| CodemodError::Config {
            path: Default::default(),
            message: e.to_string(),
        })?;
        options.include_regex()?;
        Ok(options)
    }

    pub fn include_regex(&self) -> Result<Regex, CodemodError> {
        Regex::new(&self.include).map_err(|e| CodemodError::InvalidPattern {
            pattern: self.include.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CodemodOptions::default();
        assert_eq!(options.quote, QuoteStyle::Single);
        assert!(!options.dry_run);
        assert!(options.preserve_comments);
        assert!(options.include_regex().unwrap().is_match("foo.test.js"));
    }

    #[test]
    fn test_json5_overrides_some_keys() {
        let options = CodemodOptions::from_json5(
            r#"{
                // keep whatever the author wrote
                quote: "preserve",
                dryRun: true,
            }"#,
        )
        .unwrap();

        assert_eq!(options.quote, QuoteStyle::Preserve);
        assert!(options.dry_run);
        assert_eq!(options.include, DEFAULT_INCLUDE);
    }

    #[test]
    fn test_invalid_include_is_rejected() {
        let err = CodemodOptions::from_json5(r#"{ include: "(" }"#).unwrap_err();
        assert!(matches!(err, CodemodError::InvalidPattern { .. }));
    }

    #[test]
    fn test_quote_style_from_str() {
        assert_eq!("Double".parse::<QuoteStyle>().unwrap(), QuoteStyle::Double);
        assert!("backtick".parse::<QuoteStyle>().is_err());
    }
}
