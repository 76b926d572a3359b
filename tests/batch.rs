//! Batch conversion over directories of test files

use mocha_closure::report::{generate_json_report, generate_markdown_report};
use mocha_closure::{convert_paths, CodemodError, CodemodOptions};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SUITE: &str = r#"describe('cart', function() {
  beforeEach(function() { this.cart = new Cart(); });
  it('is empty', function() { assert.equal(this.cart.size, 0); });
});
"#;

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_convert_directory_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let cart = write(root, "test/cart.test.js", SUITE);
    let helper = write(root, "test/helpers.js", "exports.noop = () => {};\n");
    let vendored = write(root, "node_modules/lib/test.js", SUITE);
    let notes = write(root, "test/notes.md", "describe this");

    let report = convert_paths(&[root.to_path_buf()], &CodemodOptions::default()).unwrap();

    assert!(report.is_successful());
    assert_eq!(report.summary.files_scanned, 2);
    assert_eq!(report.summary.files_modified, 1);
    assert_eq!(report.summary.suites_rewritten, 1);
    assert_eq!(report.files[0].path, cart);

    let rewritten = fs::read_to_string(&cart).unwrap();
    assert!(rewritten.contains("let cart;"));
    assert!(rewritten.contains("assert.equal(cart.size, 0);"));

    assert_eq!(fs::read_to_string(&helper).unwrap(), "exports.noop = () => {};\n");
    assert_eq!(fs::read_to_string(&vendored).unwrap(), SUITE);
    assert_eq!(fs::read_to_string(&notes).unwrap(), "describe this");
}

#[test]
fn test_dry_run_reports_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let cart = write(temp_dir.path(), "cart.spec.js", SUITE);

    let options = CodemodOptions::from_json5("{ dryRun: true, quote: 'double' }").unwrap();
    let report = convert_paths(&[cart.clone()], &options).unwrap();

    assert_eq!(fs::read_to_string(&cart).unwrap(), SUITE);
    assert_eq!(report.files.len(), 1);
    assert!(report.files[0].new_content.contains(r#"describe("cart""#));

    let markdown = generate_markdown_report(&report).unwrap();
    assert!(markdown.contains("dry run"));
    assert!(markdown.contains("Hoisted 1 context variable(s): cart"));
}

#[test]
fn test_broken_file_is_reported_and_others_still_written() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let broken = write(root, "a_broken.test.js", "describe('oops', function() {\n");
    let cart = write(root, "b_cart.test.js", SUITE);

    let report = convert_paths(&[root.to_path_buf()], &CodemodOptions::default()).unwrap();

    assert!(!report.is_successful());
    assert_eq!(report.summary.files_failed, 1);
    assert_eq!(report.failures[0].path, broken);
    assert!(fs::read_to_string(&cart).unwrap().contains("let cart;"));

    let json: serde_json::Value =
        serde_json::from_str(&generate_json_report(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["files_failed"], 1);
    assert_eq!(json["summary"]["files_modified"], 1);
}

#[test]
fn test_custom_include_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let spec = write(root, "cart.spec.js", SUITE);
    let other = write(root, "cart.test.js", SUITE);

    let options = CodemodOptions {
        include: r"\.spec\.js$".to_string(),
        ..CodemodOptions::default()
    };
    let report = convert_paths(&[root.to_path_buf()], &options).unwrap();

    assert_eq!(report.summary.files_scanned, 1);
    assert!(fs::read_to_string(&spec).unwrap().contains("let cart;"));
    assert_eq!(fs::read_to_string(&other).unwrap(), SUITE);
}

#[test]
fn test_invalid_include_and_missing_path() {
    let temp_dir = TempDir::new().unwrap();

    let options = CodemodOptions {
        include: "(".to_string(),
        ..CodemodOptions::default()
    };
    let err = convert_paths(&[temp_dir.path().to_path_buf()], &options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CodemodError>(),
        Some(CodemodError::InvalidPattern { .. })
    ));

    let missing = temp_dir.path().join("missing");
    let err = convert_paths(&[missing], &CodemodOptions::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CodemodError>(),
        Some(CodemodError::MissingInput(_))
    ));
}
