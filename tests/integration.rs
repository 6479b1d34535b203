//! Integration tests for the importcop linting pipeline.
//!
//! These tests exercise the full linter: file discovery, config loading,
//! rule execution, diagnostic collection, and fix write-back. They write
//! real files to a temp directory and invoke `run_linter` directly.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use importcop::config::{load_options, Options};
use importcop::fs::discover_files;
use importcop::linter::run_linter;
use importcop::rule::OrderRule;

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn default_rule() -> OrderRule {
    OrderRule::new(Options::default())
}

// ---------- Full pipeline ----------

#[test]
fn lint_clean_file_no_offenses() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "clean.js",
        "import fs from 'fs';\nimport lodash from 'lodash';\nimport x from './x';\n",
    );

    let result = run_linter(&[file], &default_rule(), false);
    assert_eq!(result.file_count, 1);
    assert!(
        result.diagnostics.is_empty(),
        "expected no offenses, got: {:?}",
        result
            .diagnostics
            .iter()
            .map(|d| format!("{d}"))
            .collect::<Vec<_>>()
    );
}

#[test]
fn lint_reports_out_of_order_import() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "bad.js",
        "import x from './x';\nimport fs from 'fs';\n",
    );

    let result = run_linter(&[file], &default_rule(), false);
    assert_eq!(result.diagnostics.len(), 1);
    let d = &result.diagnostics[0];
    assert_eq!(d.rule_name, "Imports/Order");
    assert_eq!(d.message, "`fs` import should occur before import of `./x`");
    assert_eq!(d.location.line, 2);
}

#[test]
fn lint_multiple_files_sorted_output() {
    let dir = TempDir::new().unwrap();
    let a = write_file(
        dir.path(),
        "a.js",
        "import x from './x';\nimport fs from 'fs';\n",
    );
    let b = write_file(
        dir.path(),
        "b.js",
        "import y from './y';\nimport path from 'path';\n",
    );

    let result = run_linter(&[b, a], &default_rule(), false);
    assert_eq!(result.file_count, 2);
    assert_eq!(result.diagnostics.len(), 2);
    assert!(result.diagnostics[0].path.ends_with("a.js"));
    assert!(result.diagnostics[1].path.ends_with("b.js"));
}

#[test]
fn mixed_import_and_require_file() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "mixed.js",
        "\
import fs from 'fs';
import lodash from 'lodash';
const path = require('path');
const local = require('./local');
",
    );

    // requires carry the +100 penalty, so this file is already ordered.
    let result = run_linter(&[file], &default_rule(), false);
    assert!(result.diagnostics.is_empty());
}

// ---------- Discovery ----------

#[test]
fn discovery_filters_extensions() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.js", "");
    write_file(dir.path(), "b.ts", "");
    write_file(dir.path(), "c.css", "");
    write_file(dir.path(), "README.md", "");

    let files = discover_files(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 2);
}

#[test]
fn discovery_respects_gitignore() {
    let dir = TempDir::new().unwrap();
    // The ignore crate only honors .gitignore inside a repository.
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    write_file(dir.path(), ".gitignore", "dist/\n");
    write_file(dir.path(), "src/kept.js", "");
    write_file(dir.path(), "dist/skipped.js", "");

    let files = discover_files(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("src/kept.js"));
}

// ---------- Config ----------

#[test]
fn config_file_drives_the_rule() {
    let dir = TempDir::new().unwrap();
    let config_path = write_file(
        dir.path(),
        ".importcop.json",
        r#"{"groups": ["index", "sibling", "parent", "external", "builtin"]}"#,
    );
    let file = write_file(
        dir.path(),
        "inverted.js",
        "\
import index from './';
import sibling from './sibling';
import parent from '../parent';
import lodash from 'lodash';
import fs from 'fs';
",
    );

    let options = load_options(Some(&config_path)).unwrap();
    let rule = OrderRule::new(options);
    let result = run_linter(&[file], &rule, false);
    assert!(
        result.diagnostics.is_empty(),
        "custom group order should accept the inverted file: {:?}",
        result
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
    );
}

#[test]
fn bad_config_reports_once_per_file_and_skips_analysis() {
    let dir = TempDir::new().unwrap();
    let config_path = write_file(
        dir.path(),
        ".importcop.json",
        r#"{"groups": ["builtin", "nonsense"]}"#,
    );
    let file = write_file(
        dir.path(),
        "anything.js",
        "import x from './x';\nimport fs from 'fs';\n",
    );

    let options = load_options(Some(&config_path)).unwrap();
    let rule = OrderRule::new(options);
    assert!(rule.config_error().is_some());

    let result = run_linter(&[file], &rule, false);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].message,
        "Incorrect configuration of the rule: Unknown type `\"nonsense\"`"
    );
    assert_eq!(result.diagnostics[0].location.line, 1);
}

#[test]
fn malformed_json_config_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let config_path = write_file(dir.path(), ".importcop.json", "{ nope");
    assert!(load_options(Some(&config_path)).is_err());
}

// ---------- Fixing ----------

#[test]
fn fix_rewrites_file_in_place() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "fixme.js",
        "import x from './x';\nimport fs from 'fs';\n",
    );

    let result = run_linter(&[file.clone()], &default_rule(), true);
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].corrected);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "import fs from 'fs';\nimport x from './x';\n"
    );
}

#[test]
fn fix_leaves_unfixable_files_untouched() {
    let dir = TempDir::new().unwrap();
    let content = "\
import x from './x';
window.setup();
import fs from 'fs';
";
    let file = write_file(dir.path(), "stuck.js", content);

    let result = run_linter(&[file.clone()], &default_rule(), true);
    assert_eq!(result.diagnostics.len(), 1);
    assert!(!result.diagnostics[0].corrected);
    assert_eq!(fs::read_to_string(&file).unwrap(), content);
}

#[test]
fn fix_full_cleanup_converges() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "messy.js",
        "\
import sibling from './sibling';
import zebra from 'zebra';
import apple from 'apple';
import fs from 'fs';
",
    );
    let config_path = write_file(
        dir.path(),
        ".importcop.json",
        r#"{
            "newlines-between": "always",
            "alphabetize": {"order": "asc"}
        }"#,
    );

    let options = load_options(Some(&config_path)).unwrap();
    let rule = OrderRule::new(options);
    let result = run_linter(&[file.clone()], &rule, true);
    assert!(result.diagnostics.iter().all(|d| d.corrected));

    // Moving the trailing import leaves its old preceding blank line at
    // EOF; blank lines are only policed between imports.
    let fixed = fs::read_to_string(&file).unwrap();
    assert_eq!(
        fixed,
        "\
import fs from 'fs';

import apple from 'apple';
import zebra from 'zebra';

import sibling from './sibling';

"
    );

    // Idempotence: a second run is clean.
    let options = load_options(Some(&config_path)).unwrap();
    let rule = OrderRule::new(options);
    let result = run_linter(&[file], &rule, true);
    assert!(
        result.diagnostics.is_empty(),
        "second pass found: {:?}",
        result
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
    );
}

// ---------- TypeScript forms ----------

#[test]
fn typescript_file_with_import_equals() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "legacy.ts",
        "\
import fs from 'fs';
import util = require('util');
import helper from './helper';
",
    );

    // import-equals ranks like a normal import of its specifier: util is a
    // builtin alongside fs, then the sibling — ordered.
    let result = run_linter(&[file], &default_rule(), false);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
    );
}

#[test]
fn type_only_imports_rank_as_type_kind() {
    let dir = TempDir::new().unwrap();
    let config_path = write_file(
        dir.path(),
        ".importcop.json",
        r#"{"groups": ["type", "builtin", "external", "parent", "sibling", "index"]}"#,
    );
    let file = write_file(
        dir.path(),
        "typed.ts",
        "\
import type { Config } from './config';
import fs from 'fs';
import helper from './helper';
",
    );

    let options = load_options(Some(&config_path)).unwrap();
    let rule = OrderRule::new(options);
    let result = run_linter(&[file], &rule, false);
    assert!(
        result.diagnostics.is_empty(),
        "type-first grouping should accept this file: {:?}",
        result
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
    );
}
