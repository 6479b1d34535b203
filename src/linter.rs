use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::correction::CorrectionSet;
use crate::diagnostic::{Diagnostic, Location, Severity};
use crate::parse::source::SourceFile;
use crate::rule::OrderRule;

pub struct LintResult {
    pub diagnostics: Vec<Diagnostic>,
    pub file_count: usize,
}

/// Reorder fixes converge one move per pass; this bounds pathological
/// inputs, not realistic ones.
const MAX_FIX_ITERATIONS: usize = 50;

/// Lint one in-memory source. With `fix`, corrections are applied and the
/// rule re-runs on the corrected text until no corrections remain; the
/// second element holds the corrected bytes when they differ from the
/// input.
pub fn lint_source(
    source: &SourceFile,
    rule: &OrderRule,
    fix: bool,
) -> (Vec<Diagnostic>, Option<Vec<u8>>) {
    if !fix {
        let mut diagnostics = Vec::new();
        rule.check(source, &mut diagnostics, None);
        return (diagnostics, None);
    }

    let original = source.as_bytes().to_vec();
    let mut current = original.clone();
    let mut corrected_diags: Vec<Diagnostic> = Vec::new();

    for _iteration in 0..MAX_FIX_ITERATIONS {
        let iter_source = SourceFile::from_vec(source.path.clone(), current.clone());
        let mut diagnostics = Vec::new();
        let mut corrections = Vec::new();
        rule.check(&iter_source, &mut diagnostics, Some(&mut corrections));

        if corrections.is_empty() {
            // Converged: merge corrected diagnostics from earlier passes
            // with whatever remains unfixable.
            let mut all = corrected_diags;
            all.extend(diagnostics);
            let changed = (current != original).then_some(current);
            return (all, changed);
        }

        corrected_diags.extend(diagnostics.into_iter().filter(|d| d.corrected));

        let set = CorrectionSet::from_vec(corrections);
        let next = set.apply(&current);
        if next == current {
            // Source unchanged despite corrections — bail out.
            let changed = (current != original).then_some(current);
            return (corrected_diags, changed);
        }
        current = next;
    }

    // Hit the iteration cap: one final pass without corrections for clean
    // diagnostics on the current text.
    let final_source = SourceFile::from_vec(source.path.clone(), current.clone());
    let mut diagnostics = Vec::new();
    rule.check(&final_source, &mut diagnostics, None);
    let mut all = corrected_diags;
    all.extend(diagnostics);
    let changed = (current != original).then_some(current);
    (all, changed)
}

/// Lint one file from disk, writing corrections back when `fix` is set.
pub fn lint_file(path: &Path, rule: &OrderRule, fix: bool) -> Result<Vec<Diagnostic>> {
    let source = SourceFile::from_path(path)?;
    let (diagnostics, corrected) = lint_source(&source, rule, fix);
    if let Some(bytes) = corrected {
        std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write corrections to {}", path.display()))?;
    }
    Ok(diagnostics)
}

/// Lint all files in parallel. Diagnostics come back sorted by
/// (path, line, column); per-file failures surface as fatal diagnostics
/// rather than aborting the run.
pub fn run_linter(files: &[PathBuf], rule: &OrderRule, fix: bool) -> LintResult {
    let mut diagnostics: Vec<Diagnostic> = files
        .par_iter()
        .flat_map(|path| match lint_file(path, rule, fix) {
            Ok(diags) => diags,
            Err(error) => vec![Diagnostic {
                path: path.display().to_string(),
                location: Location { line: 1, column: 0 },
                severity: Severity::Fatal,
                rule_name: OrderRule::NAME.to_string(),
                message: format!("{error:#}"),
                corrected: false,
            }],
        })
        .collect();

    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    LintResult {
        diagnostics,
        file_count: files.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Alphabetize, AlphabetizeOrder, NewlinesBetween, Options};
    use std::path::PathBuf;

    fn source(text: &str) -> SourceFile {
        SourceFile::from_string(PathBuf::from("test.js"), text.to_string())
    }

    fn fixed_text(text: &str, options: Options) -> String {
        let rule = OrderRule::new(options);
        let (_, corrected) = lint_source(&source(text), &rule, true);
        match corrected {
            Some(bytes) => String::from_utf8(bytes).unwrap(),
            None => text.to_string(),
        }
    }

    #[test]
    fn no_fix_mode_reports_without_output() {
        let rule = OrderRule::new(Options::default());
        let (diagnostics, corrected) = lint_source(
            &source("import b from './b';\nimport a from 'a';\n"),
            &rule,
            false,
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(corrected.is_none());
    }

    #[test]
    fn fix_converges_on_clean_source() {
        let rule = OrderRule::new(Options::default());
        let (diagnostics, corrected) =
            lint_source(&source("import a from 'a';\n"), &rule, true);
        assert!(diagnostics.is_empty());
        assert!(corrected.is_none());
    }

    #[test]
    fn fix_swaps_two_imports() {
        let out = fixed_text(
            "import b from './b';\nimport a from 'a';\n",
            Options::default(),
        );
        assert_eq!(out, "import a from 'a';\nimport b from './b';\n");
    }

    #[test]
    fn fix_converges_over_multiple_passes() {
        // Fully reversed order needs several moves; the loop re-lints
        // until the file is sorted.
        let text = "\
import index from './';
import sibling from './sibling';
import parent from '../parent';
import lodash from 'lodash';
import fs from 'fs';
";
        let out = fixed_text(text, Options::default());
        assert_eq!(
            out,
            "\
import fs from 'fs';
import lodash from 'lodash';
import parent from '../parent';
import sibling from './sibling';
import index from './';
"
        );
        // And the result is stable: relint reports nothing.
        let rule = OrderRule::new(Options::default());
        let (diagnostics, corrected) = lint_source(&source(&out), &rule, true);
        assert!(diagnostics.is_empty());
        assert!(corrected.is_none());
    }

    #[test]
    fn fix_combines_reorder_and_spacing() {
        let text = "\
import sibling from './sibling';
import fs from 'fs';
";
        let options = Options {
            newlines_between: NewlinesBetween::Always,
            ..Options::default()
        };
        let out = fixed_text(text, options);
        assert_eq!(out, "import fs from 'fs';\n\nimport sibling from './sibling';\n");
    }

    #[test]
    fn fix_alphabetizes_groups() {
        let text = "\
import charlie from 'charlie';
import alpha from 'alpha';
import bravo from 'bravo';
";
        let options = Options {
            alphabetize: Alphabetize {
                order: AlphabetizeOrder::Asc,
                case_insensitive: false,
            },
            ..Options::default()
        };
        let out = fixed_text(text, options);
        assert_eq!(
            out,
            "import alpha from 'alpha';\nimport bravo from 'bravo';\nimport charlie from 'charlie';\n"
        );
    }

    #[test]
    fn unfixable_offense_survives_fix_mode() {
        let text = "\
import sibling from './sibling';
setup();
import parent from '../parent';
";
        let rule = OrderRule::new(Options::default());
        let (diagnostics, corrected) = lint_source(&source(text), &rule, true);
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].corrected);
        assert!(corrected.is_none());
    }

    #[test]
    fn run_linter_sorts_across_files() {
        let dir = std::env::temp_dir().join("importcop_test_linter_sort");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let a = dir.join("a.js");
        let b = dir.join("b.js");
        std::fs::write(&a, "import x from './x';\nimport fs from 'fs';\n").unwrap();
        std::fs::write(&b, "import y from './y';\nimport path from 'path';\n").unwrap();

        let rule = OrderRule::new(Options::default());
        let result = run_linter(&[b.clone(), a.clone()], &rule, false);
        assert_eq!(result.file_count, 2);
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result.diagnostics[0].path.ends_with("a.js"));
        assert!(result.diagnostics[1].path.ends_with("b.js"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn fix_writes_back_to_disk() {
        let dir = std::env::temp_dir().join("importcop_test_linter_fix");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("fixme.js");
        std::fs::write(&file, "import b from './b';\nimport a from 'a';\n").unwrap();

        let rule = OrderRule::new(Options::default());
        let result = run_linter(&[file.clone()], &rule, true);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].corrected);
        let written = std::fs::read_to_string(&file).unwrap();
        assert_eq!(written, "import a from 'a';\nimport b from './b';\n");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_becomes_fatal_diagnostic() {
        let rule = OrderRule::new(Options::default());
        let result = run_linter(&[PathBuf::from("/no/such/file.js")], &rule, false);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Fatal);
    }
}
