pub mod alphabetize;
pub mod classify;
pub mod edits;
pub mod kind;
pub mod newlines;
pub mod order;
pub mod ranks;

use std::collections::HashSet;

use crate::config::{NewlinesBetween, Options};
use crate::correction::Correction;
use crate::diagnostic::{Diagnostic, Location, Severity};
use crate::parse::scanner::{self, ImportForm, ScanResult};
use crate::parse::source::SourceFile;

use classify::KindResolver;
use kind::ImportKind;
use newlines::SpacingIssue;
use ranks::{ConfigError, RankTable};

/// Syntactic origin of a recorded import. `Require` entries carry a rank
/// penalty that sorts all CommonJS imports after ES-module imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclForm {
    Import,
    ImportObject,
    Require,
}

/// One recorded import declaration, in source order.
#[derive(Debug, Clone)]
pub struct ImportEntry {
    /// Index of the backing statement in the scan result.
    pub stmt: usize,
    /// Byte range of the declaration node itself (for `require` entries,
    /// the call expression rather than the whole variable statement).
    pub node_span: (usize, usize),
    /// The literal module specifier (empty for object references).
    pub value: String,
    /// Label used in diagnostic messages; differs from `value` only for
    /// object references, where it is the raw reference text.
    pub display_name: String,
    pub form: DeclForm,
    pub type_only: bool,
    pub rank: f64,
}

/// Per-file accumulator for classified imports. Created fresh for every
/// file, so no ordering state can leak across files.
#[derive(Debug, Default)]
pub struct SequenceRecorder {
    entries: Vec<ImportEntry>,
}

impl SequenceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: ImportEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Vec<ImportEntry> {
        self.entries
    }
}

struct Prepared {
    table: RankTable,
    resolver: KindResolver,
    excluded: HashSet<ImportKind>,
}

/// The `Imports/Order` rule: enforces grouping, intra-group order, and
/// inter-group spacing of import declarations.
pub struct OrderRule {
    options: Options,
    prepared: Result<Prepared, ConfigError>,
}

impl OrderRule {
    pub const NAME: &'static str = "Imports/Order";

    /// Kinds exempt from path-group matching when the option is omitted.
    const DEFAULT_EXCLUDED: [ImportKind; 3] = [
        ImportKind::Builtin,
        ImportKind::External,
        ImportKind::Object,
    ];

    pub fn new(options: Options) -> Self {
        let prepared = Self::prepare(&options);
        Self { options, prepared }
    }

    fn prepare(options: &Options) -> Result<Prepared, ConfigError> {
        let table = RankTable::build(options.groups.as_deref(), &options.path_groups)?;
        let resolver = KindResolver::new(&options.internal_patterns)?;
        // Unknown kind strings can never equal a resolved kind; ignore them.
        let excluded = match &options.path_groups_excluded_import_types {
            Some(names) => names
                .iter()
                .filter_map(|n| ImportKind::parse(n))
                .collect(),
            None => Self::DEFAULT_EXCLUDED.into_iter().collect(),
        };
        Ok(Prepared {
            table,
            resolver,
            excluded,
        })
    }

    /// Whether this rule's configuration failed validation. The error is
    /// reported per file by `check`.
    pub fn config_error(&self) -> Option<&ConfigError> {
        self.prepared.as_ref().err()
    }

    /// Lint one file. Diagnostics are appended; corrections are appended
    /// only when a sink is provided, and each diagnostic that produced one
    /// is marked `corrected`.
    pub fn check(
        &self,
        source: &SourceFile,
        diagnostics: &mut Vec<Diagnostic>,
        mut corrections: Option<&mut Vec<Correction>>,
    ) {
        let prepared = match &self.prepared {
            Ok(p) => p,
            Err(error) => {
                diagnostics.push(Diagnostic {
                    path: source.path_str().to_string(),
                    location: Location { line: 1, column: 0 },
                    severity: Severity::Error,
                    rule_name: Self::NAME.to_string(),
                    message: error.to_string(),
                    corrected: false,
                });
                return;
            }
        };

        let Some(text) = source.as_str() else {
            return;
        };
        let scan = scanner::scan(text);
        let mut entries = self.record_imports(&scan, prepared).finish();

        if self.options.newlines_between != NewlinesBetween::Ignore {
            self.report_spacing(source, &scan, &entries, diagnostics, &mut corrections);
        }

        alphabetize::alphabetize_ranks(&mut entries, &self.options.alphabetize);

        self.report_out_of_order(source, &scan, &entries, diagnostics, &mut corrections);
    }

    /// Sequence-record every declaration the scanner recognized, ranked at
    /// record time. Three trigger forms, matching the visitor callbacks of
    /// the host-linter shape this rule grew out of.
    fn record_imports(&self, scan: &ScanResult, prepared: &Prepared) -> SequenceRecorder {
        let mut recorder = SequenceRecorder::new();
        for (idx, stmt) in scan.statements.iter().enumerate() {
            match &stmt.form {
                ImportForm::Import {
                    specifier,
                    type_only,
                    has_bindings,
                } => {
                    if *has_bindings || self.options.warn_on_unassigned_imports {
                        recorder.record(self.entry(
                            prepared,
                            idx,
                            (stmt.start, stmt.end),
                            specifier.clone(),
                            specifier.clone(),
                            DeclForm::Import,
                            *type_only,
                        ));
                    }
                }
                ImportForm::ImportEquals { exported: true, .. } => {}
                ImportForm::ImportEquals {
                    specifier: Some(specifier),
                    type_only,
                    ..
                } => {
                    recorder.record(self.entry(
                        prepared,
                        idx,
                        (stmt.start, stmt.end),
                        specifier.clone(),
                        specifier.clone(),
                        DeclForm::Import,
                        *type_only,
                    ));
                }
                ImportForm::ImportEquals {
                    specifier: None,
                    object_text,
                    type_only,
                    ..
                } => {
                    recorder.record(self.entry(
                        prepared,
                        idx,
                        (stmt.start, stmt.end),
                        String::new(),
                        object_text.clone().unwrap_or_default(),
                        DeclForm::ImportObject,
                        *type_only,
                    ));
                }
                ImportForm::Require { requires, .. } => {
                    for init in requires {
                        recorder.record(self.entry(
                            prepared,
                            idx,
                            (init.start, init.end),
                            init.specifier.clone(),
                            init.specifier.clone(),
                            DeclForm::Require,
                            false,
                        ));
                    }
                }
            }
        }
        recorder
    }

    #[allow(clippy::too_many_arguments)]
    fn entry(
        &self,
        prepared: &Prepared,
        stmt: usize,
        node_span: (usize, usize),
        value: String,
        display_name: String,
        form: DeclForm,
        type_only: bool,
    ) -> ImportEntry {
        let mut entry = ImportEntry {
            stmt,
            node_span,
            value,
            display_name,
            form,
            type_only,
            rank: 0.0,
        };
        entry.rank = classify::compute_rank(
            &prepared.table,
            &prepared.resolver,
            &entry,
            &prepared.excluded,
        );
        entry
    }

    fn report_spacing(
        &self,
        source: &SourceFile,
        scan: &ScanResult,
        entries: &[ImportEntry],
        diagnostics: &mut Vec<Diagnostic>,
        corrections: &mut Option<&mut Vec<Correction>>,
    ) {
        for violation in newlines::check_spacing(source, entries, self.options.newlines_between) {
            let previous = &entries[violation.previous];
            let current = &entries[violation.current];
            let fix = match violation.issue {
                SpacingIssue::MissingBetweenGroups => Some(edits::insert_blank_line_after(
                    source,
                    scan,
                    &scan.statements[previous.stmt],
                )),
                SpacingIssue::ExtraInsideGroup | SpacingIssue::ExtraBetweenGroups => {
                    edits::remove_blank_lines_between(
                        source,
                        scan,
                        &scan.statements[previous.stmt],
                        &scan.statements[current.stmt],
                    )
                }
            };
            self.report(
                source,
                previous.node_span.0,
                violation.issue.message().to_string(),
                fix,
                diagnostics,
                corrections,
            );
        }
    }

    fn report_out_of_order(
        &self,
        source: &SourceFile,
        scan: &ScanResult,
        entries: &[ImportEntry],
        diagnostics: &mut Vec<Diagnostic>,
        corrections: &mut Option<&mut Vec<Correction>>,
    ) {
        for violation in order::find_violations(entries) {
            let flagged = &entries[violation.flagged];
            let anchor = &entries[violation.anchor];
            let message = format!(
                "`{}` import should occur {} import of `{}`",
                flagged.display_name,
                violation.direction.as_str(),
                anchor.display_name,
            );
            let fix = edits::reorder_correction(
                source,
                scan,
                anchor.stmt,
                flagged.stmt,
                violation.direction,
            );
            self.report(
                source,
                flagged.node_span.0,
                message,
                fix,
                diagnostics,
                corrections,
            );
        }
    }

    fn report(
        &self,
        source: &SourceFile,
        offset: usize,
        message: String,
        fix: Option<Correction>,
        diagnostics: &mut Vec<Diagnostic>,
        corrections: &mut Option<&mut Vec<Correction>>,
    ) {
        let mut diagnostic = Diagnostic {
            path: source.path_str().to_string(),
            location: source.location(offset),
            severity: Severity::Convention,
            rule_name: Self::NAME.to_string(),
            message,
            corrected: false,
        };
        if let (Some(sink), Some(fix)) = (corrections.as_deref_mut(), fix) {
            sink.push(fix);
            diagnostic.corrected = true;
        }
        diagnostics.push(diagnostic);
    }
}
