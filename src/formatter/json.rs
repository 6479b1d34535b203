use std::io::Write;

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::formatter::Formatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput {
    metadata: Metadata,
    offenses: Vec<Offense>,
}

#[derive(Serialize)]
struct Metadata {
    files_inspected: usize,
    offense_count: usize,
    corrected_count: usize,
}

#[derive(Serialize)]
struct Offense {
    path: String,
    line: usize,
    column: usize,
    severity: String,
    rule_name: String,
    message: String,
    corrected: bool,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], file_count: usize, out: &mut dyn Write) {
        let corrected_count = diagnostics.iter().filter(|d| d.corrected).count();

        let output = JsonOutput {
            metadata: Metadata {
                files_inspected: file_count,
                offense_count: diagnostics.len(),
                corrected_count,
            },
            offenses: diagnostics
                .iter()
                .map(|d| Offense {
                    path: d.path.clone(),
                    line: d.location.line,
                    column: d.location.column,
                    severity: d.severity.letter().to_string(),
                    rule_name: d.rule_name.clone(),
                    message: d.message.clone(),
                    corrected: d.corrected,
                })
                .collect(),
        };
        // Safe to unwrap: our types always serialize successfully
        let _ = writeln!(out, "{}", serde_json::to_string_pretty(&output).unwrap());
    }
}
