pub mod json;
pub mod text;

use std::io::Write;

use crate::diagnostic::Diagnostic;

pub trait Formatter {
    fn format_to(&self, diagnostics: &[Diagnostic], file_count: usize, out: &mut dyn Write);

    fn print(&self, diagnostics: &[Diagnostic], file_count: usize) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_to(diagnostics, file_count, &mut lock);
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "json" => Box::new(json::JsonFormatter),
        // "text" and any unknown value
        _ => Box::new(text::TextFormatter),
    }
}
