//! JSON report formatter, for machine consumption (CI annotations).

use serde::Serialize;
use std::io::Write;

use super::diagnostic::{Diagnostic, Severity};
use super::ReportFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    diagnostics: &'a [Diagnostic],
    errors: usize,
    warnings: usize,
}

/// Formats diagnostics as a single JSON object.
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(&self, diagnostics: &[Diagnostic], writer: &mut W) -> std::io::Result<()> {
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let report = JsonReport {
            diagnostics,
            errors,
            warnings: diagnostics.len() - errors,
        };
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)
    }
}
