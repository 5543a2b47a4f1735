//! Human-readable report formatter.

use console::style;
use std::io::Write;

use super::diagnostic::{Diagnostic, Severity};
use super::ReportFormatter;

/// Formats diagnostics for terminal display.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = severity.to_string();
        if !self.use_color {
            return label;
        }
        match severity {
            Severity::Warning => style(label).yellow().bold().to_string(),
            Severity::Error => style(label).red().bold().to_string(),
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(&self, diagnostics: &[Diagnostic], writer: &mut W) -> std::io::Result<()> {
        for diag in diagnostics {
            writeln!(
                writer,
                "{}: {}",
                self.severity_label(diag.severity),
                diag.message
            )?;
            match diag.line {
                Some(line) => writeln!(writer, "  --> {}:{}", diag.document.display(), line)?,
                None => writeln!(writer, "  --> {}", diag.document.display())?,
            }
        }

        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics.len() - errors;
        if !diagnostics.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Found {} error(s) and {} warning(s)", errors, warnings)?;
        }

        Ok(())
    }
}
