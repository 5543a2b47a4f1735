//! Diagnostic reporting.
//!
//! The pipeline never aborts on a finding: every stage pushes
//! [`Diagnostic`] values into a shared [`Report`] and the driver decides
//! at the end whether the run failed. Formatters render the accumulated
//! report for terminals or machines.

pub mod diagnostic;
pub mod human;
pub mod json;

use std::io::Write;

pub use diagnostic::{Diagnostic, Report, Severity};
pub use human::HumanFormatter;
pub use json::JsonFormatter;

/// Trait for rendering a finished report.
pub trait ReportFormatter {
    /// Format diagnostics to the given writer.
    fn format<W: Write>(&self, diagnostics: &[Diagnostic], writer: &mut W) -> std::io::Result<()>;
}
