//! Check command implementation.
//!
//! The `docpipe check` command is the driver around the core pipeline:
//! it loads configuration and metadata, discovers the corpus, runs the
//! pipeline, prints per-document status and the diagnostic report, and
//! maps the result to an exit code. Any error diagnostic fails the run.

use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::DocpipeConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::metadata::MetadataRegistry;
use crate::pipeline::Pipeline;
use crate::report::{HumanFormatter, JsonFormatter, ReportFormatter};

use super::args::CheckArgs;

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    args: CheckArgs,
    use_color: bool,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, args: CheckArgs, use_color: bool) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            use_color,
        }
    }

    /// Run the command. Returns the process exit code.
    pub fn execute<W: Write>(&self, out: &mut W) -> Result<u8> {
        let mut config = DocpipeConfig::load(&self.project_root)?;
        if self.args.check_external_links {
            config.check_external_links = true;
        }

        let registry = MetadataRegistry::load(&self.project_root.join(&self.args.metadata))?;
        let docs_root = self.project_root.join(&self.args.docs);
        let corpus = Corpus::discover(&docs_root, &config.exclude)?;

        tracing::debug!(
            "checking {} documents under {}",
            corpus.documents().len(),
            docs_root.display()
        );

        let pipeline = Pipeline::new(&registry, &config);
        let outcome = pipeline.run(&corpus, self.args.dry_run)?;

        if self.args.format == "json" {
            JsonFormatter::new().format(outcome.report.diagnostics(), out)?;
        } else {
            self.print_statuses(&outcome, out)?;
            HumanFormatter::new(self.use_color).format(outcome.report.diagnostics(), out)?;
        }

        Ok(if outcome.report.has_errors() { 1 } else { 0 })
    }

    fn print_statuses<W: Write>(&self, outcome: &crate::pipeline::Outcome, out: &mut W) -> std::io::Result<()> {
        let changed_label = if self.args.dry_run { "Would change" } else { "Changed" };
        for path in &outcome.changed {
            let line = format!("{} - {}", changed_label, path.display());
            writeln!(out, "{}", self.paint(&line, "green"))?;
        }
        for path in &outcome.unchanged {
            let line = format!("Not changed - {}", path.display());
            writeln!(out, "{}", self.paint(&line, "blue"))?;
        }
        for path in &outcome.skipped {
            let line = format!("Skipped (autogenerated) - {}", path.display());
            writeln!(out, "{}", self.paint(&line, "blue"))?;
        }
        if !outcome.report.is_empty() {
            writeln!(out)?;
        }
        Ok(())
    }

    fn paint(&self, line: &str, color: &str) -> String {
        if !self.use_color {
            return line.to_string();
        }
        match color {
            "green" => style(line).green().to_string(),
            _ => style(line).blue().to_string(),
        }
    }
}
