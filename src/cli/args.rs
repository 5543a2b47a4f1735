//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// docpipe - Documentation corpus post-processing and consistency checking.
#[derive(Debug, Parser)]
#[command(name = "docpipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Post-process the docs corpus and report consistency violations
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Docs root, relative to the project root
    #[arg(long, default_value = "docs")]
    pub docs: PathBuf,

    /// Metadata registry file, relative to the project root
    #[arg(long, default_value = ".meta/docs.toml")]
    pub metadata: PathBuf,

    /// Perform live reachability checks for external URLs
    #[arg(long)]
    pub check_external_links: bool,

    /// Report without writing transformed documents back
    #[arg(long)]
    pub dry_run: bool,

    /// Output format: human or json
    #[arg(long, default_value = "human")]
    pub format: String,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            docs: PathBuf::from("docs"),
            metadata: PathBuf::from(".meta/docs.toml"),
            check_external_links: false,
            dry_run: false,
            format: "human".to_string(),
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_defaults() {
        let cli = Cli::parse_from(["docpipe", "check"]);
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };

        assert_eq!(args.docs, PathBuf::from("docs"));
        assert_eq!(args.metadata, PathBuf::from(".meta/docs.toml"));
        assert!(!args.check_external_links);
        assert_eq!(args.format, "human");
    }

    #[test]
    fn check_flags() {
        let cli = Cli::parse_from([
            "docpipe",
            "check",
            "--check-external-links",
            "--format",
            "json",
            "--docs",
            "documentation",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };

        assert!(args.check_external_links);
        assert_eq!(args.format, "json");
        assert_eq!(args.docs, PathBuf::from("documentation"));
    }
}
