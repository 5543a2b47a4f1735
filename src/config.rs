//! Tool configuration.
//!
//! docpipe reads an optional `docpipe.yml` at the project root. Every field
//! has a default, so a project with no config file gets the stock behavior:
//! external link checking off, alphabetical section sorting of level-3
//! headings under an `Options` parent.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{DocpipeError, Result};

/// Name of the config file looked up at the project root.
pub const CONFIG_FILE: &str = "docpipe.yml";

/// Top-level docpipe configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocpipeConfig {
    /// Perform live reachability checks for external URLs.
    pub check_external_links: bool,

    /// Explicit ordering for sortable sections. Sections named here sort
    /// first, in list order; the rest sort alphabetically after them.
    pub section_priority: Vec<String>,

    /// Which headings the section sorter treats as sortable siblings.
    pub section_scope: SectionScope,

    /// Network behavior for external link checks.
    pub network: NetworkConfig,

    /// Document filenames excluded from processing (e.g. generated indexes).
    pub exclude: Vec<String>,
}

/// Identifies the sortable sibling headings: all headings of `level` that
/// appear under the first heading titled `parent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionScope {
    /// Title of the parent heading the sortable sections live under.
    pub parent: String,
    /// Heading level of the sortable sections (number of `#` markers).
    pub level: u8,
}

/// Knobs for the external link checker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry budget for transient failures (timeouts, 5xx).
    pub retries: u32,
    /// Maximum concurrent reachability checks.
    pub concurrency: usize,
}

impl Default for DocpipeConfig {
    fn default() -> Self {
        Self {
            check_external_links: false,
            section_priority: Vec::new(),
            section_scope: SectionScope::default(),
            network: NetworkConfig::default(),
            exclude: vec!["SUMMARY.md".to_string()],
        }
    }
}

impl Default for SectionScope {
    fn default() -> Self {
        Self {
            parent: "Options".to_string(),
            level: 3,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            retries: 2,
            concurrency: 8,
        }
    }
}

impl DocpipeConfig {
    /// Load configuration from the project root, falling back to defaults
    /// when no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        serde_yaml::from_str(&raw).map_err(|e| DocpipeError::ConfigParseError {
            path,
            message: e.to_string(),
        })
    }
}
