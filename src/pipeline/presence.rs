//! Component presence checker.
//!
//! Declared components and documentation files are maintained
//! independently and drift apart. This check compares the two sets per
//! category: a declared component with no file is missing documentation,
//! a file with no declaration is orphaned (usually stale after a rename).
//! Matching is exact filename-stem equality, case-sensitive, via set
//! difference.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::metadata::ComponentKind;
use crate::report::{Diagnostic, Report};

/// Reports drift between declared components and documentation files.
pub struct PresenceChecker;

impl PresenceChecker {
    pub fn new() -> Self {
        Self
    }

    /// Compare declared component names against discovered doc stems for
    /// one category. Discrepancies go to the report; nothing is mutated.
    pub fn check(
        &self,
        kind: ComponentKind,
        declared: &BTreeSet<String>,
        doc_stems: &BTreeSet<String>,
        report: &mut Report,
    ) {
        for missing in declared.difference(doc_stems) {
            report.push(Diagnostic::error(
                PathBuf::from(kind.dir_name()).join(format!("{}.md", missing)),
                format!("missing documentation for {} '{}'", kind, missing),
            ));
        }
        for orphaned in doc_stems.difference(declared) {
            report.push(Diagnostic::error(
                PathBuf::from(kind.dir_name()).join(format!("{}.md", orphaned)),
                format!("orphaned documentation: no declared {} '{}'", kind, orphaned),
            ));
        }
    }
}

impl Default for PresenceChecker {
    fn default() -> Self {
        Self::new()
    }
}
