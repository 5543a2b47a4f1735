//! Link validator.
//!
//! Pure validation: extracts every link from a document and verifies it,
//! without rewriting any text. Intra-corpus paths and anchors are checked
//! against the corpus snapshot; reference-style names are resolved through
//! the registry link table; external URLs go through the per-run
//! [`LinkCache`], with the actual network checks fanned out over a bounded
//! rayon pool since they are independent and read-only.

use anyhow::Context;
use rayon::prelude::*;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;

use crate::config::NetworkConfig;
use crate::corpus::{resolve_relative, Corpus};
use crate::markdown::{anchor_set, extract_links, LinkKind};
use crate::metadata::MetadataRegistry;
use crate::report::{Diagnostic, Report};

use super::link_cache::{CheckStatus, LinkCache};

/// Performs the actual HTTP reachability checks.
pub struct UrlChecker {
    client: Client,
    retries: u32,
}

impl UrlChecker {
    /// Build a checker with the configured timeout and retry budget.
    pub fn new(network: &NetworkConfig) -> crate::error::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("docpipe/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(network.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            retries: network.retries,
        })
    }

    /// Check one URL. Transient failures (timeout, connect error, 5xx)
    /// are retried up to the budget; 4xx is terminal immediately.
    pub fn probe(&self, url: &str) -> CheckStatus {
        let mut attempt = 0;
        loop {
            match self.request(url) {
                Ok(status) if status.is_success() || status.is_redirection() => {
                    return CheckStatus::Reachable;
                }
                Ok(status) if status.is_server_error() && attempt < self.retries => {
                    attempt += 1;
                    tracing::debug!("retrying {} after HTTP {} (attempt {})", url, status, attempt);
                }
                Ok(status) => return CheckStatus::Unreachable(format!("HTTP {}", status)),
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.retries => {
                    attempt += 1;
                    tracing::debug!("retrying {} after {} (attempt {})", url, e, attempt);
                }
                Err(e) => return CheckStatus::Unreachable(e.to_string()),
            }
        }
    }

    /// HEAD first; servers that reject HEAD get one GET instead.
    fn request(&self, url: &str) -> reqwest::Result<StatusCode> {
        let response = self.client.head(url).send()?;
        if response.status() == StatusCode::METHOD_NOT_ALLOWED {
            return Ok(self.client.get(url).send()?.status());
        }
        Ok(response.status())
    }
}

/// Validates every link in a document against the corpus, the registry
/// link table, and (optionally) the live network.
pub struct LinkValidator<'a> {
    registry: &'a MetadataRegistry,
    corpus: &'a Corpus,
    cache: &'a LinkCache,
    checker: Option<UrlChecker>,
    pool: Option<rayon::ThreadPool>,
}

impl<'a> LinkValidator<'a> {
    /// Create a validator. `checker` is `None` when live checking is
    /// disabled, in which case external URLs are recorded as `Skipped`.
    pub fn new(
        registry: &'a MetadataRegistry,
        corpus: &'a Corpus,
        cache: &'a LinkCache,
        network: &NetworkConfig,
        check_external: bool,
    ) -> crate::error::Result<Self> {
        let (checker, pool) = if check_external {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(network.concurrency)
                .build()
                .context("failed to build link check pool")?;
            (Some(UrlChecker::new(network)?), Some(pool))
        } else {
            (None, None)
        };
        Ok(Self {
            registry,
            corpus,
            cache,
            checker,
            pool,
        })
    }

    /// Validate all links in a document. Findings go to the report; the
    /// text is never modified.
    pub fn validate(&self, doc: &Path, text: &str, report: &mut Report) {
        let lines: Vec<&str> = text.lines().collect();
        let own_anchors = anchor_set(&lines);
        let mut external: Vec<(usize, String)> = Vec::new();

        for link in extract_links(&lines) {
            // Registry link-table paths are docs-root-relative; inline
            // paths are relative to the current document.
            let root_relative = matches!(link.kind, LinkKind::Reference(_));
            let target = match &link.kind {
                LinkKind::Inline => link.target.clone(),
                LinkKind::Reference(name) => match self.registry.resolve_link(name) {
                    Some(target) => target.to_string(),
                    None => {
                        report.push(
                            Diagnostic::error(
                                doc,
                                format!("unresolved link reference '{}'", name),
                            )
                            .with_line(link.line + 1),
                        );
                        continue;
                    }
                },
            };

            if target.starts_with("http://") || target.starts_with("https://") {
                external.push((link.line, target));
            } else if let Some(fragment) = target.strip_prefix('#') {
                if !own_anchors.contains(fragment) {
                    report.push(
                        Diagnostic::error(doc, format!("anchor '#{}' not found", fragment))
                            .with_line(link.line + 1),
                    );
                }
            } else if target.contains("://") || target.starts_with("mailto:") {
                // Non-HTTP schemes are out of scope.
            } else {
                self.validate_relative(doc, link.line, &target, root_relative, report);
            }
        }

        self.validate_external(doc, external, report);
    }

    fn validate_relative(
        &self,
        doc: &Path,
        line: usize,
        target: &str,
        root_relative: bool,
        report: &mut Report,
    ) {
        let (path_part, fragment) = match target.split_once('#') {
            Some((p, f)) => (p, Some(f)),
            None => (target, None),
        };

        let base = if root_relative { Path::new("") } else { doc };
        let Some(resolved) = resolve_relative(base, path_part) else {
            report.push(
                Diagnostic::error(
                    doc,
                    format!("relative link '{}' escapes the docs root", target),
                )
                .with_line(line + 1),
            );
            return;
        };

        let in_corpus = self.corpus.contains(&resolved);
        if !in_corpus && !self.corpus.root().join(&resolved).exists() {
            report.push(
                Diagnostic::error(
                    doc,
                    format!("relative link target '{}' does not exist", target),
                )
                .with_line(line + 1),
            );
            return;
        }

        if let Some(fragment) = fragment {
            let known = self
                .corpus
                .anchors_of(&resolved)
                .is_some_and(|anchors| anchors.contains(fragment));
            if !known {
                report.push(
                    Diagnostic::error(
                        doc,
                        format!(
                            "anchor '#{}' not found in '{}'",
                            fragment,
                            resolved.display()
                        ),
                    )
                    .with_line(line + 1),
                );
            }
        }
    }

    fn validate_external(&self, doc: &Path, external: Vec<(usize, String)>, report: &mut Report) {
        if external.is_empty() {
            return;
        }

        let results: Vec<(usize, String, CheckStatus)> = match (&self.checker, &self.pool) {
            (Some(checker), Some(pool)) => pool.install(|| {
                external
                    .into_par_iter()
                    .map(|(line, url)| {
                        let status = self.cache.check_with(&url, || checker.probe(&url));
                        (line, url, status)
                    })
                    .collect()
            }),
            _ => external
                .into_iter()
                .map(|(line, url)| {
                    let status = self.cache.check_with(&url, || CheckStatus::Skipped);
                    (line, url, status)
                })
                .collect(),
        };

        for (line, url, status) in results {
            if let CheckStatus::Unreachable(reason) = status {
                report.push(
                    Diagnostic::error(doc, format!("external link '{}' unreachable: {}", url, reason))
                        .with_line(line + 1),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn corpus_with(files: &[(&str, &str)]) -> (TempDir, Corpus) {
        let temp = TempDir::new().unwrap();
        for (rel, text) in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        let corpus = Corpus::discover(temp.path(), &[]).unwrap();
        (temp, corpus)
    }

    fn validate(corpus: &Corpus, doc: &str, text: &str) -> Report {
        let registry = MetadataRegistry::new();
        let cache = LinkCache::new();
        let validator = LinkValidator::new(
            &registry,
            corpus,
            &cache,
            &NetworkConfig::default(),
            false,
        )
        .unwrap();
        let mut report = Report::new();
        validator.validate(&PathBuf::from(doc), text, &mut report);
        report
    }

    #[test]
    fn valid_relative_link_passes() {
        let (_temp, corpus) = corpus_with(&[
            ("sinks/console.md", "# Console\n\n[stdin](../sources/stdin.md)\n"),
            ("sources/stdin.md", "# Stdin\n"),
        ]);
        let report = validate(
            &corpus,
            "sinks/console.md",
            "[stdin](../sources/stdin.md)\n",
        );

        assert!(report.is_empty());
    }

    #[test]
    fn missing_relative_target_is_an_error() {
        let (_temp, corpus) = corpus_with(&[("a.md", "# A\n")]);
        let report = validate(&corpus, "a.md", "[gone](missing.md)\n");

        assert!(report.has_errors());
        assert!(report.diagnostics()[0].message.contains("missing.md"));
    }

    #[test]
    fn missing_fragment_in_target_is_an_error() {
        let (_temp, corpus) = corpus_with(&[
            ("a.md", "# A\n"),
            ("b.md", "# B\n\n## Setup\n"),
        ]);

        let ok = validate(&corpus, "a.md", "[setup](b.md#setup)\n");
        assert!(ok.is_empty());

        let bad = validate(&corpus, "a.md", "[nope](b.md#teardown)\n");
        assert!(bad.has_errors());
    }

    #[test]
    fn bare_anchor_checked_against_own_document() {
        let (_temp, corpus) = corpus_with(&[("a.md", "# A\n")]);
        let text = "# A\n\n## Options\n\n[jump](#options) [bad](#nowhere)\n";
        let report = validate(&corpus, "a.md", text);

        assert_eq!(report.count(crate::report::Severity::Error), 1);
        assert!(report.diagnostics()[0].message.contains("#nowhere"));
    }

    #[test]
    fn external_url_skipped_when_disabled() {
        let (_temp, corpus) = corpus_with(&[("a.md", "# A\n")]);
        let report = validate(&corpus, "a.md", "[site](https://example.com/page)\n");

        assert!(report.is_empty());
    }

    #[test]
    fn unresolved_reference_name_is_an_error() {
        let (_temp, corpus) = corpus_with(&[("a.md", "# A\n")]);
        let report = validate(&corpus, "a.md", "[Rust][urls.rust]\n");

        assert!(report.has_errors());
        assert!(report.diagnostics()[0].message.contains("urls.rust"));
    }

    #[test]
    fn reference_name_resolving_to_corpus_path() {
        let (_temp, corpus) = corpus_with(&[
            ("a.md", "# A\n"),
            ("about/config.md", "# Config\n\n## Format\n"),
        ]);
        let mut registry = MetadataRegistry::new();
        registry.insert_link("config", "about/config.md#format");
        let cache = LinkCache::new();
        let validator = LinkValidator::new(
            &registry,
            &corpus,
            &cache,
            &NetworkConfig::default(),
            false,
        )
        .unwrap();

        let mut report = Report::new();
        validator.validate(&PathBuf::from("a.md"), "[config][config]\n", &mut report);
        assert!(report.is_empty());
    }

    #[test]
    fn links_in_fences_are_ignored() {
        let (_temp, corpus) = corpus_with(&[("a.md", "# A\n")]);
        let report = validate(&corpus, "a.md", "```md\n[gone](missing.md)\n```\n");

        assert!(report.is_empty());
    }

    #[test]
    fn mailto_is_ignored() {
        let (_temp, corpus) = corpus_with(&[("a.md", "# A\n")]);
        let report = validate(&corpus, "a.md", "[mail](mailto:docs@example.com)\n");

        assert!(report.is_empty());
    }
}
