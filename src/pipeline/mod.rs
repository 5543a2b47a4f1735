//! The post-processing pipeline.
//!
//! Each document runs the transformer sequence to completion before the
//! next begins: syntax normalization, section sorting, option
//! cross-referencing, then link validation. The first three are pure
//! text-to-text transforms; the validator only reports. Documents are
//! written back in one piece, and only when the transform changed them.
//! The presence checker runs once per component category, over the file
//! listing rather than document text.

pub mod link_cache;
pub mod link_check;
pub mod options;
pub mod presence;
pub mod sections;
pub mod syntax;

use std::path::PathBuf;

use crate::config::DocpipeConfig;
use crate::corpus::{Corpus, Document};
use crate::error::Result;
use crate::metadata::{ComponentKind, MetadataRegistry};
use crate::report::Report;

pub use link_cache::{CheckStatus, LinkCache};
pub use link_check::{LinkValidator, UrlChecker};
pub use options::OptionReferencer;
pub use presence::PresenceChecker;
pub use sections::SectionSorter;
pub use syntax::SyntaxNormalizer;

/// What happened to each document in a run.
#[derive(Debug, Default)]
pub struct Outcome {
    /// The accumulated diagnostics.
    pub report: Report,
    /// Documents rewritten on disk.
    pub changed: Vec<PathBuf>,
    /// Documents already in canonical form.
    pub unchanged: Vec<PathBuf>,
    /// Autogenerated documents left to the template renderer.
    pub skipped: Vec<PathBuf>,
}

/// Applies the full transformer sequence and the presence check.
pub struct Pipeline<'a> {
    registry: &'a MetadataRegistry,
    config: &'a DocpipeConfig,
    normalizer: SyntaxNormalizer,
    sorter: SectionSorter,
    referencer: OptionReferencer,
    cache: LinkCache,
}

impl<'a> Pipeline<'a> {
    /// Build a pipeline for one run. The option lookup table and the link
    /// cache are constructed here, once, and shared across documents.
    pub fn new(registry: &'a MetadataRegistry, config: &'a DocpipeConfig) -> Self {
        Self {
            registry,
            config,
            normalizer: SyntaxNormalizer::new(),
            sorter: SectionSorter::new(
                config.section_scope.clone(),
                config.section_priority.clone(),
            ),
            referencer: OptionReferencer::new(registry),
            cache: LinkCache::new(),
        }
    }

    /// Run the pipeline over the whole corpus. With `dry_run` the
    /// transforms and checks all happen but nothing is written back.
    pub fn run(&self, corpus: &Corpus, dry_run: bool) -> Result<Outcome> {
        let mut outcome = Outcome::default();

        for kind in ComponentKind::ALL {
            PresenceChecker::new().check(
                kind,
                &self.registry.component_names(kind),
                &corpus.stems_in(kind),
                &mut outcome.report,
            );
        }

        let validator = LinkValidator::new(
            self.registry,
            corpus,
            &self.cache,
            &self.config.network,
            self.config.check_external_links,
        )?;

        for document in corpus.documents() {
            if document.is_autogenerated() {
                tracing::debug!("skipping autogenerated {}", document.path.display());
                outcome.skipped.push(document.path.clone());
                continue;
            }

            let transformed = self.transform(document, &mut outcome.report);
            validator.validate(&document.path, &transformed, &mut outcome.report);

            let differs = transformed != document.text;
            if differs && !dry_run {
                corpus.write_if_changed(&document.path, &document.text, &transformed)?;
            }
            if differs {
                outcome.changed.push(document.path.clone());
            } else {
                outcome.unchanged.push(document.path.clone());
            }
        }

        Ok(outcome)
    }

    /// Apply the three content transformers to one document's text.
    /// Exposed for tests; [`run`](Self::run) adds validation and write-back.
    pub fn transform(&self, document: &Document, report: &mut Report) -> String {
        let context = document.component_context();
        let doc = &document.path;

        let text = self.normalizer.normalize(doc, &document.text, report);
        // Only component docs carry a sortable options section.
        let text = if context.is_some() {
            self.sorter.sort(doc, &text, report)
        } else {
            text
        };
        self.referencer
            .reference(doc, &text, context.as_ref(), report)
    }

    /// The link cache for this run. Exposed so tests can assert how many
    /// distinct URLs were consulted.
    pub fn cache(&self) -> &LinkCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn registry() -> MetadataRegistry {
        let mut registry = MetadataRegistry::new();
        registry.insert_component(
            ComponentKind::Source,
            "stdin",
            vec!["host_key".to_string(), "max_length".to_string()],
        );
        registry
    }

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    const STDIN_DOC: &str = "\
# Stdin

The `max_length` option truncates lines.

## Options

### `max_length`

Maximum line length.

### `host_key`

Host key name.
";

    #[test]
    fn full_run_transforms_and_writes() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "sources/stdin.md", STDIN_DOC);

        let registry = registry();
        let config = DocpipeConfig::default();
        let corpus = Corpus::discover(temp.path(), &config.exclude).unwrap();
        let pipeline = Pipeline::new(&registry, &config);

        let outcome = pipeline.run(&corpus, false).unwrap();

        assert!(!outcome.report.has_errors());
        assert_eq!(outcome.changed, vec![PathBuf::from("sources/stdin.md")]);

        let written = fs::read_to_string(temp.path().join("sources/stdin.md")).unwrap();
        assert!(written.contains("[`max_length`](#max_length)"));
        // Sections sorted: host_key before max_length.
        assert!(written.find("### `host_key`").unwrap() < written.find("### `max_length`").unwrap());
    }

    #[test]
    fn full_pipeline_is_idempotent() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "sources/stdin.md", STDIN_DOC);

        let registry = registry();
        let config = DocpipeConfig::default();

        let corpus = Corpus::discover(temp.path(), &config.exclude).unwrap();
        Pipeline::new(&registry, &config).run(&corpus, false).unwrap();
        let first = fs::read_to_string(temp.path().join("sources/stdin.md")).unwrap();

        let corpus = Corpus::discover(temp.path(), &config.exclude).unwrap();
        let outcome = Pipeline::new(&registry, &config).run(&corpus, false).unwrap();
        let second = fs::read_to_string(temp.path().join("sources/stdin.md")).unwrap();

        assert_eq!(first, second);
        assert!(outcome.changed.is_empty());
        assert_eq!(outcome.unchanged, vec![PathBuf::from("sources/stdin.md")]);
    }

    #[test]
    fn autogenerated_documents_are_skipped() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "sources/stdin.md",
            "<!-- THIS FILE IS AUTOGENERATED -->\n# Stdin\n\n```toml\na = 1\n```\n",
        );

        let registry = registry();
        let config = DocpipeConfig::default();
        let corpus = Corpus::discover(temp.path(), &config.exclude).unwrap();
        let outcome = Pipeline::new(&registry, &config).run(&corpus, false).unwrap();

        assert_eq!(outcome.skipped, vec![PathBuf::from("sources/stdin.md")]);
        // No yaml twin was generated.
        let text = fs::read_to_string(temp.path().join("sources/stdin.md")).unwrap();
        assert!(!text.contains("```yaml"));
    }

    #[test]
    fn presence_errors_surface_in_outcome() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "sources/other.md", "# Other\n\n## Options\n");

        let registry = registry(); // declares stdin only
        let config = DocpipeConfig::default();
        let corpus = Corpus::discover(temp.path(), &config.exclude).unwrap();
        let outcome = Pipeline::new(&registry, &config).run(&corpus, false).unwrap();

        assert!(outcome.report.has_errors());
        let messages: Vec<_> = outcome
            .report
            .diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert!(messages.iter().any(|m| m.contains("missing documentation for source 'stdin'")));
        assert!(messages.iter().any(|m| m.contains("orphaned documentation")));
    }

    #[test]
    fn broken_relative_link_fails_even_without_external_checks() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "guide.md",
            "# Guide\n\n[gone](missing.md) and [site](https://example.com)\n",
        );

        let registry = MetadataRegistry::new();
        let config = DocpipeConfig::default();
        let corpus = Corpus::discover(temp.path(), &config.exclude).unwrap();
        let outcome = Pipeline::new(&registry, &config).run(&corpus, false).unwrap();

        assert_eq!(outcome.report.count(crate::report::Severity::Error), 1);
        assert!(outcome.report.diagnostics()[0].message.contains("missing.md"));
    }
}
