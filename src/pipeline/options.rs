//! Option cross-referencer.
//!
//! Prose mentions of configuration options are written as backtick tokens
//! (`` `rate` ``). This stage rewrites the first such mention per document
//! into a link to the option's canonical anchor: the option heading in the
//! component's own document, or the owning component's document when the
//! mention names another component's option. Resolution uses a lookup
//! table precomputed from the registry once per run.
//!
//! Fenced code, headings, and text already inside links are never
//! rewritten. A token already linked counts as the first mention, which
//! keeps the stage idempotent.

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use crate::markdown::{anchor_set, anchor_slug, scan_fences};
use crate::metadata::{ComponentContext, ComponentKind, MetadataRegistry};
use crate::report::{Diagnostic, Report};

static OPTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([A-Za-z][A-Za-z0-9_]*)`").expect("valid option token pattern"));

static LINK_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]\([^)]*\)|\[[^\]]*\]\[[^\]]*\]").expect("valid link span pattern")
});

/// Rewrites option mentions into anchored cross-references.
pub struct OptionReferencer {
    /// Options per declared component.
    by_component: HashMap<(ComponentKind, String), BTreeSet<String>>,
    /// Components declaring each option name.
    by_option: HashMap<String, Vec<(ComponentKind, String)>>,
}

impl OptionReferencer {
    /// Precompute the option lookup table from the registry.
    pub fn new(registry: &MetadataRegistry) -> Self {
        let mut by_component = HashMap::new();
        let mut by_option: HashMap<String, Vec<(ComponentKind, String)>> = HashMap::new();

        for (kind, name, options) in registry.all_components() {
            for option in options {
                by_option
                    .entry(option.clone())
                    .or_default()
                    .push((kind, name.clone()));
            }
            by_component.insert((kind, name.clone()), options.clone());
        }

        Self {
            by_component,
            by_option,
        }
    }

    /// Rewrite option mentions in a document. Documents without a
    /// component context are passed through unchanged.
    pub fn reference(
        &self,
        doc: &Path,
        text: &str,
        context: Option<&ComponentContext>,
        report: &mut Report,
    ) -> String {
        let Some(context) = context else {
            return text.to_string();
        };
        let Some(own_options) = self
            .by_component
            .get(&(context.kind, context.name.clone()))
        else {
            // Undeclared component; the presence checker reports it.
            return text.to_string();
        };

        let lines: Vec<&str> = text.lines().collect();
        let scan = scan_fences(&lines);
        let anchors = anchor_set(&lines);

        let mut handled: HashSet<String> = HashSet::new();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());

        for (i, line) in lines.iter().enumerate() {
            if scan.is_fenced(i) || line.trim_start().starts_with('#') {
                out.push(line.to_string());
                continue;
            }

            let link_spans: Vec<std::ops::Range<usize>> =
                LINK_SPAN.find_iter(line).map(|m| m.range()).collect();

            let mut rebuilt = String::with_capacity(line.len());
            let mut cursor = 0;
            for m in OPTION_TOKEN.captures_iter(line) {
                let whole = m.get(0).expect("match");
                let token = &m[1];

                if !self.by_option.contains_key(token) {
                    continue;
                }
                if link_spans.iter().any(|s| s.contains(&whole.start())) {
                    // A token anywhere inside an existing link counts as
                    // the first mention.
                    handled.insert(token.to_string());
                    continue;
                }
                if handled.contains(token) {
                    continue;
                }

                let Some(target) = self.resolve(token, context, own_options, &anchors) else {
                    // `resolve` fails for exactly two reasons: the context's
                    // own option has no heading here, or the token belongs
                    // to several other components.
                    let message = if own_options.contains(token) {
                        format!("option `{}` has no anchor in this document", token)
                    } else {
                        format!(
                            "option `{}` is ambiguous outside its component ({} candidates)",
                            token,
                            self.by_option[token].len()
                        )
                    };
                    report.push(Diagnostic::warning(doc, message).with_line(i + 1));
                    handled.insert(token.to_string());
                    continue;
                };

                handled.insert(token.to_string());
                rebuilt.push_str(&line[cursor..whole.start()]);
                rebuilt.push_str(&format!("[`{}`]({})", token, target));
                cursor = whole.end();
            }
            rebuilt.push_str(&line[cursor..]);
            out.push(rebuilt);
        }

        let mut result = out.join("\n");
        if text.ends_with('\n') {
            result.push('\n');
        }
        result
    }

    /// Resolve a token to a link target, preferring the document's own
    /// component context over other components.
    fn resolve(
        &self,
        token: &str,
        context: &ComponentContext,
        own_options: &BTreeSet<String>,
        anchors: &HashSet<String>,
    ) -> Option<String> {
        if own_options.contains(token) {
            let anchor = anchor_slug(token);
            if anchors.contains(&anchor) {
                return Some(format!("#{}", anchor));
            }
            return None;
        }

        let owners = self.by_option.get(token)?;
        match owners.as_slice() {
            [(kind, name)] if !(kind == &context.kind && name == &context.name) => Some(format!(
                "../{}/{}.md#{}",
                kind.dir_name(),
                name,
                anchor_slug(token)
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn registry() -> MetadataRegistry {
        let mut registry = MetadataRegistry::new();
        registry.insert_component(
            ComponentKind::Source,
            "foo",
            vec!["bar".to_string(), "baz".to_string()],
        );
        registry.insert_component(ComponentKind::Sink, "console", vec!["target".to_string()]);
        registry.insert_component(ComponentKind::Sink, "kafka", vec!["bar".to_string()]);
        registry
    }

    fn context() -> ComponentContext {
        ComponentContext {
            kind: ComponentKind::Source,
            name: "foo".to_string(),
        }
    }

    fn reference(text: &str) -> (String, Report) {
        let referencer = OptionReferencer::new(&registry());
        let mut report = Report::new();
        let doc = PathBuf::from("sources/foo.md");
        let out = referencer.reference(&doc, text, Some(&context()), &mut report);
        (out, report)
    }

    #[test]
    fn links_first_mention_to_own_anchor() {
        let input = "# Foo\n\nThe `bar` option controls X.\n\n### `bar`\n\ndetails\n";
        let (out, report) = reference(input);

        assert!(report.is_empty());
        assert!(out.contains("The [`bar`](#bar) option"));
        // The heading itself is untouched.
        assert!(out.contains("### `bar`\n"));
    }

    #[test]
    fn later_mentions_stay_plain() {
        let input = "`bar` first. `bar` second.\n\n### `bar`\n";
        let (out, _) = reference(input);

        assert_eq!(out.matches("[`bar`](#bar)").count(), 1);
        assert!(out.contains("second."));
        assert!(out.contains("[`bar`](#bar) first. `bar` second."));
    }

    #[test]
    fn fenced_code_is_never_rewritten() {
        let input = "### `bar`\n\n```toml\nbar = true\n```\n\n`bar` in prose.\n";
        let (out, _) = reference(input);

        assert!(out.contains("```toml\nbar = true\n```"));
        assert!(out.contains("[`bar`](#bar) in prose."));
    }

    #[test]
    fn existing_link_is_not_double_linked() {
        let input = "[`bar`](#bar) already linked. `bar` again.\n\n### `bar`\n";
        let (out, _) = reference(input);

        // The existing link counts as the first mention.
        assert_eq!(out, input);
    }

    #[test]
    fn token_inside_longer_link_text_is_not_rewritten() {
        let input = "See [the `bar` option](#bar) for details. `bar` again.\n\n### `bar`\n";
        let (out, report) = reference(input);

        assert_eq!(out, input);
        assert!(report.is_empty());
    }

    #[test]
    fn token_inside_reference_link_text_is_not_rewritten() {
        let input = "See [the `bar` option][bar-docs] for details.\n\n### `bar`\n";
        let (out, _) = reference(input);

        assert_eq!(out, input);
    }

    #[test]
    fn cross_component_option_links_to_owning_doc() {
        let input = "See the console `target` option.\n";
        let (out, report) = reference(input);

        assert!(report.is_empty());
        assert!(out.contains("[`target`](../sinks/console.md#target)"));
    }

    #[test]
    fn ambiguous_option_warns_and_stays_plain() {
        // `bar` belongs to sources/foo and sinks/kafka; in a doc whose
        // context is neither, it cannot be resolved.
        let referencer = OptionReferencer::new(&registry());
        let mut report = Report::new();
        let doc = PathBuf::from("sinks/console.md");
        let ctx = ComponentContext {
            kind: ComponentKind::Sink,
            name: "console".to_string(),
        };
        let out = referencer.reference(&doc, "Uses `bar` internally.\n", Some(&ctx), &mut report);

        assert_eq!(out, "Uses `bar` internally.\n");
        assert_eq!(report.count(crate::report::Severity::Warning), 1);
        assert!(report.diagnostics()[0].message.contains("ambiguous"));
    }

    #[test]
    fn own_option_without_anchor_warns() {
        let input = "The `baz` option.\n";
        let (out, report) = reference(input);

        assert_eq!(out, input);
        assert_eq!(report.count(crate::report::Severity::Warning), 1);
        assert!(report.diagnostics()[0].message.contains("no anchor"));
    }

    #[test]
    fn unknown_tokens_are_ignored_silently() {
        let input = "Use `stdout` and `true` freely.\n\n### `bar`\n";
        let (out, report) = reference(input);

        assert_eq!(out, input);
        assert!(report.is_empty());
    }

    #[test]
    fn no_context_passes_through() {
        let referencer = OptionReferencer::new(&registry());
        let mut report = Report::new();
        let doc = PathBuf::from("guides/setup.md");
        let input = "`bar` means nothing here.\n";
        let out = referencer.reference(&doc, input, None, &mut report);

        assert_eq!(out, input);
        assert!(report.is_empty());
    }

    #[test]
    fn referencing_is_idempotent() {
        let input = "`bar` once. `bar` twice.\n\n### `bar`\n\nbody\n";
        let (once, _) = reference(input);
        let mut report = Report::new();
        let referencer = OptionReferencer::new(&registry());
        let doc = PathBuf::from("sources/foo.md");
        let twice = referencer.reference(&doc, &once, Some(&context()), &mut report);

        assert_eq!(once, twice);
        assert!(report.is_empty());
    }
}
