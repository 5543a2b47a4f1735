//! Link extraction.
//!
//! Handles the three reference shapes the corpus uses: inline links
//! `[text](target)`, reference-style links `[text][name]` resolved through
//! the metadata link table, and bare anchor links `[text](#fragment)`.
//! Links inside fenced code or inline code spans are never extracted.

use regex::Regex;
use std::sync::LazyLock;

use super::fences::scan_fences;

static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\]]*)\]\(([^)\s]+)(?:\s+"[^"]*")?\)"#).expect("valid inline link pattern")
});

static REFERENCE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\[([^\]]+)\]").expect("valid reference link pattern"));

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]*`").expect("valid code span pattern"));

/// How a link names its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// `[text](target)` with the target spelled inline.
    Inline,
    /// `[text][name]`, target resolved through the link table.
    Reference(String),
}

/// A link occurrence in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Link text.
    pub text: String,
    /// Raw target for inline links, empty for reference links.
    pub target: String,
    /// Line index in the document.
    pub line: usize,
    pub kind: LinkKind,
}

/// Extract all links from document lines, ignoring fenced code and
/// inline code spans.
pub fn extract_links(lines: &[&str]) -> Vec<LinkRef> {
    let scan = scan_fences(lines);
    let mut links = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if scan.is_fenced(i) {
            continue;
        }
        // Blank out code spans so `[x](y)` inside backticks is not a link.
        let masked = CODE_SPAN.replace_all(line, |c: &regex::Captures| " ".repeat(c[0].len()));

        for cap in INLINE_LINK.captures_iter(&masked) {
            links.push(LinkRef {
                text: cap[1].to_string(),
                target: cap[2].to_string(),
                line: i,
                kind: LinkKind::Inline,
            });
        }
        for cap in REFERENCE_LINK.captures_iter(&masked) {
            links.push(LinkRef {
                text: cap[1].to_string(),
                target: String::new(),
                line: i,
                kind: LinkKind::Reference(cap[2].to_string()),
            });
        }
    }

    links
}
