//! Heading extraction and anchor slugs.
//!
//! Anchors follow the GitHub convention: lowercase, punctuation stripped,
//! spaces become hyphens, duplicate slugs get a numeric suffix.

use std::collections::HashSet;

use super::fences::scan_fences;

/// An ATX heading found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of `#` markers.
    pub level: u8,
    /// Heading text, markers and surrounding whitespace stripped.
    pub title: String,
    /// Line index in the document.
    pub line: usize,
}

/// Extract all headings from document lines, ignoring fenced code.
pub fn extract_headings(lines: &[&str]) -> Vec<Heading> {
    let scan = scan_fences(lines);
    let mut headings = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if scan.is_fenced(i) {
            continue;
        }
        let hashes = line.chars().take_while(|&c| c == '#').count();
        if hashes == 0 || hashes > 6 {
            continue;
        }
        let rest = &line[hashes..];
        if !rest.starts_with(' ') {
            continue;
        }
        headings.push(Heading {
            level: hashes as u8,
            title: rest.trim().to_string(),
            line: i,
        });
    }

    headings
}

/// Compute the anchor slug for a heading title.
pub fn anchor_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.extend(c.to_lowercase());
        } else if c == ' ' || c == '-' {
            slug.push('-');
        }
        // Other punctuation (backticks, dots, parens) is dropped.
    }
    slug
}

/// The set of anchors addressable in a document, duplicate headings
/// suffixed `-1`, `-2`, ... in document order.
pub fn anchor_set(lines: &[&str]) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::new();
    for heading in extract_headings(lines) {
        let base = anchor_slug(&heading.title);
        if seen.insert(base.clone()) {
            continue;
        }
        let mut n = 1;
        while !seen.insert(format!("{}-{}", base, n)) {
            n += 1;
        }
    }
    seen
}
