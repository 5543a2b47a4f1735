//! Section sorter.
//!
//! Component documents list their option sections under a parent heading
//! (by default `Options`, level 3 children). This stage reorders those
//! sibling sections into canonical order: names from the configured
//! priority list first, in list order, then the rest alphabetically.
//! The sort is stable, so duplicate titles keep their original relative
//! order. Everything belonging to a section, nested subsections included,
//! moves with it.

use std::path::Path;

use crate::config::SectionScope;
use crate::markdown::{extract_headings, Heading};
use crate::report::{Diagnostic, Report};

/// Reorders sortable sibling sections into canonical order.
pub struct SectionSorter {
    scope: SectionScope,
    priority: Vec<String>,
}

/// A sortable section: its heading plus the line range of its body.
struct Section {
    title: String,
    /// Line range, heading included, body and nested subsections included.
    lines: std::ops::Range<usize>,
}

impl SectionSorter {
    pub fn new(scope: SectionScope, priority: Vec<String>) -> Self {
        Self { scope, priority }
    }

    /// Sort the sortable sections of a document. Documents without the
    /// expected parent section are passed through with a warning.
    pub fn sort(&self, doc: &Path, text: &str, report: &mut Report) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let headings = extract_headings(&lines);

        let Some(parent) = headings
            .iter()
            .find(|h| h.level < self.scope.level && h.title == self.scope.parent)
        else {
            report.push(Diagnostic::warning(
                doc,
                format!(
                    "expected a '{}' section to sort, none found",
                    self.scope.parent
                ),
            ));
            return text.to_string();
        };

        // The sortable region ends at the next heading at or above the
        // parent's level.
        let region_end = headings
            .iter()
            .find(|h| h.line > parent.line && h.level <= parent.level)
            .map(|h| h.line)
            .unwrap_or(lines.len());

        let children: Vec<&Heading> = headings
            .iter()
            .filter(|h| {
                h.line > parent.line && h.line < region_end && h.level == self.scope.level
            })
            .collect();

        if children.len() < 2 {
            return text.to_string();
        }

        let mut sections: Vec<Section> = Vec::with_capacity(children.len());
        for (idx, child) in children.iter().enumerate() {
            let end = children
                .get(idx + 1)
                .map(|next| next.line)
                .unwrap_or(region_end);
            sections.push(Section {
                title: child.title.clone(),
                lines: child.line..end,
            });
        }

        let first_child_line = sections[0].lines.start;
        // Vec::sort_by is stable: ties keep document order.
        sections.sort_by(|a, b| self.sort_key(&a.title).cmp(&self.sort_key(&b.title)));

        let mut out: Vec<&str> = Vec::with_capacity(lines.len());
        out.extend(&lines[..first_child_line]);
        for section in &sections {
            out.extend(&lines[section.lines.clone()]);
        }
        out.extend(&lines[region_end..]);

        let mut result = out.join("\n");
        if text.ends_with('\n') {
            result.push('\n');
        }
        result
    }

    /// Priority-list index first, then case-insensitive title. Backticks
    /// are stripped so `` `rate` `` sorts as `rate`.
    fn sort_key(&self, title: &str) -> (usize, String) {
        let bare = title.trim_matches('`').to_lowercase();
        let priority = self
            .priority
            .iter()
            .position(|p| p.eq_ignore_ascii_case(&bare))
            .unwrap_or(self.priority.len());
        (priority, bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc() -> PathBuf {
        PathBuf::from("sources/stdin.md")
    }

    fn scope() -> SectionScope {
        SectionScope {
            parent: "Options".to_string(),
            level: 3,
        }
    }

    fn sort(text: &str, priority: &[&str]) -> (String, Report) {
        let sorter = SectionSorter::new(scope(), priority.iter().map(|s| s.to_string()).collect());
        let mut report = Report::new();
        let out = sorter.sort(&doc(), text, &mut report);
        (out, report)
    }

    #[test]
    fn sorts_alphabetically() {
        let input = "\
# Stdin

## Options

### `rate`

rate body

### `encoding`

encoding body

## Output
";
        let (out, report) = sort(input, &[]);

        assert!(report.is_empty());
        let encoding = out.find("### `encoding`").unwrap();
        let rate = out.find("### `rate`").unwrap();
        assert!(encoding < rate);
        // Bodies move with their headings.
        assert!(out.find("encoding body").unwrap() < out.find("rate body").unwrap());
        // Content outside the region stays put.
        assert!(out.ends_with("## Output\n"));
    }

    #[test]
    fn priority_list_overrides_alphabetical() {
        let input = "\
## Options

### `alpha`

### `zeta`

### `beta`
";
        let (out, _) = sort(input, &["zeta"]);

        let zeta = out.find("`zeta`").unwrap();
        let alpha = out.find("`alpha`").unwrap();
        let beta = out.find("`beta`").unwrap();
        assert!(zeta < alpha);
        assert!(alpha < beta);
    }

    #[test]
    fn stable_sort_preserves_duplicate_order() {
        let input = "\
## Options

### C

c body

### A

first a

### B

b body

### A

second a
";
        let (out, _) = sort(input, &[]);

        let first = out.find("first a").unwrap();
        let second = out.find("second a").unwrap();
        let b = out.find("b body").unwrap();
        let c = out.find("c body").unwrap();
        assert!(first < second);
        assert!(second < b);
        assert!(b < c);
    }

    #[test]
    fn nested_subsections_move_atomically() {
        let input = "\
## Options

### `zeta`

zeta body

#### zeta detail

### `alpha`

alpha body
";
        let (out, _) = sort(input, &[]);

        let alpha = out.find("### `alpha`").unwrap();
        let zeta = out.find("### `zeta`").unwrap();
        let detail = out.find("#### zeta detail").unwrap();
        assert!(alpha < zeta);
        assert!(zeta < detail);
    }

    #[test]
    fn missing_parent_warns_and_passes_through() {
        let input = "# Doc\n\n## Other\n";
        let (out, report) = sort(input, &[]);

        assert_eq!(out, input);
        assert_eq!(report.count(crate::report::Severity::Warning), 1);
    }

    #[test]
    fn headings_inside_fences_are_not_sections() {
        let input = "\
## Options

### `b`

```sh
### not a heading
```

### `a`
";
        let (out, _) = sort(input, &[]);

        // The fenced pseudo-heading moves with `b`'s section.
        let a = out.find("### `a`").unwrap();
        let b = out.find("### `b`").unwrap();
        let fenced = out.find("### not a heading").unwrap();
        assert!(a < b);
        assert!(b < fenced);
    }

    #[test]
    fn sorting_is_idempotent() {
        let input = "## Options\n\n### `b`\n\nbody b\n\n### `a`\n\nbody a\n";
        let (once, _) = sort(input, &[]);
        let (twice, _) = sort(&once, &[]);

        assert_eq!(once, twice);
    }

    #[test]
    fn single_section_is_untouched() {
        let input = "## Options\n\n### `only`\n\nbody\n";
        let (out, report) = sort(input, &[]);

        assert_eq!(out, input);
        assert!(report.is_empty());
    }
}
