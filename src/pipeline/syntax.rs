//! Syntax normalizer for config examples.
//!
//! The corpus documents one configuration format in two equivalent
//! dialects, TOML and YAML. Canonical presentation is the `toml` block
//! immediately followed by its `yaml` twin. This stage:
//!
//! - retags `yml` fences as `yaml`
//! - generates a missing YAML twin for a lone TOML config block
//! - reorders a YAML-before-TOML pair into canonical order
//! - collapses a block (or pair) to one dialect when preceded by a hint
//!   comment `<!-- syntax: toml -->` or `<!-- syntax: yaml -->`
//!
//! Already-canonical text passes through unchanged, so the stage is
//! idempotent. Unterminated fences and unparseable TOML are warnings;
//! the offending content is left as-is.

use std::path::Path;

use crate::markdown::{scan_fences, FencedBlock};
use crate::report::{Diagnostic, Report};

const HINT_TOML: &str = "<!-- syntax: toml -->";
const HINT_YAML: &str = "<!-- syntax: yaml -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hint {
    Toml,
    Yaml,
}

/// Rewrites TOML/YAML config example blocks into canonical form.
pub struct SyntaxNormalizer;

impl SyntaxNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize all config example blocks in a document.
    pub fn normalize(&self, doc: &Path, text: &str, report: &mut Report) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let scan = scan_fences(&lines);

        if let Some(line) = scan.unterminated {
            report.push(
                Diagnostic::warning(doc, "unterminated code fence, document left unmodified")
                    .with_line(line + 1),
            );
            return text.to_string();
        }

        let blocks = &scan.blocks;
        let mut out: Vec<String> = Vec::new();
        let mut i = 0;
        let mut bi = 0;

        while i < lines.len() {
            while bi < blocks.len() && blocks[bi].start < i {
                bi += 1;
            }
            let Some(block) = blocks.get(bi).filter(|b| b.start == i) else {
                out.push(lines[i].to_string());
                i += 1;
                continue;
            };

            let tag = canonical_tag(&block.tag);
            if tag != "toml" && tag != "yaml" {
                emit_block(&mut out, &lines, block, &tag);
                i = block.end + 1;
                continue;
            }

            let partner = blocks
                .get(bi + 1)
                .filter(|next| adjacent(&lines, block, next) && is_twin(&tag, next));
            let hint = hint_above(&lines, block.start);

            match partner {
                Some(twin) => {
                    // A TOML/YAML pair in either order.
                    let (toml_block, yaml_block) = if tag == "toml" {
                        (block, twin)
                    } else {
                        (twin, block)
                    };
                    match hint {
                        Some(Hint::Toml) => emit_block(&mut out, &lines, toml_block, "toml"),
                        Some(Hint::Yaml) => emit_block(&mut out, &lines, yaml_block, "yaml"),
                        None => {
                            emit_block(&mut out, &lines, toml_block, "toml");
                            out.push(String::new());
                            emit_block(&mut out, &lines, yaml_block, "yaml");
                        }
                    }
                    i = twin.end + 1;
                }
                None if tag == "toml" => {
                    match hint {
                        Some(Hint::Toml) => emit_block(&mut out, &lines, block, "toml"),
                        Some(Hint::Yaml) => match convert_body(&lines, block) {
                            Some(yaml) => emit_generated(&mut out, "yaml", &yaml),
                            None => {
                                self.warn_unparseable(doc, block, report);
                                emit_block(&mut out, &lines, block, "toml");
                            }
                        },
                        None => match convert_body(&lines, block) {
                            Some(yaml) => {
                                emit_block(&mut out, &lines, block, "toml");
                                out.push(String::new());
                                emit_generated(&mut out, "yaml", &yaml);
                            }
                            None => {
                                self.warn_unparseable(doc, block, report);
                                emit_block(&mut out, &lines, block, "toml");
                            }
                        },
                    }
                    i = block.end + 1;
                }
                None => {
                    // A lone YAML block is not necessarily a config example;
                    // only retag it.
                    emit_block(&mut out, &lines, block, "yaml");
                    i = block.end + 1;
                }
            }
        }

        let mut result = out.join("\n");
        if text.ends_with('\n') {
            result.push('\n');
        }
        result
    }

    fn warn_unparseable(&self, doc: &Path, block: &FencedBlock, report: &mut Report) {
        report.push(
            Diagnostic::warning(doc, "TOML example does not parse, block left unmodified")
                .with_line(block.start + 1),
        );
    }
}

impl Default for SyntaxNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_tag(tag: &str) -> String {
    if tag == "yml" {
        "yaml".to_string()
    } else {
        tag.to_string()
    }
}

fn is_twin(tag: &str, next: &FencedBlock) -> bool {
    let next_tag = canonical_tag(&next.tag);
    (tag == "toml" && next_tag == "yaml") || (tag == "yaml" && next_tag == "toml")
}

fn adjacent(lines: &[&str], a: &FencedBlock, b: &FencedBlock) -> bool {
    lines[(a.end + 1)..b.start].iter().all(|l| l.trim().is_empty())
}

fn hint_above(lines: &[&str], start: usize) -> Option<Hint> {
    let above = lines[..start].iter().rev().find(|l| !l.trim().is_empty())?;
    match above.trim() {
        HINT_TOML => Some(Hint::Toml),
        HINT_YAML => Some(Hint::Yaml),
        _ => None,
    }
}

fn emit_block(out: &mut Vec<String>, lines: &[&str], block: &FencedBlock, tag: &str) {
    out.push(format!("```{}", tag));
    for idx in block.body_range() {
        out.push(lines[idx].to_string());
    }
    out.push("```".to_string());
}

fn emit_generated(out: &mut Vec<String>, tag: &str, body: &str) {
    out.push(format!("```{}", tag));
    for line in body.trim_end().lines() {
        out.push(line.to_string());
    }
    out.push("```".to_string());
}

fn convert_body(lines: &[&str], block: &FencedBlock) -> Option<String> {
    let body: String = block
        .body_range()
        .map(|idx| format!("{}\n", lines[idx]))
        .collect();
    let value: toml::Value = toml::from_str(&body).ok()?;
    serde_yaml::to_string(&value).ok()
}
