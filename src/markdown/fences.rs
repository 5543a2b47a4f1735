//! Fenced code block detection.
//!
//! Every pipeline stage must agree on which lines are code so that prose
//! rewrites never touch examples. Blocks are delimited by lines starting
//! with three backticks, with an optional language tag on the opening line.

/// A fenced code block located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Line index of the opening fence.
    pub start: usize,
    /// Line index of the closing fence.
    pub end: usize,
    /// Language tag on the opening fence, empty if untagged.
    pub tag: String,
}

impl FencedBlock {
    /// Line indices of the block body (between the fences).
    pub fn body_range(&self) -> std::ops::Range<usize> {
        (self.start + 1)..self.end
    }
}

/// Result of scanning a document for fenced blocks.
#[derive(Debug, Default)]
pub struct FenceScan {
    /// All complete fenced blocks, in document order.
    pub blocks: Vec<FencedBlock>,
    /// Line index of an opening fence that never closes, if any.
    pub unterminated: Option<usize>,
    fenced: Vec<bool>,
}

impl FenceScan {
    /// Whether the given line index falls inside a fenced block
    /// (fence delimiter lines included).
    pub fn is_fenced(&self, line: usize) -> bool {
        self.fenced.get(line).copied().unwrap_or(false)
    }
}

/// Scan document lines for fenced code blocks.
pub fn scan_fences(lines: &[&str]) -> FenceScan {
    let mut scan = FenceScan {
        fenced: vec![false; lines.len()],
        ..Default::default()
    };

    let mut open: Option<(usize, String)> = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if !trimmed.starts_with("```") {
            continue;
        }
        match open.take() {
            None => {
                let tag = trimmed.trim_start_matches('`').trim().to_string();
                open = Some((i, tag));
            }
            Some((start, tag)) => {
                scan.blocks.push(FencedBlock { start, end: i, tag });
                for flag in &mut scan.fenced[start..=i] {
                    *flag = true;
                }
            }
        }
    }

    if let Some((start, _)) = open {
        scan.unterminated = Some(start);
        for flag in &mut scan.fenced[start..] {
            *flag = true;
        }
    }

    scan
}
