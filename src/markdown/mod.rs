//! Targeted markdown scanning.
//!
//! docpipe is not a markdown renderer. The pipeline stages need exactly
//! three structural facts about a document: where its fenced code blocks
//! are, what headings (and therefore anchors) it defines, and what links
//! it contains. This module provides pattern-based scanners for those,
//! shared by every stage so they all agree on what counts as code.

pub mod fences;
pub mod headings;
pub mod links;

pub use fences::{scan_fences, FenceScan, FencedBlock};
pub use headings::{anchor_set, anchor_slug, extract_headings, Heading};
pub use links::{extract_links, LinkKind, LinkRef};
