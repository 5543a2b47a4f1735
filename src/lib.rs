//! docpipe - Documentation corpus post-processing and consistency checking.
//!
//! docpipe renders nothing itself; it takes an existing markdown corpus
//! plus a machine-readable declaration of the documented system and makes
//! the two agree: config examples tagged and ordered consistently, option
//! sections in canonical order, option mentions cross-referenced, links
//! resolvable, and a documentation file present for every declared
//! component.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Tool configuration (`docpipe.yml`)
//! - [`corpus`] - Corpus discovery and document access
//! - [`error`] - Error types and result aliases
//! - [`markdown`] - Fence, heading, and link scanning
//! - [`metadata`] - Declared components, options, and the link table
//! - [`pipeline`] - The transformer and checker pipeline
//! - [`report`] - Diagnostics and report formatting
//!
//! # Example
//!
//! ```
//! use docpipe::metadata::{ComponentKind, MetadataRegistry};
//! use docpipe::pipeline::OptionReferencer;
//!
//! let mut registry = MetadataRegistry::new();
//! registry.insert_component(ComponentKind::Source, "stdin", vec!["max_length".to_string()]);
//!
//! // The lookup table is built once per run from the registry.
//! let referencer = OptionReferencer::new(&registry);
//! # let _ = referencer;
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod markdown;
pub mod metadata;
pub mod pipeline;
pub mod report;

pub use error::{DocpipeError, Result};
