//! Metadata registry: declared components, options, and the link table.
//!
//! Stages receive the registry by shared reference so each can be tested
//! against a fabricated one.

pub mod component;
pub mod registry;

pub use component::{ComponentContext, ComponentKind};
pub use registry::MetadataRegistry;
