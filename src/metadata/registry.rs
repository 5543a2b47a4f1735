//! Metadata registry loading.
//!
//! The registry is the machine-readable declaration of the system being
//! documented: which components exist per category, which options each
//! component accepts, and a master link table naming external URLs and
//! corpus paths. It is loaded once from a TOML file and read-only for the
//! rest of the run.
//!
//! ```toml
//! [links]
//! rust = "https://www.rust-lang.org"
//!
//! [sources.stdin]
//! options = ["host_key", "max_length"]
//!
//! [sinks.console]
//! options = ["target", "encoding"]
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::{DocpipeError, Result};

use super::component::ComponentKind;

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    links: BTreeMap<String, String>,
    #[serde(default)]
    sources: BTreeMap<String, RawComponent>,
    #[serde(default)]
    transforms: BTreeMap<String, RawComponent>,
    #[serde(default)]
    sinks: BTreeMap<String, RawComponent>,
}

#[derive(Debug, Default, Deserialize)]
struct RawComponent {
    #[serde(default)]
    options: Vec<String>,
}

/// Declared components, their options, and the master link table.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    links: BTreeMap<String, String>,
    sources: BTreeMap<String, BTreeSet<String>>,
    transforms: BTreeMap<String, BTreeSet<String>>,
    sinks: BTreeMap<String, BTreeSet<String>>,
}

impl MetadataRegistry {
    /// Create an empty registry. Useful for tests with fabricated contents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DocpipeError::MetadataNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path)?;
        let parsed: RawMetadata =
            toml::from_str(&raw).map_err(|e| DocpipeError::MetadataParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut registry = Self {
            links: parsed.links,
            ..Self::default()
        };
        for (name, component) in parsed.sources {
            registry.insert_component(ComponentKind::Source, &name, component.options);
        }
        for (name, component) in parsed.transforms {
            registry.insert_component(ComponentKind::Transform, &name, component.options);
        }
        for (name, component) in parsed.sinks {
            registry.insert_component(ComponentKind::Sink, &name, component.options);
        }
        Ok(registry)
    }

    /// Declare a component with its options.
    pub fn insert_component(
        &mut self,
        kind: ComponentKind,
        name: &str,
        options: impl IntoIterator<Item = String>,
    ) {
        self.components_mut(kind)
            .insert(name.to_string(), options.into_iter().collect());
    }

    /// Add an entry to the master link table.
    pub fn insert_link(&mut self, name: &str, target: &str) {
        self.links.insert(name.to_string(), target.to_string());
    }

    /// Declared component names for a category.
    pub fn component_names(&self, kind: ComponentKind) -> BTreeSet<String> {
        self.components(kind).keys().cloned().collect()
    }

    /// Options declared for a component, `None` if the component is unknown.
    pub fn options_of(&self, kind: ComponentKind, name: &str) -> Option<&BTreeSet<String>> {
        self.components(kind).get(name)
    }

    /// Resolve a link-table name to its target (URL or corpus path).
    pub fn resolve_link(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    /// Iterate all declared components across categories.
    pub fn all_components(
        &self,
    ) -> impl Iterator<Item = (ComponentKind, &String, &BTreeSet<String>)> {
        ComponentKind::ALL
            .into_iter()
            .flat_map(move |kind| self.components(kind).iter().map(move |(n, o)| (kind, n, o)))
    }

    fn components(&self, kind: ComponentKind) -> &BTreeMap<String, BTreeSet<String>> {
        match kind {
            ComponentKind::Source => &self.sources,
            ComponentKind::Transform => &self.transforms,
            ComponentKind::Sink => &self.sinks,
        }
    }

    fn components_mut(&mut self, kind: ComponentKind) -> &mut BTreeMap<String, BTreeSet<String>> {
        match kind {
            ComponentKind::Source => &mut self.sources,
            ComponentKind::Transform => &mut self.transforms,
            ComponentKind::Sink => &mut self.sinks,
        }
    }
}
