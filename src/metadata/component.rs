//! Component categories.

use std::fmt;

/// Category of a declared system component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Source,
    Transform,
    Sink,
}

impl ComponentKind {
    /// All categories, in reporting order.
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::Source,
        ComponentKind::Transform,
        ComponentKind::Sink,
    ];

    /// Directory name holding this category's documentation
    /// (`docs/sources/`, `docs/transforms/`, `docs/sinks/`).
    pub fn dir_name(&self) -> &'static str {
        match self {
            ComponentKind::Source => "sources",
            ComponentKind::Transform => "transforms",
            ComponentKind::Sink => "sinks",
        }
    }

    /// Parse a category from its documentation directory name.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "sources" => Some(ComponentKind::Source),
            "transforms" => Some(ComponentKind::Transform),
            "sinks" => Some(ComponentKind::Sink),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Source => write!(f, "source"),
            ComponentKind::Transform => write!(f, "transform"),
            ComponentKind::Sink => write!(f, "sink"),
        }
    }
}

/// A document's component context: which declared component it documents,
/// inferred from its path (`<category dir>/<component name>.md`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentContext {
    pub kind: ComponentKind,
    pub name: String,
}
