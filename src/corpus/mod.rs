//! Corpus discovery and document access.
//!
//! A corpus is the snapshot of markdown files under the docs root at the
//! start of a run: their paths (relative to the root), their text, and the
//! anchor set each defines. Anchors are precomputed here because the
//! content transformers reorder and extend documents but never add or
//! remove headings, so the sets stay valid for the whole run.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{DocpipeError, Result};
use crate::markdown::anchor_set;
use crate::metadata::{ComponentContext, ComponentKind};

/// Marker left by the template renderer in generated files. Generated
/// documents are skipped by the content transformers (the generator owns
/// them) but still count as link targets and presence-check files.
pub const AUTOGENERATED_MARKER: &str = "THIS FILE IS AUTOGENERATED";

/// A markdown document in the corpus.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the docs root.
    pub path: PathBuf,
    /// Document text as read at discovery.
    pub text: String,
}

impl Document {
    /// Whether the template renderer produced this file.
    pub fn is_autogenerated(&self) -> bool {
        self.text.contains(AUTOGENERATED_MARKER)
    }

    /// The component this document describes, inferred from its path:
    /// `<category dir>/<component name>.md`.
    pub fn component_context(&self) -> Option<ComponentContext> {
        let kind = self
            .path
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .and_then(ComponentKind::from_dir_name)?;
        let name = self.path.file_stem()?.to_str()?.to_string();
        Some(ComponentContext { kind, name })
    }
}

/// Snapshot of the documentation corpus for one run.
#[derive(Debug)]
pub struct Corpus {
    root: PathBuf,
    documents: Vec<Document>,
    anchors: HashMap<PathBuf, HashSet<String>>,
}

impl Corpus {
    /// Walk the docs root and load every markdown file not excluded.
    pub fn discover(root: &Path, exclude: &[String]) -> Result<Self> {
        if !root.is_dir() {
            return Err(DocpipeError::DocsRootNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        collect_markdown(root, root, exclude, &mut files)?;
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        let mut anchors = HashMap::with_capacity(files.len());
        for path in files {
            let text =
                fs::read_to_string(root.join(&path)).map_err(|e| DocpipeError::DocumentIoError {
                    action: "read",
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            let lines: Vec<&str> = text.lines().collect();
            anchors.insert(path.clone(), anchor_set(&lines));
            documents.push(Document { path, text });
        }

        Ok(Self {
            root: root.to_path_buf(),
            documents,
            anchors,
        })
    }

    /// The docs root this corpus was discovered under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All documents, sorted by path.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Whether a root-relative path names a corpus document.
    pub fn contains(&self, path: &Path) -> bool {
        self.anchors.contains_key(path)
    }

    /// Anchor set of a corpus document.
    pub fn anchors_of(&self, path: &Path) -> Option<&HashSet<String>> {
        self.anchors.get(path)
    }

    /// Filename stems of documents directly under `<category dir>/`,
    /// used by the presence checker.
    pub fn stems_in(&self, kind: ComponentKind) -> BTreeSet<String> {
        let dir = Path::new(kind.dir_name());
        self.documents
            .iter()
            .filter(|d| d.path.parent() == Some(dir))
            .filter_map(|d| d.path.file_stem())
            .filter_map(|s| s.to_str())
            .map(String::from)
            .collect()
    }

    /// Write a transformed document back to disk, only if it changed.
    /// The write is a single full-buffer write after the complete
    /// transform; documents are never written incrementally.
    pub fn write_if_changed(&self, path: &Path, original: &str, transformed: &str) -> Result<bool> {
        if original == transformed {
            return Ok(false);
        }
        fs::write(self.root.join(path), transformed).map_err(|e| DocpipeError::DocumentIoError {
            action: "write",
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(true)
    }
}

fn collect_markdown(
    root: &Path,
    dir: &Path,
    exclude: &[String],
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_markdown(root, &path, exclude, out)?;
            continue;
        }
        if !path.extension().is_some_and(|e| e == "md") {
            continue;
        }
        let name = entry.file_name();
        if exclude.iter().any(|x| name == x.as_str()) {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_path_buf());
        }
    }
    Ok(())
}

/// Resolve a relative link target against the directory of the document
/// that contains it, collapsing `..` components. Returns `None` when the
/// target escapes the docs root.
pub fn resolve_relative(doc_path: &Path, target: &str) -> Option<PathBuf> {
    let base = doc_path.parent().unwrap_or_else(|| Path::new(""));
    let mut resolved = PathBuf::new();
    for component in base.join(target).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(resolved)
}
