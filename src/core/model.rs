//! Core data model for the documentation pipeline
//!
//! Everything here is produced once by a stage and read-only afterwards.
//! Components, relationships and orderings originate from the external
//! analysis service, so every index they carry is an *opinion*, not an
//! invariant; consumers must go through the bounds-checked accessors
//! instead of indexing directly.

use serde::{Deserialize, Serialize};

/// One source file handed to the pipeline.
///
/// The position in the extraction list is the file's identity: prompts,
/// components and plan entries all refer to files by that index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root, as shown to the service.
    pub path: String,
    /// Full UTF-8 content of the file.
    pub content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A named, described subset of the input files, treated as one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Concise name for the component.
    pub name: String,
    /// Beginner-friendly description of the component.
    pub description: String,
    /// Indices into the FileRecord list. May contain out-of-range values;
    /// deduplicated on ingest, bounds-checked on use.
    #[serde(rename = "files")]
    pub file_indices: Vec<usize>,
}

impl Component {
    /// Drop duplicate file indices, keeping first-seen order.
    pub fn dedup_file_indices(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.file_indices.retain(|i| seen.insert(*i));
    }
}

/// Structured response of the segregation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSet {
    pub components: Vec<Component>,
}

/// A labeled directed edge between two components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Index of the source component.
    #[serde(rename = "from_component")]
    pub from: usize,
    /// Index of the target component.
    #[serde(rename = "to_component")]
    pub to: usize,
    /// Brief label for the interaction, a few words.
    pub label: String,
}

/// Structured response of the relationship stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipAnalysis {
    /// High-level project overview in markdown.
    pub overview: String,
    /// Directed edges over the component list, unfiltered.
    pub relationships: Vec<Relationship>,
}

/// Structured response of the ordering stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderedComponents {
    /// Component indices in presentation order.
    pub ordered_components: Vec<usize>,
}

/// Check that `ordering` is a true permutation of `0..n`.
pub fn is_permutation(ordering: &[usize], n: usize) -> bool {
    if ordering.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &idx in ordering {
        if idx >= n || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

/// Navigation target for prev/next links in a page plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub title: String,
    pub file_name: String,
}

/// One planned chapter, derived deterministically from the ordering.
///
/// `number` is the 1-based position in the ordering; prev/next point at
/// adjacent *plan positions*, never at raw component indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePlanEntry {
    pub component_index: usize,
    pub number: usize,
    pub title: String,
    pub file_name: String,
    pub prev: Option<PageRef>,
    pub next: Option<PageRef>,
}

impl PagePlanEntry {
    pub fn as_ref(&self) -> PageRef {
        PageRef {
            title: self.title.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

/// Replace every non-alphanumeric character with `_` and lower-case.
///
/// Idempotent: sanitizing an already-sanitized name is a no-op.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

/// Chapter file name for position `i` (0-based) in the ordering.
pub fn chapter_file_name(position: usize, component_name: &str) -> String {
    format!("{:02}_{}.md", position + 1, sanitize_name(component_name))
}
