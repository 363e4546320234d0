//! Run-scoped pipeline state
//!
//! One `PipelineState` is created per run and threaded through every stage.
//! Stages only ever append; nothing written by an earlier stage is mutated
//! by a later one. Generated pages live in an append-only [`PageLog`] so
//! each loop iteration can see all prior chapters in generation order.

use crate::core::model::{Component, FileRecord, PagePlanEntry, Relationship};

/// Append-only log of generated chapter contents.
///
/// Append is the only mutating operation; order equals generation order,
/// which equals the component ordering.
#[derive(Debug, Default, Clone)]
pub struct PageLog {
    pages: Vec<String>,
}

impl PageLog {
    pub fn append(&mut self, page: String) {
        self.pages.push(page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.pages.get(position).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|s| s.as_str())
    }

    /// All prior pages joined with the separator used in generation prompts.
    pub fn joined(&self, separator: &str) -> String {
        self.pages.join(separator)
    }
}

/// Aggregate state for one documentation run.
#[derive(Debug, Default)]
pub struct PipelineState {
    pub files: Vec<FileRecord>,
    pub components: Vec<Component>,
    pub overview: String,
    pub relationships: Vec<Relationship>,
    /// Presentation order over component indices; a validated permutation.
    pub ordering: Vec<usize>,
    pub plan: Vec<PagePlanEntry>,
    /// Rendered table of contents shared by every page prompt.
    pub toc: String,
    pub pages: PageLog,
    /// Loop cursor into `plan`; only ever incremented.
    pub pages_processed: usize,
}

impl PipelineState {
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    /// Bounds-checked file lookup; service-provided indices may be invalid.
    pub fn file(&self, index: usize) -> Option<&FileRecord> {
        self.files.get(index)
    }

    /// Bounds-checked component lookup.
    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn pages_planned(&self) -> usize {
        self.plan.len()
    }

    /// True while the page loop has entries left to process.
    pub fn has_remaining_pages(&self) -> bool {
        self.pages_processed < self.plan.len()
    }
}
