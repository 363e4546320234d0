//! Core module - data model, configuration, state and the response cache

pub mod cache;
pub mod config;
pub mod model;
pub mod state;

pub use cache::{fingerprint, CacheError, ResponseCache};
pub use config::{RunConfig, MIN_COMPONENTS};
pub use model::{
    chapter_file_name, is_permutation, sanitize_name, Component, ComponentSet, FileRecord,
    OrderedComponents, PagePlanEntry, PageRef, Relationship, RelationshipAnalysis,
};
pub use state::{PageLog, PipelineState};
