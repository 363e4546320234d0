//! Run configuration
//!
//! Assembled by the CLI from arguments and environment, then treated as
//! read-only by the pipeline.

use std::path::PathBuf;

/// Floor on the component count requested from the analysis service.
pub const MIN_COMPONENTS: usize = 4;

/// Configuration for one documentation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Human-readable project name used in prompts and the index document.
    pub project_name: String,
    /// Ceiling on the number of components to identify (floor is 4).
    pub max_components: usize,
    /// Directory the index and chapter files are written to.
    pub output_dir: PathBuf,
}

impl RunConfig {
    pub fn new(project_name: impl Into<String>, max_components: usize, output_dir: PathBuf) -> Self {
        Self {
            project_name: project_name.into(),
            max_components: max_components.max(MIN_COMPONENTS),
            output_dir,
        }
    }
}
