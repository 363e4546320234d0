//! Segregation stage - derive components from the file collection
//!
//! One schema-constrained call over the full codebase context. The
//! returned file indices are deduplicated but deliberately not
//! range-checked here; downstream consumers bounds-check every lookup.

use std::fmt::Write as _;

use crate::core::{ComponentSet, PipelineState, RunConfig};
use crate::llm::{AnalysisClient, AnalysisRequest};
use crate::prompt::PromptSet;
use crate::schema::{SchemaRegistry, StageSchema};

use super::{PipelineError, Stage};

const STAGE: Stage = Stage::Segregation;

pub fn run(
    state: &mut PipelineState,
    config: &RunConfig,
    client: &dyn AnalysisClient,
    prompts: &PromptSet,
    schemas: &SchemaRegistry,
) -> Result<(), PipelineError> {
    let mut file_context = String::new();
    let mut file_listing = String::new();
    for (i, file) in state.files.iter().enumerate() {
        let _ = writeln!(
            file_context,
            "--- File Index {i}: path: {} ---\n{}\n",
            file.path, file.content
        );
        let _ = writeln!(file_listing, "- {i} # {}", file.path);
    }

    let context = prompts
        .segregation(
            &config.project_name,
            config.max_components,
            &file_context,
            &file_listing,
        )
        .map_err(|source| PipelineError::Prompt { stage: STAGE, source })?;

    let schema = schemas
        .get(StageSchema::Components)
        .map_err(|source| PipelineError::Response { stage: STAGE, source })?;

    let body = client
        .invoke(&AnalysisRequest::structured(&context, schema))
        .map_err(|source| PipelineError::Service { stage: STAGE, source })?;

    let mut set: ComponentSet = schema
        .parse(&body)
        .map_err(|source| PipelineError::Response { stage: STAGE, source })?;

    for component in &mut set.components {
        component.dedup_file_indices();
    }
    state.components = set.components;
    Ok(())
}
