//! Ordering stage - presentation order over component indices
//!
//! The service is asked for a permutation of `0..n`. That property is
//! validated locally: anything else (wrong length, repeats, out-of-range
//! entries) is replaced with the identity ordering and a warning, rather
//! than truncating chapters or crashing downstream.

use std::fmt::Write as _;

use console::style;

use crate::core::{is_permutation, OrderedComponents, PipelineState, RunConfig};
use crate::llm::{AnalysisClient, AnalysisRequest};
use crate::prompt::PromptSet;
use crate::schema::{SchemaRegistry, StageSchema};

use super::{PipelineError, Stage};

const STAGE: Stage = Stage::Ordering;

pub fn run(
    state: &mut PipelineState,
    config: &RunConfig,
    client: &dyn AnalysisClient,
    prompts: &PromptSet,
    schemas: &SchemaRegistry,
) -> Result<(), PipelineError> {
    let components_list = state
        .components
        .iter()
        .enumerate()
        .map(|(i, c)| format!("- {i} # {}", c.name))
        .collect::<Vec<_>>()
        .join("\n");

    let mut relationships_list = String::new();
    for rel in &state.relationships {
        // Edges with invalid endpoints are left out of the narrative.
        let (Some(from), Some(to)) = (state.component(rel.from), state.component(rel.to)) else {
            continue;
        };
        let _ = writeln!(
            relationships_list,
            "- from {} to {}: ({})",
            from.name, to.name, rel.label
        );
    }

    let context = prompts
        .ordering(
            &config.project_name,
            &components_list,
            &state.overview,
            &relationships_list,
        )
        .map_err(|source| PipelineError::Prompt { stage: STAGE, source })?;

    let schema = schemas
        .get(StageSchema::Ordering)
        .map_err(|source| PipelineError::Response { stage: STAGE, source })?;

    let body = client
        .invoke(&AnalysisRequest::structured(&context, schema))
        .map_err(|source| PipelineError::Service { stage: STAGE, source })?;

    let ordered: OrderedComponents = schema
        .parse(&body)
        .map_err(|source| PipelineError::Response { stage: STAGE, source })?;

    let n = state.components.len();
    state.ordering = if is_permutation(&ordered.ordered_components, n) {
        ordered.ordered_components
    } else {
        println!(
            "{} service returned an invalid ordering {:?}; falling back to identity",
            style("⚠").yellow(),
            ordered.ordered_components
        );
        (0..n).collect()
    };
    Ok(())
}
