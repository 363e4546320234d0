//! Relationship stage - overview text and a directed component graph
//!
//! Prompt context holds every component summary plus the content of every
//! file any component references, deduplicated and sorted by index so the
//! context (and therefore the cache fingerprint) is deterministic.
//! Relationship indices come back unfiltered; renderers bounds-check them.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::core::{PipelineState, RelationshipAnalysis, RunConfig};
use crate::llm::{AnalysisClient, AnalysisRequest};
use crate::prompt::PromptSet;
use crate::schema::{SchemaRegistry, StageSchema};

use super::{PipelineError, Stage};

const STAGE: Stage = Stage::Relationship;

pub fn run(
    state: &mut PipelineState,
    config: &RunConfig,
    client: &dyn AnalysisClient,
    prompts: &PromptSet,
    schemas: &SchemaRegistry,
) -> Result<(), PipelineError> {
    let mut component_context = String::from("Identified Components or Abstractions:\n");
    let mut component_listing = String::new();
    let mut referenced: BTreeSet<usize> = BTreeSet::new();

    for (i, component) in state.components.iter().enumerate() {
        let indices = component
            .file_indices
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            component_context,
            "- Index {i}: {} (Relevant file indices: [{indices}])\n    Description: {}",
            component.name, component.description
        );
        let _ = writeln!(component_listing, "- {i} # {}", component.name);
        referenced.extend(component.file_indices.iter().copied());
    }

    component_context.push_str("Relevant File Snippets referenced by index and path:\n");
    for index in referenced {
        // Out-of-range indices from the service are skipped, not fatal.
        if let Some(file) = state.file(index) {
            let _ = write!(component_context, "\n\n- {index} # {}\n{}", file.path, file.content);
        }
    }

    let context = prompts
        .relationships(&config.project_name, &component_listing, &component_context)
        .map_err(|source| PipelineError::Prompt { stage: STAGE, source })?;

    let schema = schemas
        .get(StageSchema::Relationships)
        .map_err(|source| PipelineError::Response { stage: STAGE, source })?;

    let body = client
        .invoke(&AnalysisRequest::structured(&context, schema))
        .map_err(|source| PipelineError::Service { stage: STAGE, source })?;

    let analysis: RelationshipAnalysis = schema
        .parse(&body)
        .map_err(|source| PipelineError::Response { stage: STAGE, source })?;

    state.overview = analysis.overview;
    state.relationships = analysis.relationships;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Component, FileRecord};
    use crate::llm::MockClient;

    #[test]
    fn stores_overview_and_relationships_unfiltered() {
        let config = RunConfig::new("demo", 5, "docs".into());
        let prompts = PromptSet::new().unwrap();
        let schemas = SchemaRegistry::new();

        let mut state = PipelineState::new(vec![FileRecord::new("a.py", "print(1)")]);
        state.components = vec![Component {
            name: "Entry".into(),
            description: "d".into(),
            // 99 is out of range; context building must tolerate it.
            file_indices: vec![0, 99],
        }];

        let mock = MockClient::with_responses(vec![
            r#"{"overview":"A **demo**","relationships":[{"from_component":0,"to_component":7,"label":"uses"}]}"#
                .into(),
        ]);

        run(&mut state, &config, &mock, &prompts, &schemas).unwrap();
        assert_eq!(state.overview, "A **demo**");
        // Kept even though the target index is out of range.
        assert_eq!(state.relationships.len(), 1);
        assert_eq!(state.relationships[0].to, 7);
    }
}
