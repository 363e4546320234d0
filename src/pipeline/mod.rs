//! Pipeline orchestrator
//!
//! Sequences the analysis passes over one [`PipelineState`]: segregation,
//! relationship analysis, ordering, planning, then the page loop (one
//! service call per planned page, each seeing every previously generated
//! page), and finally assembly, which is the only stage that touches the
//! file system. Control flow is strictly linear apart from the page loop's
//! back edge; data only flows forward.

pub mod assemble;
pub mod order;
pub mod pages;
pub mod plan;
pub mod relate;
pub mod segregate;

use console::style;
use thiserror::Error;

use crate::core::{FileRecord, PipelineState, RunConfig};
use crate::llm::{AnalysisClient, ClientError};
use crate::prompt::{PromptError, PromptSet};
use crate::schema::{SchemaError, SchemaRegistry};

pub use assemble::AssemblyReport;

/// The stages a run moves through, in order. Used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Segregation,
    Relationship,
    Ordering,
    Planning,
    PageGeneration,
    Assembly,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Segregation => "segregation",
            Stage::Relationship => "relationship",
            Stage::Ordering => "ordering",
            Stage::Planning => "planning",
            Stage::PageGeneration => "page generation",
            Stage::Assembly => "assembly",
        };
        f.write_str(name)
    }
}

/// Fatal pipeline failures, attributed to the stage that raised them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("prompt templates unavailable: {0}")]
    Init(PromptError),

    #[error("{stage} stage: analysis call failed: {source}")]
    Service { stage: Stage, source: ClientError },

    #[error("{stage} stage: unusable response: {source}")]
    Response { stage: Stage, source: SchemaError },

    #[error("{stage} stage: prompt rendering failed: {source}")]
    Prompt { stage: Stage, source: PromptError },

    #[error("assembly stage: could not write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Everything a finished run leaves behind.
#[derive(Debug)]
pub struct RunOutcome {
    pub state: PipelineState,
    pub report: AssemblyReport,
}

/// The documentation pipeline over an injected analysis client.
pub struct Pipeline<'a> {
    client: &'a dyn AnalysisClient,
    config: &'a RunConfig,
    prompts: PromptSet,
    schemas: SchemaRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a dyn AnalysisClient, config: &'a RunConfig) -> Result<Self, PipelineError> {
        let prompts = PromptSet::new().map_err(PipelineError::Init)?;
        Ok(Self {
            client,
            config,
            prompts,
            schemas: SchemaRegistry::new(),
        })
    }

    /// Run every stage over `files` and write the document set.
    pub fn run(&self, files: Vec<FileRecord>) -> Result<RunOutcome, PipelineError> {
        let mut state = PipelineState::new(files);

        println!("{} Identifying components...", style("→").blue());
        segregate::run(&mut state, self.config, self.client, &self.prompts, &self.schemas)?;
        println!(
            "{} {} component(s) identified",
            style("✓").green(),
            state.components.len()
        );

        println!("{} Analysing relationships...", style("→").blue());
        relate::run(&mut state, self.config, self.client, &self.prompts, &self.schemas)?;
        println!(
            "{} {} relationship(s) found",
            style("✓").green(),
            state.relationships.len()
        );

        println!("{} Ordering chapters...", style("→").blue());
        order::run(&mut state, self.config, self.client, &self.prompts, &self.schemas)?;

        plan::run(&mut state);

        // Page loop: one synchronous call per planned page. Iterations are
        // inherently sequential, each prompt embeds all prior pages.
        while state.has_remaining_pages() {
            let position = state.pages_processed;
            println!(
                "{} Writing chapter {}/{}...",
                style("→").blue(),
                position + 1,
                state.pages_planned()
            );
            pages::process_next(&mut state, self.config, self.client, &self.prompts)?;
        }

        let report = assemble::write(&state, self.config)?;
        Ok(RunOutcome { state, report })
    }
}
