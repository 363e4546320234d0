//! `docent generate` command - run the documentation pipeline

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::core::{FileRecord, ResponseCache, RunConfig};
use crate::extract::{self, ExtractOptions};
use crate::llm::{AnalysisClient, CachedClient, ClientConfig, OpenAiClient};
use crate::pipeline::{Pipeline, RunOutcome};

use super::cache::default_cache_db;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Path to the project directory to analyse
    pub directory: PathBuf,

    /// Name of the project (defaults to the directory name)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Maximum number of components to identify (minimum 4)
    #[arg(long, default_value_t = 5)]
    pub max_components: usize,

    /// Base output directory; documents land in a per-project subdirectory
    #[arg(long, short = 'o', default_value = "docs")]
    pub output: PathBuf,

    /// Only extract files matching these globs (e.g. '**/*.py')
    #[arg(long = "include", value_name = "GLOB")]
    pub include: Vec<String>,

    /// Skip files matching these globs (e.g. 'vendor/**')
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Maximum file size in bytes to extract
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Disable the response cache for this run
    #[arg(long)]
    pub no_cache: bool,

    /// Response cache database (defaults to the user cache directory)
    #[arg(long, value_name = "FILE")]
    pub cache_db: Option<PathBuf>,

    /// Model identifier sent to the analysis service
    #[arg(long, default_value = "gemini-2.5-flash-lite-preview-06-17")]
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(
        long,
        default_value = "https://generativelanguage.googleapis.com/v1beta/openai"
    )]
    pub base_url: String,

    /// API key for the analysis service
    #[arg(long, env = "DOCENT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let project_name = match &args.project_name {
        Some(name) => name.clone(),
        None => args
            .directory
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "project".to_string()),
    };

    println!(
        "{} Docent - analysing: {}",
        style("→").blue(),
        style(&project_name).bold()
    );

    let options = ExtractOptions {
        include: args.include.clone(),
        exclude: args.exclude.clone(),
        max_file_size: args.max_file_size,
    };
    let files: Vec<FileRecord> = extract::extract(&args.directory, &options)
        .map_err(|e| miette::miette!("{e}"))?;
    println!("{} Extracted {} file(s)", style("✓").green(), files.len());

    if files.is_empty() {
        return Err(miette::miette!(
            "no files were extracted from {}; check your include/exclude patterns",
            args.directory.display()
        ));
    }

    let config = RunConfig::new(
        project_name.clone(),
        args.max_components,
        args.output.join(&project_name),
    );
    let client = OpenAiClient::new(ClientConfig {
        base_url: args.base_url.clone(),
        model: args.model.clone(),
        api_key: args.api_key.clone(),
        ..ClientConfig::default()
    });

    let outcome = if args.no_cache {
        run_pipeline(&client, &config, files)?
    } else {
        let cache_db = args.cache_db.clone().unwrap_or_else(default_cache_db);
        let cached = CachedClient::new(client, ResponseCache::at(cache_db));
        run_pipeline(&cached, &config, files)?
    };

    println!(
        "{} Documentation generated in {}",
        style("✓").green(),
        config.output_dir.display()
    );
    println!(
        "  {} component(s), {} chapter(s) written",
        outcome.state.components.len(),
        outcome.report.chapter_paths.len()
    );
    if outcome.report.skipped > 0 {
        println!(
            "{} {} chapter position(s) skipped due to inconsistent analysis output",
            style("⚠").yellow(),
            outcome.report.skipped
        );
    }
    Ok(())
}

fn run_pipeline(
    client: &dyn AnalysisClient,
    config: &RunConfig,
    files: Vec<FileRecord>,
) -> Result<RunOutcome> {
    let pipeline = Pipeline::new(client, config).map_err(|e| miette::miette!("{e}"))?;
    pipeline.run(files).map_err(|e| miette::miette!("{e}"))
}
