//! Top-level CLI argument types

use clap::{Parser, Subcommand};

use super::commands::{cache::CacheArgs, generate::GenerateArgs};

/// Docent - generate beginner-friendly tutorial documentation for any
/// codebase with an LLM analysis pipeline.
#[derive(Parser, Debug)]
#[command(name = "docent", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse a project directory and generate its tutorial
    Generate(GenerateArgs),

    /// Inspect or clear the shared response cache
    Cache(CacheArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Maintenance actions over the response cache.
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the number of cached responses and the table location
    Stats,
    /// Remove every cached response
    Clear,
}
