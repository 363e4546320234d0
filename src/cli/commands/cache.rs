//! `docent cache` command - response cache maintenance

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::CacheAction;
use crate::core::ResponseCache;

#[derive(clap::Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,

    /// Response cache database (defaults to the user cache directory)
    #[arg(long, value_name = "FILE", global = true)]
    pub cache_db: Option<PathBuf>,
}

/// Default location of the shared response cache table.
pub fn default_cache_db() -> PathBuf {
    directories::ProjectDirs::from("", "", "docent")
        .map(|dirs| dirs.cache_dir().join("responses.db"))
        .unwrap_or_else(|| PathBuf::from(".docent_cache.db"))
}

pub fn run(args: CacheArgs) -> Result<()> {
    let path = args.cache_db.unwrap_or_else(default_cache_db);
    let cache = ResponseCache::at(&path);

    match args.action {
        CacheAction::Stats => {
            let count = cache
                .len()
                .map_err(|e| miette::miette!("could not read cache: {e}"))?;
            println!("{} {}", style("Cache table:").bold(), path.display());
            println!("{} {}", style("Cached responses:").bold(), count);
        }
        CacheAction::Clear => {
            let removed = cache
                .clear()
                .map_err(|e| miette::miette!("could not clear cache: {e}"))?;
            println!(
                "{} Removed {} cached response(s)",
                style("✓").green(),
                removed
            );
        }
    }
    Ok(())
}
