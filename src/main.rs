use clap::Parser;
use miette::Result;
use docent::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for readable diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => docent::cli::commands::generate::run(args),
        Commands::Cache(args) => docent::cli::commands::cache::run(args),
        Commands::Completions { shell } => docent::cli::commands::completions::run(shell),
    }
}
