use anyhow::Result;
use clap::Parser;

use cellar::cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch(cli.command)
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Extract {
            input,
            output_dir,
            replace_existing,
        } => cellar::cli::extract::run(&input, &output_dir, replace_existing),
        Commands::Text { file } => cellar::cli::text::run(&file),
        Commands::Ids {
            query,
            csv,
            save_results,
            output,
        } => cellar::cli::ids::run(
            query.as_deref(),
            csv.as_deref(),
            save_results.as_deref(),
            output.as_deref(),
        ),
        Commands::Fetch {
            ids,
            download_dir,
            failed,
        } => cellar::cli::fetch::run(&ids, &download_dir, failed.as_deref()),
    }
}
