pub mod extract;
pub mod fetch;
pub mod ids;
pub mod text;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cellar",
    about = "Corpus compiler for EU CELLAR regulatory documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract plain text from downloaded XML and HTML files
    Extract {
        /// Download directory, or a file listing one input path per line
        input: PathBuf,
        /// Directory receiving one .txt file per input
        output_dir: PathBuf,
        /// Re-extract files that already have a text output
        #[arg(short = 'r', long)]
        replace_existing: bool,
    },
    /// Print the extracted text of a single file
    Text {
        /// XML or HTML file
        file: PathBuf,
    },
    /// Build a CELLAR id list from a SPARQL query or a CSV export
    Ids {
        /// SPARQL query file sent verbatim to the endpoint
        #[arg(long, conflicts_with = "csv", required_unless_present = "csv")]
        query: Option<PathBuf>,
        /// CSV export with a cellarURIs column
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Save the raw SPARQL results as JSON
        #[arg(long, requires = "query")]
        save_results: Option<PathBuf>,
        /// Id list to write (default: cellar_ids_<timestamp>.txt)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Download the documents of an id list
    Fetch {
        /// Id list (one id or URI per line)
        ids: PathBuf,
        /// Directory receiving one sub-directory per id
        download_dir: PathBuf,
        /// Append the ids that could not be downloaded to this file
        #[arg(long)]
        failed: Option<PathBuf>,
    },
}
