use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cellar_core::ids::{dedup_ids, ids_from_csv, ids_from_sparql_results, write_id_list};
use cellar_core::{FetchConfig, SparqlClient};
use chrono::Local;

pub fn run(
    query: Option<&Path>,
    csv: Option<&Path>,
    save_results: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let ids = match (query, csv) {
        (Some(query), _) => {
            let query_text = std::fs::read_to_string(query)
                .with_context(|| format!("reading {}", query.display()))?;
            let results = run_query(&query_text)?;
            if let Some(path) = save_results {
                std::fs::write(path, serde_json::to_string_pretty(&results)?)?;
                eprintln!("Saved query results: {}", path.display());
            }
            ids_from_sparql_results(&results)
        }
        (None, Some(csv)) => {
            let text = std::fs::read_to_string(csv)
                .with_context(|| format!("reading {}", csv.display()))?;
            ids_from_csv(&text)?
        }
        (None, None) => bail!("either --query or --csv is required"),
    };

    let ids = dedup_ids(ids);
    let output = output.map_or_else(default_output, Path::to_path_buf);
    write_id_list(&output, &ids)?;

    eprintln!("Wrote {} id(s) to {}", ids.len(), output.display());
    Ok(())
}

fn run_query(query_text: &str) -> Result<cellar_core::SparqlResults> {
    let client = SparqlClient::new(&FetchConfig::from_env())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(client.query(query_text))?)
}

fn default_output() -> PathBuf {
    PathBuf::from(format!(
        "cellar_ids_{}.txt",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}
