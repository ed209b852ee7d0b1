use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};
use cellar_core::ids::{pending_ids, read_id_list};
use cellar_core::{fetch_all, FetchConfig, HttpDocumentSource};

pub fn run(ids_file: &Path, download_dir: &Path, failed: Option<&Path>) -> Result<()> {
    if !ids_file.is_file() {
        bail!("id list not found: {}", ids_file.display());
    }

    let ids = read_id_list(ids_file)?;
    let pending = pending_ids(ids, download_dir);
    eprintln!("{} id(s) to download", pending.len());
    if pending.is_empty() {
        return Ok(());
    }

    let source = HttpDocumentSource::new(&FetchConfig::from_env())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(fetch_all(&source, &pending, download_dir));

    eprintln!("Archives: {}", report.archives.len());
    eprintln!("Single files: {}", report.singles.len());
    eprintln!("Failed: {}", report.failure_count());
    for (id, e) in &report.failed {
        eprintln!("  {id}: {e}");
    }

    if let Some(path) = failed.filter(|_| report.failure_count() > 0) {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        for id in report.failed_ids() {
            writeln!(file, "{id}")?;
        }
    }

    Ok(())
}
