use std::path::Path;

use anyhow::{bail, Result};
use cellar_core::batch::{self, BatchOptions};

pub fn run(input: &Path, output_dir: &Path, replace_existing: bool) -> Result<()> {
    if !input.exists() {
        bail!("input not found: {}", input.display());
    }

    let inputs = batch::collect_inputs(input)?;
    tracing::debug!(input = %input.display(), output = %output_dir.display(), "collected inputs");
    eprintln!("Found {} file(s) to process", inputs.len());

    let report = batch::run(&inputs, output_dir, BatchOptions { replace_existing });

    eprintln!("Written: {}", report.written.len());
    eprintln!("Already extracted: {}", report.skipped_existing.len());
    eprintln!("No text: {}", report.empty.len());
    eprintln!("Failed: {}", report.failure_count());
    for (path, e) in &report.failed {
        eprintln!("  {}: {e}", path.display());
    }

    Ok(())
}
