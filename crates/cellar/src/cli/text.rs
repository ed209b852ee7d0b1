use std::path::Path;

use anyhow::{bail, Result};
use cellar_core::{extract_file, route, Route};

pub fn run(file: &Path) -> Result<()> {
    if !file.is_file() {
        bail!("file not found: {}", file.display());
    }
    if let Route::Skip(reason) = route(file) {
        eprintln!("Skipped: {} ({reason:?})", file.display());
        return Ok(());
    }

    let text = extract_file(file)?;
    if text.is_empty() {
        eprintln!("No text extracted from {}", file.display());
    } else {
        println!("{text}");
    }
    Ok(())
}
