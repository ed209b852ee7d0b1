use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::dispatch::{extract_text, route, Route};
use crate::document::DocumentKind;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Re-extract files whose text output already exists.
    #[serde(default)]
    pub replace_existing: bool,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub skipped_existing: Vec<PathBuf>,
    pub empty: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processed_count(&self) -> usize {
        self.written.len() + self.skipped_existing.len() + self.empty.len() + self.failed.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// Files to process. A directory contributes every `.xml` file below it,
/// then every `.html` file; anything else is read as a list of paths.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut xml = Vec::new();
        let mut html = Vec::new();
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(std::io::Error::other(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match DocumentKind::from_path(entry.path()) {
                Some(DocumentKind::Xml) => xml.push(entry.into_path()),
                Some(DocumentKind::Html) => html.push(entry.into_path()),
                None => {}
            }
        }
        xml.extend(html);
        return Ok(xml);
    }

    let list = std::fs::read_to_string(input)?;
    Ok(list
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Output name of an input file: its file name without the extension.
pub fn output_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy().trim().to_string();
    if stem.is_empty() {
        None
    } else {
        Some(stem)
    }
}

/// Names of the text files already present below `output_dir`.
pub fn existing_outputs(output_dir: &Path) -> HashSet<String> {
    WalkDir::new(output_dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
        .filter_map(|e| output_name(e.path()))
        .collect()
}

/// Extracts every input into `<output_dir>/<name>.txt`. Empty results are
/// not written, and a failing file never stops the batch.
pub fn run(inputs: &[PathBuf], output_dir: &Path, options: BatchOptions) -> BatchReport {
    let existing = if options.replace_existing {
        HashSet::new()
    } else {
        existing_outputs(output_dir)
    };
    let mut report = BatchReport::new();

    for (i, path) in inputs.iter().enumerate() {
        let Some(name) = output_name(path) else {
            report.empty.push(path.clone());
            continue;
        };

        if existing.contains(&name) {
            tracing::debug!(path = %path.display(), "text already extracted");
            report.skipped_existing.push(path.clone());
            continue;
        }

        if let Route::Extract(kind) = route(path) {
            tracing::info!(
                cellar_id = %cellar_id(path),
                file = %name,
                %kind,
                progress = i + 1,
                total = inputs.len(),
                "processing file"
            );
        }

        match process_one(path, output_dir, &name) {
            Ok(Some(out)) => report.written.push(out),
            Ok(None) => report.empty.push(path.clone()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "extraction failed");
                report.failed.push((path.clone(), e));
            }
        }
    }

    report
}

fn process_one(path: &Path, output_dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    if matches!(route(path), Route::Skip(_)) {
        return Ok(None);
    }

    let data = std::fs::read(path)?;
    let text = extract_text(path, &data)?;
    if text.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(output_dir)?;
    let out = output_dir.join(format!("{name}.txt"));
    std::fs::write(&out, text)?;
    Ok(Some(out))
}

/// Downloads are stored as `<cellar id>/<file>`.
fn cellar_id(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
