use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::sparql::SparqlResults;

/// Column (and SPARQL variable) holding document URIs in query results.
pub const CELLAR_URI_COLUMN: &str = "cellarURIs";

/// Opaque identifier of a CELLAR work, the last segment of its URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellarId(String);

impl CellarId {
    pub fn from_uri(uri: &str) -> Option<Self> {
        let id = uri.trim().rsplit('/').next()?.trim();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn ids_from_sparql_results(results: &SparqlResults) -> Vec<CellarId> {
    results
        .values(CELLAR_URI_COLUMN)
        .filter_map(CellarId::from_uri)
        .collect()
}

/// Ids from a CSV export of query results, located by its header row.
pub fn ids_from_csv(text: &str) -> Result<Vec<CellarId>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let column = reader
        .headers()?
        .iter()
        .position(|field| field.trim() == CELLAR_URI_COLUMN)
        .ok_or_else(|| Error::InvalidIdList(format!("no {CELLAR_URI_COLUMN} column")))?;

    let mut ids = Vec::new();
    for record in reader.records() {
        if let Some(id) = record?.get(column).and_then(CellarId::from_uri) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Ids from a plain list: one URI or id per line, anything after the
/// first comma ignored. A `cellarURIs` header line is tolerated.
pub fn ids_from_list(text: &str) -> Vec<CellarId> {
    text.lines()
        .filter_map(|line| line.split(',').next())
        .filter(|field| field.trim() != CELLAR_URI_COLUMN)
        .filter_map(CellarId::from_uri)
        .collect()
}

pub fn read_id_list(path: &Path) -> Result<Vec<CellarId>> {
    let text = std::fs::read_to_string(path)?;
    Ok(ids_from_list(&text))
}

/// One id per line, no trailing newline.
pub fn write_id_list(path: &Path, ids: &[CellarId]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = ids
        .iter()
        .map(CellarId::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    std::fs::write(path, body)?;
    Ok(())
}

/// Drops repeated ids, keeping the first occurrence.
pub fn dedup_ids(ids: impl IntoIterator<Item = CellarId>) -> Vec<CellarId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Ids that have no download directory yet.
pub fn pending_ids(ids: impl IntoIterator<Item = CellarId>, download_dir: &Path) -> Vec<CellarId> {
    dedup_ids(ids)
        .into_iter()
        .filter(|id| !download_dir.join(id.as_str()).is_dir())
        .collect()
}
