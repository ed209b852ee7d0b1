use thiserror::Error;

use crate::fetch::FetchError;
use crate::markup::ParseError;
use crate::sparql::SparqlError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("SPARQL error: {0}")]
    Sparql(#[from] SparqlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid id list: {0}")]
    InvalidIdList(String),
}

pub type Result<T> = std::result::Result<T, Error>;
