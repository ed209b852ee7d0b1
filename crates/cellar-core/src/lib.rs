#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod ids;
pub mod markup;
pub mod normalize;
pub mod sparql;

pub use batch::{BatchOptions, BatchReport};
pub use config::FetchConfig;
pub use dispatch::{extract_document, extract_file, extract_text, route, Route, SkipReason};
pub use document::{Document, DocumentKind};
pub use error::{Error, Result};
pub use extract::{extract_html, extract_xml, html_to_text, xml_to_text};
pub use fetch::{
    fetch_all, store_download, Download, DocumentSource, FetchError, FetchReport,
    HttpDocumentSource, Stored,
};
pub use ids::CellarId;
pub use markup::{load, Node, NodeData, NodeId, NodeKind, ParseError, ParseResult, Tree};
pub use normalize::{normalize, Profile};
pub use sparql::{SparqlClient, SparqlError, SparqlResults};
