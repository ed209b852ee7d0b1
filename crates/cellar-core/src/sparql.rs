use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::FetchConfig;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Debug, Error)]
pub enum SparqlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("Endpoint returned status {0}")]
    Status(u16),
}

pub type SparqlResult<T> = Result<T, SparqlError>;

/// `application/sparql-results+json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: SparqlHead,
    #[serde(default)]
    pub results: SparqlBindings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlBindings {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlTerm {
    #[serde(rename = "type")]
    pub term_type: String,
    pub value: String,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl SparqlResults {
    /// Values bound to `var`, in result order; unbound rows are skipped.
    pub fn values<'a>(&'a self, var: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.results
            .bindings
            .iter()
            .filter_map(move |row| row.get(var).map(|term| term.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.results.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.bindings.is_empty()
    }
}

/// Sends caller-supplied queries to a SPARQL endpoint, unmodified.
pub struct SparqlClient {
    client: Client,
    endpoint: Url,
}

impl SparqlClient {
    pub fn new(config: &FetchConfig) -> SparqlResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)));
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: Url::parse(&config.sparql_endpoint)?,
        })
    }

    pub async fn query(&self, query: &str) -> SparqlResult<SparqlResults> {
        tracing::info!(endpoint = %self.endpoint, "sending SPARQL query");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SparqlError::Status(status.as_u16()));
        }

        let results: SparqlResults = response.json().await?;
        tracing::info!(rows = results.len(), "SPARQL query returned");
        Ok(results)
    }
}
