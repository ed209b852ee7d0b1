use serde::{Deserialize, Serialize};

pub const DEFAULT_RESOURCE_BASE: &str = "http://publications.europa.eu/resource/cellar/";
pub const DEFAULT_SPARQL_ENDPOINT: &str = "http://publications.europa.eu/webapi/rdf/sparql";

/// Content negotiation list understood by the CELLAR resource service,
/// most structured representation first.
pub const DEFAULT_ACCEPT: &str = "application/zip;mtype=fmx4, application/xml;mtype=fmx4, \
    application/xhtml+xml, text/html, text/html;type=simplified, application/msword, \
    text/plain, application/xml;notice=object";

/// Settings for talking to the CELLAR services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URI that document ids are appended to
    pub resource_base: String,
    /// SPARQL endpoint receiving metadata queries
    pub sparql_endpoint: String,
    /// `Accept` header sent with document requests
    pub accept: String,
    /// `Accept-Language` header sent with document requests
    pub accept_language: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u32,
    #[serde(default)]
    pub user_agent: Option<String>,
}

const fn default_timeout() -> u32 {
    120
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            resource_base: DEFAULT_RESOURCE_BASE.to_string(),
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: "eng".to_string(),
            request_timeout_seconds: default_timeout(),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `CELLAR_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            resource_base: lookup("CELLAR_RESOURCE_BASE").unwrap_or(defaults.resource_base),
            sparql_endpoint: lookup("CELLAR_SPARQL_ENDPOINT").unwrap_or(defaults.sparql_endpoint),
            accept: defaults.accept,
            accept_language: lookup("CELLAR_LANGUAGE").unwrap_or(defaults.accept_language),
            request_timeout_seconds: lookup("CELLAR_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
            user_agent: lookup("CELLAR_USER_AGENT").or(defaults.user_agent),
        }
    }
}
