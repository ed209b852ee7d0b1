use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::markup::{ParseError, ParseResult};

/// Markup dialect of a CELLAR file, decided once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Xml,
    Html,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xml" => Some(Self::Xml),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xml => "XML",
            Self::Html => "HTML",
        })
    }
}

/// Formex notices (`.doc.`) and tables of contents (`.toc.`) carry only
/// metadata and never produce text.
pub fn is_metadata_path(path: &Path) -> bool {
    let path = path.to_string_lossy();
    path.contains(".doc.") || path.contains(".toc.")
}

/// Raw content of one downloaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    kind: DocumentKind,
    content: String,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: DocumentKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
        }
    }

    pub fn from_bytes(id: impl Into<String>, kind: DocumentKind, data: &[u8]) -> ParseResult<Self> {
        let id = id.into();
        let content = String::from_utf8(data.to_vec())
            .map_err(|e| ParseError::Encoding(format!("{id}: {e}")))?;
        Ok(Self { id, kind, content })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
