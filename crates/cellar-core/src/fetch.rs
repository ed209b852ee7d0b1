use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::Client;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::FetchConfig;
use crate::ids::CellarId;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("No content type in response for {0}")]
    MissingContentType(CellarId),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Body of one document request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Download {
    pub fn is_zip(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("zip"))
    }
}

/// Where documents come from. The HTTP implementation talks to CELLAR;
/// tests substitute their own.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn get(&self, id: &CellarId) -> FetchResult<Download>;
}

pub struct HttpDocumentSource {
    client: Client,
    base: Url,
    accept: String,
    accept_language: String,
}

impl HttpDocumentSource {
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)));
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua);
        }

        let mut base = config.resource_base.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client: builder.build()?,
            base: Url::parse(&base)?,
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
        })
    }

    pub fn document_url(&self, id: &CellarId) -> FetchResult<Url> {
        Ok(self.base.join(id.as_str())?)
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn get(&self, id: &CellarId) -> FetchResult<Download> {
        let url = self.document_url(id)?;
        tracing::debug!(%url, "requesting document");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, &self.accept)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(Download { content_type, body })
    }
}

/// How a download landed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored {
    /// Archive unpacked into the id directory.
    Archive { dir: PathBuf, entries: usize },
    /// Single representation saved as `<id>/<id>.xml`.
    Single(PathBuf),
}

/// Writes a download below `<download_dir>/<id>/`.
pub fn store_download(download_dir: &Path, id: &CellarId, download: &Download) -> FetchResult<Stored> {
    if download.content_type.is_none() {
        return Err(FetchError::MissingContentType(id.clone()));
    }

    let dir = download_dir.join(id.as_str());
    std::fs::create_dir_all(&dir)?;

    if download.is_zip() {
        let mut archive = zip::ZipArchive::new(Cursor::new(&download.body))?;
        let entries = archive.len();
        archive.extract(&dir)?;
        return Ok(Stored::Archive { dir, entries });
    }

    let path = dir.join(format!("{id}.xml"));
    std::fs::write(&path, &download.body)?;
    Ok(Stored::Single(path))
}

#[derive(Debug, Default)]
pub struct FetchReport {
    pub archives: Vec<CellarId>,
    pub singles: Vec<CellarId>,
    pub failed: Vec<(CellarId, FetchError)>,
}

impl FetchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downloaded_count(&self) -> usize {
        self.archives.len() + self.singles.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn failed_ids(&self) -> Vec<CellarId> {
        self.failed.iter().map(|(id, _)| id.clone()).collect()
    }
}

/// Downloads every id in turn. A failing id is recorded and the run
/// continues with the next one.
pub async fn fetch_all<S>(source: &S, ids: &[CellarId], download_dir: &Path) -> FetchReport
where
    S: DocumentSource + ?Sized,
{
    let mut report = FetchReport::new();

    for (i, id) in ids.iter().enumerate() {
        let result = match source.get(id).await {
            Ok(download) => store_download(download_dir, id, &download),
            Err(e) => Err(e),
        };

        match result {
            Ok(Stored::Archive { entries, .. }) => {
                tracing::info!(cellar_id = %id, entries, progress = i + 1, total = ids.len(), "unpacked archive");
                report.archives.push(id.clone());
            }
            Ok(Stored::Single(path)) => {
                tracing::info!(cellar_id = %id, path = %path.display(), progress = i + 1, total = ids.len(), "saved document");
                report.singles.push(id.clone());
            }
            Err(e) => {
                tracing::warn!(cellar_id = %id, error = %e, "download failed");
                report.failed.push((id.clone(), e));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    struct MockSource {
        responses: HashMap<String, Download>,
    }

    #[async_trait]
    impl DocumentSource for MockSource {
        async fn get(&self, id: &CellarId) -> FetchResult<Download> {
            self.responses
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Io(std::io::Error::other("not found")))
        }
    }

    fn id(s: &str) -> CellarId {
        CellarId::from_uri(s).unwrap()
    }

    fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_is_zip() {
        let download = |ct: Option<&str>| Download {
            content_type: ct.map(str::to_string),
            body: Vec::new(),
        };
        assert!(download(Some("application/zip;mtype=fmx4")).is_zip());
        assert!(!download(Some("application/xml;mtype=fmx4")).is_zip());
        assert!(!download(None).is_zip());
    }

    #[test]
    fn test_document_url() {
        let config = FetchConfig {
            resource_base: "http://localhost/resource/cellar".to_string(),
            ..FetchConfig::default()
        };
        let source = HttpDocumentSource::new(&config).unwrap();
        assert_eq!(
            source.document_url(&id("abc-123")).unwrap().as_str(),
            "http://localhost/resource/cellar/abc-123"
        );
    }

    #[test]
    fn test_store_single() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download {
            content_type: Some("application/xhtml+xml".to_string()),
            body: b"<html/>".to_vec(),
        };
        let stored = store_download(dir.path(), &id("abc"), &download).unwrap();
        let expected = dir.path().join("abc").join("abc.xml");
        assert_eq!(stored, Stored::Single(expected.clone()));
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "<html/>");
    }

    #[test]
    fn test_store_archive() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download {
            content_type: Some("application/zip;mtype=fmx4".to_string()),
            body: zip_bytes(&[
                ("L_2019.01000101.xml", "<ACT/>"),
                ("L_2019.doc.xml", "<DOC/>"),
            ]),
        };
        let stored = store_download(dir.path(), &id("abc"), &download).unwrap();
        assert!(matches!(stored, Stored::Archive { entries: 2, .. }));
        assert!(dir.path().join("abc/L_2019.01000101.xml").is_file());
        assert!(dir.path().join("abc/L_2019.doc.xml").is_file());
    }

    #[test]
    fn test_store_without_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download {
            content_type: None,
            body: b"?".to_vec(),
        };
        let result = store_download(dir.path(), &id("abc"), &download);
        assert!(matches!(result, Err(FetchError::MissingContentType(_))));
        assert!(!dir.path().join("abc").exists());
    }

    #[tokio::test]
    async fn test_fetch_all_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut responses = HashMap::new();
        responses.insert(
            "zipped".to_string(),
            Download {
                content_type: Some("application/zip".to_string()),
                body: zip_bytes(&[("a.xml", "<ACT/>")]),
            },
        );
        responses.insert(
            "single".to_string(),
            Download {
                content_type: Some("text/html".to_string()),
                body: b"<p>x</p>".to_vec(),
            },
        );
        responses.insert(
            "untyped".to_string(),
            Download {
                content_type: None,
                body: Vec::new(),
            },
        );
        let source = MockSource { responses };

        let ids = vec![id("missing"), id("zipped"), id("untyped"), id("single")];
        let report = fetch_all(&source, &ids, dir.path()).await;

        assert_eq!(report.archives, vec![id("zipped")]);
        assert_eq!(report.singles, vec![id("single")]);
        assert_eq!(report.failed_ids(), vec![id("missing"), id("untyped")]);
        assert_eq!(report.downloaded_count(), 2);
        assert!(dir.path().join("zipped/a.xml").is_file());
        assert!(dir.path().join("single/single.xml").is_file());
    }
}
