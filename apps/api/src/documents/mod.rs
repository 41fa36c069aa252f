//! Document Fetcher: resolves an uploaded resume reference into text.

use async_trait::async_trait;
use thiserror::Error;

pub mod s3;

const S3_SCHEME: &str = "s3://";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Document {0} not found")]
    NotFound(String),

    #[error("Access to document {0} denied")]
    AccessDenied(String),

    #[error("Transient I/O error: {0}")]
    TransientIo(String),

    #[error("Document {reference} could not be read as text: {reason}")]
    Unreadable { reference: String, reason: String },
}

/// Location of a document in the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub container: String,
    pub object_path: String,
}

impl DocumentRef {
    /// Parses `store-root/container/object-path` (or `s3://container/object-path`).
    /// A reference with no scheme is read as `container/object-path`. Links on
    /// any other host, and references where either part is empty, yield `None`.
    pub fn parse(reference: &str, root: &str) -> Option<Self> {
        let reference = reference.trim();
        let rest = match reference
            .strip_prefix(root)
            .or_else(|| reference.strip_prefix(S3_SCHEME))
        {
            Some(rest) => rest,
            None if reference.contains("://") => return None,
            None => reference,
        }
        .trim_start_matches('/');

        let (container, object_path) = rest.split_once('/')?;
        if container.is_empty() || object_path.trim_matches('/').is_empty() {
            return None;
        }
        Some(Self {
            container: container.to_string(),
            object_path: object_path.to_string(),
        })
    }

    pub fn is_pdf(&self) -> bool {
        self.object_path.to_ascii_lowercase().ends_with(".pdf")
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.container, self.object_path)
    }
}

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError>;
}
