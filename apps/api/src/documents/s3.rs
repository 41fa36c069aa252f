use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::debug;

use super::{DocumentFetcher, DocumentRef, FetchError};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Fetches resume documents with `GetObject`, converting PDFs to text.
#[derive(Clone)]
pub struct S3DocumentFetcher {
    client: S3Client,
}

impl S3DocumentFetcher {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for S3DocumentFetcher {
    async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError> {
        let output = self
            .client
            .get_object()
            .bucket(&document.container)
            .key(&document.object_path)
            .send()
            .await
            .map_err(|e| classify_get_error(document, e))?;

        let is_pdf = document.is_pdf() || output.content_type() == Some(PDF_CONTENT_TYPE);

        let body: Bytes = output
            .body
            .collect()
            .await
            .map_err(|e| FetchError::TransientIo(format!("reading {document}: {e}")))?
            .into_bytes();

        debug!("Fetched {} bytes from {}", body.len(), document);

        decode_text(document, body, is_pdf).await
    }
}

fn classify_get_error(document: &DocumentRef, err: SdkError<GetObjectError>) -> FetchError {
    if err
        .as_service_error()
        .map(GetObjectError::is_no_such_key)
        .unwrap_or(false)
    {
        return FetchError::NotFound(document.to_string());
    }
    match err.raw_response().map(|r| r.status().as_u16()) {
        Some(404) => FetchError::NotFound(document.to_string()),
        Some(403) => FetchError::AccessDenied(document.to_string()),
        _ => FetchError::TransientIo(format!("fetching {document}: {err}")),
    }
}

async fn decode_text(document: &DocumentRef, body: Bytes, is_pdf: bool) -> Result<String, FetchError> {
    let unreadable = |reason: String| FetchError::Unreadable {
        reference: document.to_string(),
        reason,
    };
    if !is_pdf {
        return String::from_utf8(body.to_vec()).map_err(|e| unreadable(e.to_string()));
    }

    // CPU-bound and may panic on malformed fonts; a panic surfaces as a JoinError.
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&body))
        .await
        .map_err(|e| unreadable(format!("pdf extraction aborted: {e}")))?
        .map_err(|e| unreadable(e.to_string()))
}
