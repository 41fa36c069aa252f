//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::documents::{DocumentFetcher, DocumentRef, FetchError};
use crate::generation::generator::{CompletionBackend, GenerationError, SchemaGenerator};
use crate::generation::schema::SchemaKind;
use crate::pipelines::Pipelines;
use crate::store::memory::MemoryStore;
use crate::store::{
    paths, to_fields, CollectionPath, DocPath, Document, DocumentStore, Fields, StoreError,
};

pub const DOCUMENT_ROOT: &str = "https://storage.googleapis.com/";

/// Replays canned responses in order and records every call.
/// Once the script is exhausted each call fails with `GenerationError::Failed`.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, SchemaKind)>>,
}

impl ScriptedBackend {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: impl Into<String>) {
        self.responses.lock().unwrap().push_back(response.into());
    }

    pub fn calls(&self) -> Vec<(String, SchemaKind)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str, schema: SchemaKind) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), schema));
        // Suspend once so concurrent callers interleave between generation and write.
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GenerationError::Failed("generation service unavailable".to_string()))
    }
}

pub enum StaticFetcher {
    Text(String),
    Missing,
    Denied,
}

#[async_trait]
impl DocumentFetcher for StaticFetcher {
    async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError> {
        match self {
            StaticFetcher::Text(text) => Ok(text.clone()),
            StaticFetcher::Missing => Err(FetchError::NotFound(document.to_string())),
            StaticFetcher::Denied => Err(FetchError::AccessDenied(document.to_string())),
        }
    }
}

/// Wraps a store and counts write operations.
pub struct CountingStore<S> {
    inner: S,
    writes: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for CountingStore<S> {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        self.inner.get(path).await
    }

    async fn set_merge(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_merge(path, fields).await
    }

    async fn add_child(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocPath, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.add_child(collection, fields).await
    }

    async fn list_children(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.list_children(collection).await
    }

    async fn replace_children(
        &self,
        collection: &CollectionPath,
        children: Vec<Fields>,
    ) -> Result<Vec<DocPath>, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_children(collection, children).await
    }
}

pub async fn seed_candidate(store: &dyn DocumentStore, candidate_id: &str, skills: &[&str]) -> DocPath {
    let path = paths::candidate(candidate_id);
    store
        .set_merge(
            &path,
            to_fields(&json!({"name": "Test Candidate", "skills": skills})).unwrap(),
        )
        .await
        .unwrap();
    path
}

pub async fn seed_job(store: &dyn DocumentStore, candidate_id: &str, job_id: &str, job: Value) -> DocPath {
    let path = paths::job(&paths::candidate(candidate_id), job_id);
    store.set_merge(&path, to_fields(&job).unwrap()).await.unwrap();
    path
}

/// A full pipeline set over a fresh in-memory store.
pub struct Harness {
    pub store: Arc<CountingStore<MemoryStore>>,
    pub backend: Arc<ScriptedBackend>,
    pub pipelines: Arc<Pipelines>,
}

impl Harness {
    pub fn new(fetcher: StaticFetcher) -> Self {
        let store = Arc::new(CountingStore::new(MemoryStore::new()));
        let backend = Arc::new(ScriptedBackend::default());
        let pipelines = Arc::new(Pipelines::new(
            store.clone(),
            SchemaGenerator::new(backend.clone()),
            Arc::new(fetcher),
            DOCUMENT_ROOT,
        ));
        Self {
            store,
            backend,
            pipelines,
        }
    }

    pub fn with_resume(text: &str) -> Self {
        Self::new(StaticFetcher::Text(text.to_string()))
    }

    /// Candidate `c1` with skills `["Python"]` and job `j1` under it.
    pub async fn with_candidate_and_job() -> Self {
        let harness = Self::new(StaticFetcher::Missing);
        seed_candidate(harness.store.as_ref(), "c1", &["Python"]).await;
        seed_job(
            harness.store.as_ref(),
            "c1",
            "j1",
            json!({"title": "Cloud Engineer", "requirements": "AWS, Terraform"}),
        )
        .await;
        harness
    }

    pub async fn children(&self, collection: &CollectionPath) -> Vec<Document> {
        self.store.list_children(collection).await.unwrap()
    }
}
