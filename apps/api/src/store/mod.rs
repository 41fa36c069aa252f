//! Hierarchical document store.
//!
//! Documents live at slash-separated paths that alternate collection and
//! document segments, e.g. `candidates/c1/jobs/j1/skills_gap_analysis/<id>`.
//! Every document body is a flat JSON object of named fields.
//!
//! Two backends implement [`DocumentStore`]: [`postgres::PgDocumentStore`] for
//! deployments and [`memory::MemoryStore`] for local runs and tests.

use std::fmt;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;
pub mod postgres;

/// Named fields of a single document.
pub type Fields = Map<String, Value>;

pub const CANDIDATES: &str = "candidates";
pub const EDUCATION: &str = "education";
pub const EXPERIENCE: &str = "experience";
pub const JOBS: &str = "jobs";
pub const SKILLS_GAP_ANALYSIS: &str = "skills_gap_analysis";
pub const LEARNING_PATHWAY: &str = "learning_pathway";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Expected a JSON object for {what}")]
    NotAnObject { what: String },
}

/// Path of a collection: an odd number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

/// Path of a document: an even number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath(String);

impl CollectionPath {
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn doc(&self, id: &str) -> DocPath {
        DocPath(format!("{}/{}", self.0, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocPath {
    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}", self.0, name))
    }

    /// Last path segment.
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> CollectionPath {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => CollectionPath(parent.to_string()),
            None => CollectionPath(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical locations of everything this service reads or writes.
pub mod paths {
    use super::*;

    pub fn candidate(candidate_id: &str) -> DocPath {
        CollectionPath::root(CANDIDATES).doc(candidate_id)
    }

    pub fn education(candidate: &DocPath) -> CollectionPath {
        candidate.collection(EDUCATION)
    }

    pub fn experience(candidate: &DocPath) -> CollectionPath {
        candidate.collection(EXPERIENCE)
    }

    pub fn job(candidate: &DocPath, job_id: &str) -> DocPath {
        candidate.collection(JOBS).doc(job_id)
    }

    pub fn skills_gap_analysis(job: &DocPath) -> CollectionPath {
        job.collection(SKILLS_GAP_ANALYSIS)
    }

    pub fn learning_pathway(job: &DocPath) -> CollectionPath {
        job.collection(LEARNING_PATHWAY)
    }
}

/// A document read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

impl Document {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }
}

/// Serializes a record into the field map stored for it.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::NotAnObject {
            what: std::any::type_name::<T>().to_string(),
        }),
    }
}

/// The store operations the pipelines depend on.
///
/// `replace_children` is atomic per collection in every backend: a reader or a
/// concurrent replacement never observes a mix of the old and new child sets.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Sets the given top-level fields, creating the document if needed and
    /// leaving all other fields untouched.
    async fn set_merge(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError>;

    /// Inserts a new child document under a generated id.
    async fn add_child(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocPath, StoreError>;

    /// Returns the direct children of a collection in insertion order.
    async fn list_children(&self, collection: &CollectionPath)
        -> Result<Vec<Document>, StoreError>;

    /// Deletes every child of `collection` and inserts `children` in order.
    async fn replace_children(
        &self,
        collection: &CollectionPath,
        children: Vec<Fields>,
    ) -> Result<Vec<DocPath>, StoreError>;
}

pub(crate) fn new_child_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
