use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{new_child_id, CollectionPath, DocPath, Document, DocumentStore, Fields, StoreError};

struct StoredDocument {
    collection: String,
    seq: u64,
    data: Fields,
}

#[derive(Default)]
struct Inner {
    documents: HashMap<String, StoredDocument>,
    next_seq: u64,
}

impl Inner {
    fn insert(&mut self, path: &DocPath, data: Fields) {
        self.next_seq += 1;
        self.documents.insert(
            path.as_str().to_string(),
            StoredDocument {
                collection: path.parent().as_str().to_string(),
                seq: self.next_seq,
                data,
            },
        );
    }
}

/// Process-local store. Iteration over a collection follows insertion order.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.documents.get(path.as_str()).map(|doc| Document {
            id: path.id().to_string(),
            data: doc.data.clone(),
        }))
    }

    async fn set_merge(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.documents.get_mut(path.as_str()) {
            existing.data.extend(fields);
            return Ok(());
        }
        inner.insert(path, fields);
        Ok(())
    }

    async fn add_child(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocPath, StoreError> {
        let path = collection.doc(&new_child_id());
        self.inner.write().await.insert(&path, fields);
        Ok(path)
    }

    async fn list_children(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        let mut children: Vec<_> = inner
            .documents
            .iter()
            .filter(|(_, doc)| doc.collection == collection.as_str())
            .collect();
        children.sort_by_key(|(_, doc)| doc.seq);
        Ok(children
            .into_iter()
            .map(|(path, doc)| Document {
                id: path.rsplit('/').next().unwrap_or(path).to_string(),
                data: doc.data.clone(),
            })
            .collect())
    }

    async fn replace_children(
        &self,
        collection: &CollectionPath,
        children: Vec<Fields>,
    ) -> Result<Vec<DocPath>, StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .documents
            .retain(|_, doc| doc.collection != collection.as_str());
        let mut written = Vec::with_capacity(children.len());
        for fields in children {
            let path = collection.doc(&new_child_id());
            inner.insert(&path, fields);
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{paths, to_fields};

    fn fields(value: serde_json::Value) -> Fields {
        to_fields(&value).unwrap()
    }

    #[tokio::test]
    async fn test_set_merge_keeps_unrelated_fields() {
        let store = MemoryStore::new();
        let path = paths::candidate("c1");
        store
            .set_merge(&path, fields(json!({"name": "Ada", "email": "ada@example.com"})))
            .await
            .unwrap();
        store
            .set_merge(&path, fields(json!({"name": "Ada Lovelace"})))
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.id, "c1");
        assert_eq!(doc.data["name"], json!("Ada Lovelace"));
        assert_eq!(doc.data["email"], json!("ada@example.com"));
    }

    #[tokio::test]
    async fn test_list_children_is_direct_and_ordered() {
        let store = MemoryStore::new();
        let candidate = paths::candidate("c1");
        let education = paths::education(&candidate);
        for n in 0..3 {
            store.add_child(&education, fields(json!({"n": n}))).await.unwrap();
        }
        store
            .add_child(&paths::experience(&candidate), fields(json!({"n": 99})))
            .await
            .unwrap();

        let children = store.list_children(&education).await.unwrap();
        let order: Vec<_> = children.iter().map(|d| d.data["n"].clone()).collect();
        assert_eq!(order, vec![json!(0), json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_replace_children_drops_previous_set() {
        let store = MemoryStore::new();
        let job = paths::job(&paths::candidate("c1"), "j1");
        let gaps = paths::skills_gap_analysis(&job);
        store.add_child(&gaps, fields(json!({"skill_gap": "old"}))).await.unwrap();

        let written = store
            .replace_children(
                &gaps,
                vec![fields(json!({"skill_gap": "a"})), fields(json!({"skill_gap": "b"}))],
            )
            .await
            .unwrap();

        assert_eq!(written.len(), 2);
        let names: Vec<_> = store
            .list_children(&gaps)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.data["skill_gap"].clone())
            .collect();
        assert_eq!(names, vec![json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_get_missing_document_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(&paths::candidate("nobody")).await.unwrap().is_none());
    }
}
