//! Reconciler: writes generated values back to the store under an explicit
//! per-pipeline policy.
//!
//! | Policy           | Used for                                         |
//! |------------------|--------------------------------------------------|
//! | `MergeUpsert`    | candidate name/skills, interview_questions, cover_letter |
//! | `AppendChildren` | education, experience (grows on every extraction) |
//! | `ReplaceAll`     | skills_gap_analysis, learning_pathway            |

use serde::Serialize;
use tracing::info;

use crate::store::{to_fields, CollectionPath, DocPath, DocumentStore, Fields, StoreError};

#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Set the named fields on one document, leaving others untouched.
    MergeUpsert { doc: DocPath, fields: Fields },
    /// Insert every element as a new child. Never deletes.
    AppendChildren {
        collection: CollectionPath,
        children: Vec<Fields>,
    },
    /// Atomically swap the whole child set for the new elements.
    ReplaceAll {
        collection: CollectionPath,
        children: Vec<Fields>,
    },
}

impl WriteOp {
    pub fn merge_upsert<T: Serialize>(doc: DocPath, value: &T) -> Result<Self, StoreError> {
        Ok(WriteOp::MergeUpsert {
            doc,
            fields: to_fields(value)?,
        })
    }

    pub fn append<T: Serialize>(
        collection: CollectionPath,
        items: &[T],
    ) -> Result<Self, StoreError> {
        Ok(WriteOp::AppendChildren {
            collection,
            children: items.iter().map(to_fields).collect::<Result<_, _>>()?,
        })
    }

    pub fn replace_all<T: Serialize>(
        collection: CollectionPath,
        items: &[T],
    ) -> Result<Self, StoreError> {
        Ok(WriteOp::ReplaceAll {
            collection,
            children: items.iter().map(to_fields).collect::<Result<_, _>>()?,
        })
    }
}

pub struct Reconciler<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Applies the operations in order, stopping at the first failure.
    /// Operations already applied stay applied.
    pub async fn apply(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        for op in ops {
            match op {
                WriteOp::MergeUpsert { doc, fields } => {
                    let names: Vec<String> = fields.keys().cloned().collect();
                    self.store.set_merge(&doc, fields).await?;
                    info!("Merged fields [{}] into {}", names.join(", "), doc);
                }
                WriteOp::AppendChildren {
                    collection,
                    children,
                } => {
                    let count = children.len();
                    for fields in children {
                        self.store.add_child(&collection, fields).await?;
                    }
                    info!("Appended {} documents to {}", count, collection);
                }
                WriteOp::ReplaceAll {
                    collection,
                    children,
                } => {
                    let written = self.store.replace_children(&collection, children).await?;
                    info!("Replaced {} with {} documents", collection, written.len());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::paths;

    #[tokio::test]
    async fn test_append_grows_collection() {
        let store = MemoryStore::new();
        let education = paths::education(&paths::candidate("c1"));
        let reconciler = Reconciler::new(&store);
        let entries = [json!({"institution": "MIT"}), json!({"institution": "ETH"})];

        for _ in 0..2 {
            reconciler
                .apply(vec![WriteOp::append(education.clone(), &entries).unwrap()])
                .await
                .unwrap();
        }

        assert_eq!(store.list_children(&education).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_replace_all_keeps_only_latest_set() {
        let store = MemoryStore::new();
        let gaps = paths::skills_gap_analysis(&paths::job(&paths::candidate("c1"), "j1"));
        let reconciler = Reconciler::new(&store);

        reconciler
            .apply(vec![WriteOp::replace_all(
                gaps.clone(),
                &[json!({"skill_gap": "a"}), json!({"skill_gap": "b"})],
            )
            .unwrap()])
            .await
            .unwrap();
        reconciler
            .apply(vec![
                WriteOp::replace_all(gaps.clone(), &[json!({"skill_gap": "c"})]).unwrap()
            ])
            .await
            .unwrap();

        let docs = store.list_children(&gaps).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].data["skill_gap"], "c");
    }

    #[tokio::test]
    async fn test_merge_upsert_leaves_other_fields() {
        let store = MemoryStore::new();
        let job = paths::job(&paths::candidate("c1"), "j1");
        let reconciler = Reconciler::new(&store);
        reconciler
            .apply(vec![WriteOp::merge_upsert(job.clone(), &json!({"title": "SRE"})).unwrap()])
            .await
            .unwrap();
        reconciler
            .apply(vec![WriteOp::merge_upsert(
                job.clone(),
                &json!({"cover_letter": "Dear team"}),
            )
            .unwrap()])
            .await
            .unwrap();

        let doc = store.get(&job).await.unwrap().unwrap();
        assert_eq!(doc.data["title"], "SRE");
        assert_eq!(doc.data["cover_letter"], "Dear team");
    }

    #[test]
    fn test_constructors_reject_non_object_items() {
        let collection = paths::education(&paths::candidate("c1"));
        assert!(WriteOp::append(collection, &["not an object"]).is_err());
    }
}
