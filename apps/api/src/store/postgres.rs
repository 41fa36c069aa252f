use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use super::{new_child_id, CollectionPath, DocPath, Document, DocumentStore, Fields, StoreError};

/// Document store backed by the single `documents` table.
///
/// `set_merge` relies on `jsonb ||`, which replaces top-level keys only.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_document(path: String, data: Value) -> Result<Document, StoreError> {
    let id = path.rsplit('/').next().unwrap_or(&path).to_string();
    match data {
        Value::Object(data) => Ok(Document { id, data }),
        _ => Err(StoreError::NotAnObject { what: path }),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let data: Option<Value> =
            sqlx::query_scalar("SELECT data FROM documents WHERE path = $1")
                .bind(path.as_str())
                .fetch_optional(&self.pool)
                .await?;
        data.map(|data| into_document(path.as_str().to_string(), data))
            .transpose()
    }

    async fn set_merge(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (path, collection, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (path) DO UPDATE
                SET data = documents.data || EXCLUDED.data,
                    updated_at = now()
            "#,
        )
        .bind(path.as_str())
        .bind(path.parent().as_str())
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_child(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocPath, StoreError> {
        let path = collection.doc(&new_child_id());
        sqlx::query("INSERT INTO documents (path, collection, data) VALUES ($1, $2, $3)")
            .bind(path.as_str())
            .bind(collection.as_str())
            .bind(Value::Object(fields))
            .execute(&self.pool)
            .await?;
        Ok(path)
    }

    async fn list_children(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT path, data FROM documents WHERE collection = $1 ORDER BY seq ASC",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(path, data)| into_document(path, data))
            .collect()
    }

    async fn replace_children(
        &self,
        collection: &CollectionPath,
        children: Vec<Fields>,
    ) -> Result<Vec<DocPath>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent replacements of the same collection until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(collection.as_str())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut written = Vec::with_capacity(children.len());
        for fields in children {
            let path = collection.doc(&new_child_id());
            sqlx::query("INSERT INTO documents (path, collection, data) VALUES ($1, $2, $3)")
                .bind(path.as_str())
                .bind(collection.as_str())
                .bind(Value::Object(fields))
                .execute(&mut *tx)
                .await?;
            written.push(path);
        }

        tx.commit().await?;
        debug!(
            "Replaced {} documents with {} under {}",
            deleted,
            written.len(),
            collection
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_document_takes_last_segment_as_id() {
        let doc = into_document(
            "candidates/c1/jobs/j1".to_string(),
            serde_json::json!({"title": "Engineer"}),
        )
        .unwrap();
        assert_eq!(doc.id, "j1");
        assert_eq!(doc.data["title"], "Engineer");
    }

    #[test]
    fn test_into_document_rejects_scalars() {
        let result = into_document("candidates/c1".to_string(), serde_json::json!(42));
        assert!(matches!(result, Err(StoreError::NotAnObject { .. })));
    }
}
