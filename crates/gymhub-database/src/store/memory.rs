//! In-memory document store for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::traits::{DocumentQuery, DocumentStore};
use gymhub_core::types::FilterExpr;

use super::matcher::{check_filter, compare_docs, matches};

type DocumentKey = (String, String);

/// Process-local document store keyed by `(collection, id)`.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    docs: Arc<DashMap<DocumentKey, Value>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn key(collection: &str, id: &str) -> DocumentKey {
        (collection.to_string(), id.to_string())
    }

    fn matching(&self, collection: &str, filter: Option<&FilterExpr>) -> AppResult<Vec<Value>> {
        if let Some(expr) = filter {
            check_filter(expr)?;
        }
        Ok(self
            .docs
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .filter(|entry| filter.is_none_or(|expr| matches(entry.value(), expr)))
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value> {
        match self.docs.entry(Self::key(collection, id)) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Document '{id}' already exists in '{collection}'"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(body.clone());
                Ok(body)
            }
        }
    }

    async fn read_item(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        Ok(self
            .docs
            .get(&Self::key(collection, id))
            .map(|entry| entry.value().clone()))
    }

    async fn upsert_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value> {
        self.docs.insert(Self::key(collection, id), body.clone());
        Ok(body)
    }

    async fn delete_item(&self, collection: &str, id: &str) -> AppResult<()> {
        self.docs
            .remove(&Self::key(collection, id))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::not_found(format!("Document '{id}' not found in '{collection}'"))
            })
    }

    async fn query_items(&self, collection: &str, query: &DocumentQuery) -> AppResult<Vec<Value>> {
        let mut docs = self.matching(collection, query.filter.as_ref())?;
        if !query.sort.is_empty() {
            docs.sort_by(|a, b| compare_docs(a, b, &query.sort));
        }
        Ok(match query.page {
            Some(page) => docs
                .into_iter()
                .skip(page.offset_usize())
                .take(page.limit_usize())
                .collect(),
            None => docs,
        })
    }

    async fn count_items(&self, collection: &str, filter: Option<&FilterExpr>) -> AppResult<u64> {
        Ok(self.matching(collection, filter)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymhub_core::error::ErrorKind;
    use gymhub_core::types::{FilterField, FilterOp, PageRequest, SortField};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let store = MemoryDocumentStore::new();
        store.create_item("bookings", "1", json!({ "id": "1" })).await.unwrap();
        let err = store
            .create_item("bookings", "1", json!({ "id": "1" }))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Same id in another collection is fine.
        store.create_item("messages", "1", json!({ "id": "1" })).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store.delete_item("bookings", "nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let store = MemoryDocumentStore::new();
        store.upsert_item("c", "1", json!({ "v": 1 })).await.unwrap();
        store.upsert_item("c", "1", json!({ "v": 2 })).await.unwrap();
        let doc = store.read_item("c", "1").await.unwrap().unwrap();
        assert_eq!(doc["v"], 2);
    }

    #[tokio::test]
    async fn test_query_filters_sorts_and_pages() {
        let store = MemoryDocumentStore::new();
        for (id, user, t) in [("a", "u1", "03"), ("b", "u1", "01"), ("c", "u2", "02"), ("d", "u1", "02")] {
            store
                .create_item("bookings", id, json!({ "id": id, "user_id": user, "start_time": t }))
                .await
                .unwrap();
        }

        let query = DocumentQuery::filtered(FilterExpr::all([
            FilterField::eq("user_id", "u1"),
            FilterField::new("start_time", FilterOp::Gt, "01"),
        ]))
        .sort_by(SortField::asc("start_time"));
        let docs = store.query_items("bookings", &query).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["d", "a"]);

        let paged = DocumentQuery::default()
            .sort_by(SortField::desc("start_time"))
            .sort_by(SortField::asc("id"))
            .paged(PageRequest::new(2, 1));
        let docs = store.query_items("bookings", &paged).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "d"]);

        let count = store
            .count_items("bookings", Some(&FilterField::eq("user_id", "u1").into()))
            .await
            .unwrap();
        assert_eq!(count, 3);
    }
}
