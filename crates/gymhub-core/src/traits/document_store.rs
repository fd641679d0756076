//! Document store trait for pluggable persistence backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::{FilterExpr, PageRequest, SortField};

/// A query over one collection.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    /// Optional filter; `None` matches every document.
    pub filter: Option<FilterExpr>,
    /// Sort keys applied in order.
    pub sort: Vec<SortField>,
    /// Optional limit/offset window, applied after sorting.
    pub page: Option<PageRequest>,
}

impl DocumentQuery {
    /// Query with the given filter and no ordering.
    pub fn filtered(filter: FilterExpr) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    /// Append a sort key.
    pub fn sort_by(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    /// Restrict to a limit/offset window.
    pub fn paged(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }
}

/// Trait for JSON document stores.
///
/// Each record is one JSON object kept in a named collection and keyed by
/// its id, which doubles as the partition key. Implementations live in
/// `gymhub-database` (PostgreSQL JSONB and in-memory).
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new document. Fails with a conflict if the id is taken.
    async fn create_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value>;

    /// Read a document by id.
    async fn read_item(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Insert or replace a document.
    async fn upsert_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value>;

    /// Delete a document. Fails with not-found if it does not exist.
    async fn delete_item(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Run a query and return the matching documents.
    async fn query_items(&self, collection: &str, query: &DocumentQuery) -> AppResult<Vec<Value>>;

    /// Count documents matching a filter.
    async fn count_items(&self, collection: &str, filter: Option<&FilterExpr>) -> AppResult<u64>;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
