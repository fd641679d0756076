//! Test doubles for service unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::traits::{DocumentQuery, DocumentStore, ManualClock};
use gymhub_core::types::FilterExpr;
use gymhub_database::MemoryDocumentStore;

use crate::observer::ServiceObserver;

/// Monday 2025-03-10 08:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(fixed_now()))
}

/// In-memory store that counts writes and can be told to fail deletes.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryDocumentStore,
    writes: AtomicUsize,
    fail_deletes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates, upserts and deletes issued so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn create_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.create_item(collection, id, body).await
    }

    async fn read_item(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        self.inner.read_item(collection, id).await
    }

    async fn upsert_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert_item(collection, id, body).await
    }

    async fn delete_item(&self, collection: &str, id: &str) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::database("store offline"));
        }
        self.inner.delete_item(collection, id).await
    }

    async fn query_items(&self, collection: &str, query: &DocumentQuery) -> AppResult<Vec<Value>> {
        self.inner.query_items(collection, query).await
    }

    async fn count_items(&self, collection: &str, filter: Option<&FilterExpr>) -> AppResult<u64> {
        self.inner.count_items(collection, filter).await
    }
}

/// Observer that remembers every hook as `kind:operation[:error_kind]`.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ServiceObserver for RecordingObserver {
    fn on_start(&self, operation: &'static str) {
        self.push(format!("start:{operation}"));
    }

    fn on_success(&self, operation: &'static str, _elapsed: Duration) {
        self.push(format!("success:{operation}"));
    }

    fn on_error(&self, operation: &'static str, error: &AppError, _elapsed: Duration) {
        self.push(format!("error:{operation}:{}", error.kind));
    }
}
