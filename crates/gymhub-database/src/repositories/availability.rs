//! Availability repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use gymhub_core::result::AppResult;
use gymhub_core::time::to_storage;
use gymhub_core::traits::{DocumentQuery, DocumentStore};
use gymhub_core::types::id::{AvailabilityId, CenterId, UserId};
use gymhub_core::types::{FilterExpr, FilterField, FilterOp, SortField};
use gymhub_entity::availability::Availability;

use crate::documents::collections::AVAILABILITIES;
use crate::documents::{AvailabilityDocument, from_body, to_body};

/// Repository for availability documents.
#[derive(Debug, Clone)]
pub struct AvailabilityRepository {
    store: Arc<dyn DocumentStore>,
}

impl AvailabilityRepository {
    /// Create a new availability repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn decode(body: serde_json::Value) -> AppResult<Availability> {
        Ok(from_body::<AvailabilityDocument>(AVAILABILITIES, body)?.into())
    }

    /// Insert a new availability.
    pub async fn create(&self, availability: &Availability) -> AppResult<Availability> {
        let body = to_body(&AvailabilityDocument::from(availability))?;
        let stored = self
            .store
            .create_item(AVAILABILITIES, &availability.id.to_string(), body)
            .await?;
        Self::decode(stored)
    }

    /// Find an availability by ID.
    pub async fn find_by_id(&self, id: AvailabilityId) -> AppResult<Option<Availability>> {
        self.store
            .read_item(AVAILABILITIES, &id.to_string())
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Every pattern owned by a trainer, oldest start first.
    pub async fn find_by_trainer(&self, trainer_id: UserId) -> AppResult<Vec<Availability>> {
        let query = DocumentQuery::filtered(FilterField::eq("trainer_id", trainer_id.to_string()).into())
            .sort_by(SortField::asc("start_date"));
        self.find(&query).await
    }

    /// Patterns at a center overlapping `[range_start, range_end]`.
    /// Open-ended patterns always satisfy the end side.
    pub async fn find_by_center_in_range(
        &self,
        center_id: CenterId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> AppResult<Vec<Availability>> {
        let filter = FilterExpr::All(vec![
            FilterField::eq("center_id", center_id.to_string()).into(),
            FilterField::new("start_date", FilterOp::Lte, to_storage(&range_end)).into(),
            FilterExpr::any([
                FilterExpr::from(FilterField::new(
                    "end_date",
                    FilterOp::Gte,
                    to_storage(&range_start),
                )),
                FilterExpr::from(FilterField::is_null("end_date")),
            ]),
        ]);
        let query = DocumentQuery::filtered(filter).sort_by(SortField::asc("start_date"));
        self.find(&query).await
    }

    /// Replace a stored availability.
    pub async fn upsert(&self, availability: &Availability) -> AppResult<Availability> {
        let body = to_body(&AvailabilityDocument::from(availability))?;
        let stored = self
            .store
            .upsert_item(AVAILABILITIES, &availability.id.to_string(), body)
            .await?;
        Self::decode(stored)
    }

    /// Delete an availability. Missing documents surface as not-found.
    pub async fn delete(&self, id: AvailabilityId) -> AppResult<()> {
        self.store.delete_item(AVAILABILITIES, &id.to_string()).await
    }

    async fn find(&self, query: &DocumentQuery) -> AppResult<Vec<Availability>> {
        self.store
            .query_items(AVAILABILITIES, query)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }
}
