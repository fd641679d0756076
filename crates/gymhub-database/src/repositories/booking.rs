//! Booking repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use gymhub_core::result::AppResult;
use gymhub_core::time::to_storage;
use gymhub_core::traits::{DocumentQuery, DocumentStore};
use gymhub_core::types::id::{BookingId, UserId};
use gymhub_core::types::{FilterExpr, FilterField, FilterOp, SortField};
use gymhub_entity::booking::Booking;

use crate::documents::collections::BOOKINGS;
use crate::documents::{BookingDocument, from_body, to_body};

/// Repository for booking documents.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    store: Arc<dyn DocumentStore>,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn decode(body: serde_json::Value) -> AppResult<Booking> {
        Ok(from_body::<BookingDocument>(BOOKINGS, body)?.into())
    }

    /// Insert a new booking.
    pub async fn create(&self, booking: &Booking) -> AppResult<Booking> {
        let body = to_body(&BookingDocument::from(booking))?;
        let stored = self
            .store
            .create_item(BOOKINGS, &booking.id.to_string(), body)
            .await?;
        Self::decode(stored)
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        self.store
            .read_item(BOOKINGS, &id.to_string())
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Replace a stored booking.
    pub async fn upsert(&self, booking: &Booking) -> AppResult<Booking> {
        let body = to_body(&BookingDocument::from(booking))?;
        let stored = self
            .store
            .upsert_item(BOOKINGS, &booking.id.to_string(), body)
            .await?;
        Self::decode(stored)
    }

    /// Bookings of `user_id` starting after `now`, soonest first.
    pub async fn find_future_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let query = DocumentQuery::filtered(FilterExpr::all([
            FilterField::eq("user_id", user_id.to_string()),
            FilterField::new("start_time", FilterOp::Gt, to_storage(&now)),
        ]))
        .sort_by(SortField::asc("start_time"));
        self.find(&query).await
    }

    /// Bookings of `user_id` that started before `now`, most recent first.
    pub async fn find_past_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let query = DocumentQuery::filtered(FilterExpr::all([
            FilterField::eq("user_id", user_id.to_string()),
            FilterField::new("start_time", FilterOp::Lt, to_storage(&now)),
        ]))
        .sort_by(SortField::desc("start_time"));
        self.find(&query).await
    }

    /// Delete a booking document.
    pub async fn delete(&self, id: BookingId) -> AppResult<()> {
        self.store.delete_item(BOOKINGS, &id.to_string()).await
    }

    async fn find(&self, query: &DocumentQuery) -> AppResult<Vec<Booking>> {
        self.store
            .query_items(BOOKINGS, query)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use chrono::{Duration, TimeZone};
    use gymhub_core::types::id::CenterId;
    use gymhub_entity::booking::CreateBooking;

    fn booking(user_id: UserId, start: DateTime<Utc>) -> Booking {
        Booking::new(
            BookingId::new(),
            CreateBooking {
                user_id,
                trainer_id: UserId::new(),
                center_id: CenterId::new(),
                start_time: start,
                end_time: start + Duration::hours(1),
                message: None,
            },
        )
    }

    #[tokio::test]
    async fn test_future_and_past_split_on_now() {
        let repo = BookingRepository::new(Arc::new(MemoryDocumentStore::new()));
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let user = UserId::new();

        let later = booking(user, now + Duration::days(2));
        let soon = booking(user, now + Duration::hours(3));
        let earlier = booking(user, now - Duration::days(1));
        let long_ago = booking(user, now - Duration::days(30));
        let other_user = booking(UserId::new(), now + Duration::days(1));
        for b in [&later, &soon, &earlier, &long_ago, &other_user] {
            repo.create(b).await.unwrap();
        }

        let future = repo.find_future_for_user(user, now).await.unwrap();
        assert_eq!(
            future.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![soon.id, later.id]
        );

        let past = repo.find_past_for_user(user, now).await.unwrap();
        assert_eq!(
            past.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![earlier.id, long_ago.id]
        );
    }

    #[tokio::test]
    async fn test_find_by_id_round_trips() {
        let repo = BookingRepository::new(Arc::new(MemoryDocumentStore::new()));
        let b = booking(UserId::new(), Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap());
        repo.create(&b).await.unwrap();
        assert_eq!(repo.find_by_id(b.id).await.unwrap(), Some(b));
        assert_eq!(repo.find_by_id(BookingId::new()).await.unwrap(), None);
    }
}
