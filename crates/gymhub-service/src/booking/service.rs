//! Booking lifecycle: create, list, modify and cancel.

use std::sync::Arc;

use tracing::{debug, info};

use gymhub_core::error::AppError;
use gymhub_core::time::normalize;
use gymhub_core::traits::Clock;
use gymhub_core::types::id::{BookingId, UserId};
use gymhub_database::repositories::BookingRepository;
use gymhub_entity::booking::{Booking, CreateBooking, UpdateBooking};

use crate::context::RequestContext;
use crate::observer::{ServiceObserver, observe};
use crate::validation::ValidationFailure;
use crate::validation::booking::{
    validate_cancel_booking, validate_create_booking, validate_update_booking,
};

/// Manages member bookings.
#[derive(Debug, Clone)]
pub struct BookingService {
    /// Booking repository.
    repo: Arc<BookingRepository>,
    /// Time source for the lead-time and modification-window rules.
    clock: Arc<dyn Clock>,
    /// Operation hooks.
    observer: Arc<dyn ServiceObserver>,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        repo: Arc<BookingRepository>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn ServiceObserver>,
    ) -> Self {
        Self {
            repo,
            clock,
            observer,
        }
    }

    /// Validates and stores a new booking with `status = booked`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateBooking,
    ) -> Result<Booking, AppError> {
        observe(self.observer.as_ref(), "booking.create", async {
            request.start_time = normalize(request.start_time);
            request.end_time = normalize(request.end_time);
            validate_create_booking(&request, self.clock.now())?;

            let booking = Booking::new(BookingId::new(), request);
            let stored = self.repo.create(&booking).await?;

            info!(
                booking_id = %stored.id,
                user_id = %stored.user_id,
                trainer_id = %stored.trainer_id,
                actor = %ctx.user_id,
                "Booking created"
            );
            Ok(stored)
        })
        .await
    }

    /// Fetches one booking.
    pub async fn get(&self, id: BookingId) -> Result<Option<Booking>, AppError> {
        observe(self.observer.as_ref(), "booking.get", self.repo.find_by_id(id)).await
    }

    /// Bookings starting after now, soonest first.
    pub async fn list_future_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, AppError> {
        let now = self.clock.now();
        observe(
            self.observer.as_ref(),
            "booking.list_future",
            self.repo.find_future_for_user(user_id, now),
        )
        .await
    }

    /// Bookings that started before now, most recent first.
    pub async fn list_past_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, AppError> {
        let now = self.clock.now();
        observe(
            self.observer.as_ref(),
            "booking.list_past",
            self.repo.find_past_for_user(user_id, now),
        )
        .await
    }

    /// Applies a partial update.
    ///
    /// Returns the stored booking untouched, without writing, when no
    /// supplied field differs from what is stored. Otherwise appends one
    /// modification entry with the previous times and upserts.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        mut update: UpdateBooking,
    ) -> Result<Option<Booking>, AppError> {
        observe(self.observer.as_ref(), "booking.update", async {
            let Some(mut booking) = self.repo.find_by_id(id).await? else {
                return Ok(None);
            };
            if booking.is_cancelled() {
                return Err(ValidationFailure::AlreadyCancelled.into());
            }

            update.start_time = update.start_time.map(normalize);
            update.end_time = update.end_time.map(normalize);
            if !booking.differs_from(&update) {
                debug!(booking_id = %id, "Booking update carries no changes");
                return Ok(Some(booking));
            }

            let now = self.clock.now();
            validate_update_booking(booking.start_time, &update, now)?;
            booking.apply_update(update, now);
            let stored = self.repo.upsert(&booking).await?;

            info!(booking_id = %id, actor = %ctx.user_id, "Booking modified");
            Ok(Some(stored))
        })
        .await
    }

    /// Cancels a booking at least 24 hours ahead of its start.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        id: BookingId,
    ) -> Result<Option<Booking>, AppError> {
        observe(self.observer.as_ref(), "booking.cancel", async {
            let Some(mut booking) = self.repo.find_by_id(id).await? else {
                return Ok(None);
            };
            if booking.is_cancelled() {
                return Err(ValidationFailure::AlreadyCancelled.into());
            }

            let now = self.clock.now();
            validate_cancel_booking(booking.start_time, now)?;
            booking.cancel(now);
            let stored = self.repo.upsert(&booking).await?;

            info!(booking_id = %id, actor = %ctx.user_id, "Booking cancelled");
            Ok(Some(stored))
        })
        .await
    }
}
