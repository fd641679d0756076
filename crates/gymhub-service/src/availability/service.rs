//! Trainer availability patterns.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use tracing::info;

use gymhub_core::error::AppError;
use gymhub_core::time::normalize;
use gymhub_core::traits::Clock;
use gymhub_core::types::id::{AvailabilityId, CenterId, UserId};
use gymhub_database::repositories::AvailabilityRepository;
use gymhub_entity::availability::{
    Availability, CreateAvailability, DaySchedule, UpdateAvailability,
};

use crate::context::RequestContext;
use crate::observer::{ServiceObserver, observe};
use crate::validation::availability::{
    validate_create_availability, validate_recurrence_schedule, validate_update_availability,
};

/// Manages trainer availability patterns.
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    repo: Arc<AvailabilityRepository>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn ServiceObserver>,
}

/// Bring slot times down to whole seconds and dates to storage precision.
fn normalize_schedule(schedule: &mut [DaySchedule]) {
    let whole_seconds = |t: NaiveTime| t.with_nanosecond(0).unwrap_or(t);
    for day in schedule {
        day.date = day.date.map(normalize);
        for slot in &mut day.time_slots {
            slot.start_time = whole_seconds(slot.start_time);
            slot.end_time = whole_seconds(slot.end_time);
        }
    }
}

impl AvailabilityService {
    /// Creates a new availability service.
    pub fn new(
        repo: Arc<AvailabilityRepository>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn ServiceObserver>,
    ) -> Self {
        Self {
            repo,
            clock,
            observer,
        }
    }

    /// Validates and stores a new pattern.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateAvailability,
    ) -> Result<Availability, AppError> {
        observe(self.observer.as_ref(), "availability.create", async {
            request.start_date = normalize(request.start_date);
            request.end_date = request.end_date.map(normalize);
            normalize_schedule(&mut request.schedule);

            let now = self.clock.now();
            validate_create_availability(&request, now)?;

            let availability = Availability::new(AvailabilityId::new(), request, now);
            let stored = self.repo.create(&availability).await?;

            info!(
                availability_id = %stored.id,
                trainer_id = %stored.trainer_id,
                center_id = %stored.center_id,
                recurrence = %stored.recurrence_type,
                actor = %ctx.user_id,
                "Availability created"
            );
            Ok(stored)
        })
        .await
    }

    /// Loads a pattern by id.
    pub async fn get(&self, id: AvailabilityId) -> Result<Option<Availability>, AppError> {
        observe(self.observer.as_ref(), "availability.get", self.repo.find_by_id(id)).await
    }

    /// Every pattern owned by a trainer.
    pub async fn list_by_trainer(&self, trainer_id: UserId) -> Result<Vec<Availability>, AppError> {
        observe(
            self.observer.as_ref(),
            "availability.list_by_trainer",
            self.repo.find_by_trainer(trainer_id),
        )
        .await
    }

    /// Patterns at `center_id` that overlap `[range_start, range_end]`.
    /// Open-ended patterns are included once they have started by `range_end`.
    pub async fn list_by_center_in_range(
        &self,
        center_id: CenterId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Availability>, AppError> {
        observe(
            self.observer.as_ref(),
            "availability.list_by_center",
            self.repo.find_by_center_in_range(
                center_id,
                normalize(range_start),
                normalize(range_end),
            ),
        )
        .await
    }

    /// Replaces the schedule and/or end date of a pattern that has not
    /// started yet. `None` when the id does not resolve.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: AvailabilityId,
        mut update: UpdateAvailability,
    ) -> Result<Option<Availability>, AppError> {
        observe(self.observer.as_ref(), "availability.update", async {
            let Some(mut availability) = self.repo.find_by_id(id).await? else {
                return Ok(None);
            };

            update.end_date = update.end_date.map(normalize);
            if let Some(schedule) = update.schedule.as_mut() {
                normalize_schedule(schedule);
            }

            let now = self.clock.now();
            validate_update_availability(availability.start_date, &update, now)?;
            if let Some(schedule) = &update.schedule {
                validate_recurrence_schedule(availability.recurrence_type, schedule)?;
            }

            availability.apply_update(update, now);
            let stored = self.repo.upsert(&availability).await?;

            info!(availability_id = %id, actor = %ctx.user_id, "Availability updated");
            Ok(Some(stored))
        })
        .await
    }

    /// Deletes a pattern. Any store failure, including a missing
    /// document, yields `false`.
    pub async fn delete(&self, ctx: &RequestContext, id: AvailabilityId) -> bool {
        let deleted = observe(self.observer.as_ref(), "availability.delete", self.repo.delete(id))
            .await
            .is_ok();
        if deleted {
            info!(availability_id = %id, actor = %ctx.user_id, "Availability deleted");
        }
        deleted
    }
}
