use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;
use uuid::Uuid;

use volant_core::repository::BookingStore;
use volant_core::StoreError;
use volant_domain::{Booking, BookingChange, BookingPatch, BookingStatus, NewBooking};

use crate::overlap::first_conflict;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("start time must be strictly before end time")]
    InvalidInterval,
    #[error("vehicle already booked for the requested interval")]
    Conflict { vehicle_id: Uuid },
    #[error("booking {0} not found")]
    NotFound(Uuid),
    #[error("cannot move a {from} booking to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("timed out waiting for the schedule of vehicle {vehicle_id}")]
    LockTimeout { vehicle_id: Uuid },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sole authority for admitting bookings.
///
/// Proposals for one vehicle run under that vehicle's mutex, so the
/// read-overlap-write sequence can never interleave with another proposal
/// for the same vehicle; proposals for different vehicles proceed in
/// parallel. Lock entries are created lazily on first use and kept for the
/// life of the process, which sidesteps any remove/recreate race on the
/// registry itself.
pub struct ConflictScheduler {
    store: Arc<dyn BookingStore>,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
    lock_timeout: Duration,
}

impl ConflictScheduler {
    pub fn new(store: Arc<dyn BookingStore>, lock_timeout: Duration) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            lock_timeout,
        }
    }

    fn vehicle_lock(&self, vehicle_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(vehicle_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Enter the vehicle's critical section, or fail with `LockTimeout`
    /// without having acquired anything. The returned guard releases on
    /// drop, so every exit path below (conflict, store failure, success)
    /// leaves the section.
    async fn acquire(&self, vehicle_id: Uuid) -> Result<OwnedMutexGuard<()>, ScheduleError> {
        let lock = self.vehicle_lock(vehicle_id);
        timeout(self.lock_timeout, lock.lock_owned())
            .await
            .map_err(|_| ScheduleError::LockTimeout { vehicle_id })
    }

    /// Admit or reject a proposed booking.
    ///
    /// The interval check runs before the critical section; nothing else
    /// does. Between the active-listing read and the insert the vehicle
    /// lock stays held, because releasing it in between would let a
    /// concurrent proposal read the same "no conflict" state and
    /// double-book.
    pub async fn propose(&self, request: NewBooking) -> Result<Booking, ScheduleError> {
        if request.start_time >= request.end_time {
            return Err(ScheduleError::InvalidInterval);
        }

        let vehicle_id = request.vehicle_id;
        let _guard = self.acquire(vehicle_id).await?;

        let existing = self.store.list_active_for_vehicle(vehicle_id).await?;
        if let Some(conflicting) =
            first_conflict(&existing, request.start_time, request.end_time, None)
        {
            tracing::debug!(
                "Rejected proposal for vehicle {}: overlaps booking {}",
                vehicle_id,
                conflicting.id
            );
            return Err(ScheduleError::Conflict { vehicle_id });
        }

        let booking = match self.store.insert(request).await {
            Err(StoreError::Conflict(detail)) => {
                // The storage-layer exclusion backstop fired; with the
                // critical section held this means an out-of-band write.
                tracing::warn!("Storage backstop rejected vehicle {}: {}", vehicle_id, detail);
                return Err(ScheduleError::Conflict { vehicle_id });
            }
            other => other?,
        };

        tracing::info!("Admitted booking {} on vehicle {}", booking.id, vehicle_id);
        Ok(booking)
    }

    /// Move an existing booking in time or onto another vehicle.
    ///
    /// Same protocol as `propose`, with two differences: the booking's own
    /// record is excluded from the overlap scan, and when the vehicle
    /// changes both the old and the new vehicle's sections are entered in
    /// ascending id order so two crossing moves cannot deadlock.
    pub async fn reschedule(
        &self,
        booking_id: Uuid,
        change: BookingChange,
    ) -> Result<Booking, ScheduleError> {
        let current = self
            .store
            .get(booking_id)
            .await?
            .ok_or(ScheduleError::NotFound(booking_id))?;

        let vehicle_id = change.vehicle_id.unwrap_or(current.vehicle_id);
        let start_time = change.start_time.unwrap_or(current.start_time);
        let end_time = change.end_time.unwrap_or(current.end_time);
        if start_time >= end_time {
            return Err(ScheduleError::InvalidInterval);
        }

        let mut vehicle_ids = vec![vehicle_id];
        if current.vehicle_id != vehicle_id {
            vehicle_ids.push(current.vehicle_id);
            vehicle_ids.sort();
        }
        let mut guards = Vec::with_capacity(vehicle_ids.len());
        for id in vehicle_ids {
            guards.push(self.acquire(id).await?);
        }

        let existing = self.store.list_active_for_vehicle(vehicle_id).await?;
        if let Some(conflicting) = first_conflict(&existing, start_time, end_time, Some(booking_id))
        {
            tracing::debug!(
                "Rejected reschedule of {} on vehicle {}: overlaps booking {}",
                booking_id,
                vehicle_id,
                conflicting.id
            );
            return Err(ScheduleError::Conflict { vehicle_id });
        }

        let patch = BookingPatch {
            vehicle_id: change.vehicle_id,
            start_time: change.start_time,
            end_time: change.end_time,
            purpose: change.purpose,
            status: None,
        };
        let updated = match self.store.update(booking_id, patch).await {
            Err(StoreError::NotFound { .. }) => return Err(ScheduleError::NotFound(booking_id)),
            Err(StoreError::Conflict(detail)) => {
                tracing::warn!("Storage backstop rejected vehicle {}: {}", vehicle_id, detail);
                return Err(ScheduleError::Conflict { vehicle_id });
            }
            other => other?,
        };

        tracing::info!("Rescheduled booking {} onto vehicle {}", booking_id, vehicle_id);
        Ok(updated)
    }

    /// Cancel a confirmed booking, freeing its interval.
    pub async fn cancel(&self, booking_id: Uuid) -> Result<Booking, ScheduleError> {
        self.transition(booking_id, BookingStatus::Cancelled).await
    }

    /// Mark a confirmed booking as completed. The interval stays on record
    /// but no longer participates in conflict checks.
    pub async fn complete(&self, booking_id: Uuid) -> Result<Booking, ScheduleError> {
        self.transition(booking_id, BookingStatus::Completed).await
    }

    /// Remove the record entirely; equivalent to cancellation as far as
    /// conflicts are concerned.
    pub async fn remove(&self, booking_id: Uuid) -> Result<(), ScheduleError> {
        match self.store.delete(booking_id).await {
            Err(StoreError::NotFound { .. }) => Err(ScheduleError::NotFound(booking_id)),
            other => Ok(other?),
        }
    }

    /// Status-only transitions shrink the occupied set, so no critical
    /// section and no overlap scan are needed. Only `confirmed` bookings
    /// may transition; reinstating a cancelled booking must go through
    /// `propose` again, where it faces the conflict check.
    async fn transition(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, ScheduleError> {
        let current = self
            .store
            .get(booking_id)
            .await?
            .ok_or(ScheduleError::NotFound(booking_id))?;
        if current.status != BookingStatus::Confirmed {
            return Err(ScheduleError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let patch = BookingPatch {
            status: Some(status),
            ..Default::default()
        };
        match self.store.update(booking_id, patch).await {
            Err(StoreError::NotFound { .. }) => Err(ScheduleError::NotFound(booking_id)),
            other => {
                let updated = other?;
                tracing::info!("Booking {} is now {}", booking_id, status);
                Ok(updated)
            }
        }
    }
}
