use async_trait::async_trait;
use uuid::Uuid;

use crate::StoreResult;
use volant_domain::{
    Booking, BookingPatch, CompanionLink, NewBooking, NewCompanionLink, NewUser, NewVehicle, User,
    UserUpdate, Vehicle, VehicleUpdate,
};

/// Durable keeper of booking records.
///
/// Every mutating operation is atomic with respect to a single record.
/// Cross-record atomicity (the read-then-write sequence the conflict
/// scheduler runs) is the scheduler's responsibility, not the store's.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// All `confirmed` bookings for the vehicle, ordered by start time
    /// ascending. Cancelled and completed bookings never appear here.
    async fn list_active_for_vehicle(&self, vehicle_id: Uuid) -> StoreResult<Vec<Booking>>;

    /// Persist a new booking in `confirmed` status with a server-assigned
    /// id and timestamps. Fails with `StoreError::Validation` when
    /// `start_time >= end_time`.
    async fn insert(&self, booking: NewBooking) -> StoreResult<Booking>;

    /// Apply a partial update and refresh `updated_at`. Fails with
    /// `StoreError::NotFound` when the id does not exist.
    async fn update(&self, booking_id: Uuid, patch: BookingPatch) -> StoreResult<Booking>;

    /// Remove the record entirely. A second delete of the same id fails
    /// with `StoreError::NotFound`.
    async fn delete(&self, booking_id: Uuid) -> StoreResult<()>;

    async fn get(&self, booking_id: Uuid) -> StoreResult<Option<Booking>>;

    async fn list_all(&self) -> StoreResult<Vec<Booking>>;

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Booking>>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn insert(&self, vehicle: NewVehicle) -> StoreResult<Vehicle>;
    async fn get(&self, vehicle_id: Uuid) -> StoreResult<Option<Vehicle>>;
    async fn list_all(&self) -> StoreResult<Vec<Vehicle>>;
    async fn update(&self, vehicle_id: Uuid, update: VehicleUpdate) -> StoreResult<Vehicle>;
    async fn delete(&self, vehicle_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
    async fn get(&self, user_id: Uuid) -> StoreResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_all(&self) -> StoreResult<Vec<User>>;
    async fn update(&self, user_id: Uuid, update: UserUpdate) -> StoreResult<User>;
    async fn delete(&self, user_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait CompanionStore: Send + Sync {
    async fn insert(&self, link: NewCompanionLink) -> StoreResult<CompanionLink>;
    async fn list_for_learner(&self, learner_id: Uuid) -> StoreResult<Vec<CompanionLink>>;
}
