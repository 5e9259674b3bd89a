//! In-memory implementations of the repository traits.
//!
//! Backs the scheduler's unit suite and the API integration tests. Each
//! operation is atomic for a single record, matching the contract the
//! Postgres stores provide; nothing here serializes the scheduler's
//! read-then-write sequence.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use volant_core::repository::{BookingStore, CompanionStore, UserStore, VehicleStore};
use volant_core::{StoreError, StoreResult};
use volant_domain::{
    Booking, BookingPatch, BookingStatus, CompanionLink, NewBooking, NewCompanionLink, NewUser,
    NewVehicle, User, UserUpdate, Vehicle, VehicleUpdate,
};

#[derive(Default)]
pub struct MemoryStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
    vehicles: RwLock<HashMap<Uuid, Vehicle>>,
    users: RwLock<HashMap<Uuid, User>>,
    links: RwLock<Vec<CompanionLink>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn list_active_for_vehicle(&self, vehicle_id: Uuid) -> StoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut active: Vec<Booking> = bookings
            .values()
            .filter(|b| b.vehicle_id == vehicle_id && b.status == BookingStatus::Confirmed)
            .cloned()
            .collect();
        active.sort_by_key(|b| b.start_time);
        Ok(active)
    }

    async fn insert(&self, booking: NewBooking) -> StoreResult<Booking> {
        if booking.start_time >= booking.end_time {
            return Err(StoreError::Validation(
                "start time must be strictly before end time".to_owned(),
            ));
        }

        let now = Utc::now();
        let record = Booking {
            id: Uuid::new_v4(),
            vehicle_id: booking.vehicle_id,
            user_id: booking.user_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            purpose: booking.purpose,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };

        self.bookings.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, booking_id: Uuid, patch: BookingPatch) -> StoreResult<Booking> {
        let mut bookings = self.bookings.write().await;
        let record = bookings.get_mut(&booking_id).ok_or(StoreError::NotFound {
            entity: "booking",
            id: booking_id,
        })?;

        if let Some(vehicle_id) = patch.vehicle_id {
            record.vehicle_id = vehicle_id;
        }
        if let Some(start_time) = patch.start_time {
            record.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            record.end_time = end_time;
        }
        if let Some(purpose) = patch.purpose {
            record.purpose = purpose;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn delete(&self, booking_id: Uuid) -> StoreResult<()> {
        self.bookings
            .write()
            .await
            .remove(&booking_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })
    }

    async fn get(&self, booking_id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(&booking_id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Booking>> {
        let mut all: Vec<Booking> = self.bookings.read().await.values().cloned().collect();
        all.sort_by_key(|b| b.start_time);
        Ok(all)
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Booking>> {
        let mut owned: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|b| b.start_time);
        Ok(owned)
    }
}

#[async_trait]
impl VehicleStore for MemoryStore {
    async fn insert(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles.values().any(|v| v.plate == vehicle.plate) {
            return Err(StoreError::PlateTaken);
        }

        let now = Utc::now();
        let record = Vehicle {
            id: Uuid::new_v4(),
            name: vehicle.name,
            model: vehicle.model,
            build_year: vehicle.build_year,
            category: vehicle.category,
            plate: vehicle.plate,
            inspection_due: vehicle.inspection_due,
            price_per_hour_cents: vehicle.price_per_hour_cents,
            available: true,
            image_url: vehicle.image_url,
            created_at: now,
            updated_at: now,
        };

        vehicles.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, vehicle_id: Uuid) -> StoreResult<Option<Vehicle>> {
        Ok(self.vehicles.read().await.get(&vehicle_id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Vehicle>> {
        let mut all: Vec<Vehicle> = self.vehicles.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update(&self, vehicle_id: Uuid, update: VehicleUpdate) -> StoreResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;

        if let Some(ref plate) = update.plate {
            if vehicles.values().any(|v| v.id != vehicle_id && &v.plate == plate) {
                return Err(StoreError::PlateTaken);
            }
        }

        let record = vehicles.get_mut(&vehicle_id).ok_or(StoreError::NotFound {
            entity: "vehicle",
            id: vehicle_id,
        })?;

        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(model) = update.model {
            record.model = model;
        }
        if let Some(build_year) = update.build_year {
            record.build_year = build_year;
        }
        if let Some(category) = update.category {
            record.category = category;
        }
        if let Some(plate) = update.plate {
            record.plate = plate;
        }
        if let Some(inspection_due) = update.inspection_due {
            record.inspection_due = inspection_due;
        }
        if let Some(price) = update.price_per_hour_cents {
            record.price_per_hour_cents = price;
        }
        if let Some(available) = update.available {
            record.available = available;
        }
        if let Some(image_url) = update.image_url {
            record.image_url = Some(image_url);
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn delete(&self, vehicle_id: Uuid) -> StoreResult<()> {
        self.vehicles
            .write()
            .await
            .remove(&vehicle_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "vehicle",
                id: vehicle_id,
            })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::EmailTaken);
        }

        let record = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            address: user.address,
            birth_date: user.birth_date,
            role: user.role,
            license_date: user.license_date,
            license_number: user.license_number,
            logbook_number: user.logbook_number,
        };

        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        let mut all: Vec<User> = self.users.read().await.values().cloned().collect();
        all.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(all)
    }

    async fn update(&self, user_id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if let Some(ref email) = update.email {
            if users.values().any(|u| u.id != user_id && &u.email == email) {
                return Err(StoreError::EmailTaken);
            }
        }

        let record = users.get_mut(&user_id).ok_or(StoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;

        if let Some(first_name) = update.first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            record.last_name = last_name;
        }
        if let Some(email) = update.email {
            record.email = email;
        }
        if let Some(phone) = update.phone {
            record.phone = phone;
        }
        if let Some(address) = update.address {
            record.address = address;
        }
        if let Some(birth_date) = update.birth_date {
            record.birth_date = birth_date;
        }
        if let Some(license_date) = update.license_date {
            record.license_date = Some(license_date);
        }
        if let Some(license_number) = update.license_number {
            record.license_number = Some(license_number);
        }
        if let Some(logbook_number) = update.logbook_number {
            record.logbook_number = Some(logbook_number);
        }

        Ok(record.clone())
    }

    async fn delete(&self, user_id: Uuid) -> StoreResult<()> {
        self.users
            .write()
            .await
            .remove(&user_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "user",
                id: user_id,
            })
    }
}

#[async_trait]
impl CompanionStore for MemoryStore {
    async fn insert(&self, link: NewCompanionLink) -> StoreResult<CompanionLink> {
        let record = CompanionLink {
            id: Uuid::new_v4(),
            learner_id: link.learner_id,
            companion_id: link.companion_id,
            relation: link.relation,
            created_at: Utc::now(),
        };
        self.links.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_for_learner(&self, learner_id: Uuid) -> StoreResult<Vec<CompanionLink>> {
        Ok(self
            .links
            .read()
            .await
            .iter()
            .filter(|l| l.learner_id == learner_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use volant_domain::BookingPurpose;

    fn interval(hour_start: u32, hour_end: u32) -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
        let day = Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap();
        (
            day + Duration::hours(hour_start as i64),
            day + Duration::hours(hour_end as i64),
        )
    }

    fn new_booking(vehicle_id: Uuid, hour_start: u32, hour_end: u32) -> NewBooking {
        let (start_time, end_time) = interval(hour_start, hour_end);
        NewBooking {
            vehicle_id,
            user_id: Uuid::new_v4(),
            start_time,
            end_time,
            purpose: BookingPurpose::SelfDrive,
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_confirmed_status() {
        let store = MemoryStore::new();
        let created = BookingStore::insert(&store, new_booking(Uuid::new_v4(), 10, 11))
            .await
            .unwrap();

        assert_eq!(created.status, BookingStatus::Confirmed);
        let fetched = BookingStore::get(&store, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn insert_rejects_reversed_interval() {
        let store = MemoryStore::new();
        let err = BookingStore::insert(&store, new_booking(Uuid::new_v4(), 11, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn active_listing_filters_and_orders() {
        let store = MemoryStore::new();
        let vehicle_id = Uuid::new_v4();

        let late = BookingStore::insert(&store, new_booking(vehicle_id, 14, 15))
            .await
            .unwrap();
        let early = BookingStore::insert(&store, new_booking(vehicle_id, 8, 9))
            .await
            .unwrap();
        let cancelled = BookingStore::insert(&store, new_booking(vehicle_id, 10, 11))
            .await
            .unwrap();
        BookingStore::update(
            &store,
            cancelled.id,
            BookingPatch {
                status: Some(BookingStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        // Other vehicles never show up in the listing.
        BookingStore::insert(&store, new_booking(Uuid::new_v4(), 8, 9))
            .await
            .unwrap();

        let active = store.list_active_for_vehicle(vehicle_id).await.unwrap();
        assert_eq!(
            active.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![early.id, late.id]
        );
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_and_missing_id_fails() {
        let store = MemoryStore::new();
        let created = BookingStore::insert(&store, new_booking(Uuid::new_v4(), 10, 11))
            .await
            .unwrap();

        let patched = BookingStore::update(
            &store,
            created.id,
            BookingPatch {
                status: Some(BookingStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(patched.status, BookingStatus::Completed);
        assert!(patched.updated_at >= created.updated_at);

        let err = BookingStore::update(&store, Uuid::new_v4(), BookingPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "booking", .. }));
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let store = MemoryStore::new();
        let created = BookingStore::insert(&store, new_booking(Uuid::new_v4(), 10, 11))
            .await
            .unwrap();

        BookingStore::delete(&store, created.id).await.unwrap();
        let err = BookingStore::delete(&store, created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "booking", .. }));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let user = NewUser {
            first_name: "Nadia".to_owned(),
            last_name: "Benali".to_owned(),
            email: "nadia@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            phone: "0600000000".to_owned(),
            address: "1 rue des Lilas".to_owned(),
            birth_date: chrono::NaiveDate::from_ymd_opt(2004, 6, 1).unwrap(),
            role: volant_domain::UserRole::Learner,
            license_date: None,
            license_number: None,
            logbook_number: Some("LB-1204".to_owned()),
        };

        UserStore::insert(&store, user.clone()).await.unwrap();
        let err = UserStore::insert(&store, user).await.unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));
    }
}
