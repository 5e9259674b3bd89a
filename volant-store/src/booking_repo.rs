use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use volant_core::repository::BookingStore;
use volant_core::{StoreError, StoreResult};
use volant_domain::{Booking, BookingPatch, NewBooking};

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    vehicle_id: Uuid,
    user_id: Uuid,
    start_time: chrono::DateTime<Utc>,
    end_time: chrono::DateTime<Utc>,
    purpose: String,
    status: String,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, StoreError> {
        Ok(Booking {
            id: row.id,
            vehicle_id: row.vehicle_id,
            user_id: row.user_id,
            start_time: row.start_time,
            end_time: row.end_time,
            purpose: row.purpose.parse().map_err(StoreError::Validation)?,
            status: row.status.parse().map_err(StoreError::Validation)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn collect(rows: Vec<BookingRow>) -> StoreResult<Vec<Booking>> {
    rows.into_iter().map(Booking::try_from).collect()
}

const BOOKING_COLUMNS: &str =
    "id, vehicle_id, user_id, start_time, end_time, purpose, status, created_at, updated_at";

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn list_active_for_vehicle(&self, vehicle_id: Uuid) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE vehicle_id = $1 AND status = 'confirmed' \
             ORDER BY start_time ASC"
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        collect(rows)
    }

    async fn insert(&self, booking: NewBooking) -> StoreResult<Booking> {
        if booking.start_time >= booking.end_time {
            return Err(StoreError::Validation(
                "start time must be strictly before end time".to_owned(),
            ));
        }

        let now = Utc::now();
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings \
             (id, vehicle_id, user_id, start_time, end_time, purpose, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 'confirmed', $7, $7) \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(booking.vehicle_id)
        .bind(booking.user_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.purpose.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        row.try_into()
    }

    async fn update(&self, booking_id: Uuid, patch: BookingPatch) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET \
             vehicle_id = COALESCE($2, vehicle_id), \
             start_time = COALESCE($3, start_time), \
             end_time = COALESCE($4, end_time), \
             purpose = COALESCE($5, purpose), \
             status = COALESCE($6, status), \
             updated_at = $7 \
             WHERE id = $1 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .bind(patch.vehicle_id)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.purpose.map(|p| p.as_str()))
        .bind(patch.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?
        .ok_or(StoreError::NotFound {
            entity: "booking",
            id: booking_id,
        })?;

        row.try_into()
    }

    async fn delete(&self, booking_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await
            .map_err(crate::database::map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "booking",
                id: booking_id,
            });
        }
        Ok(())
    }

    async fn get(&self, booking_id: Uuid) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_all(&self) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY start_time ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        collect(rows)
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY start_time ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        collect(rows)
    }
}
