use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use volant_core::repository::VehicleStore;
use volant_core::{StoreError, StoreResult};
use volant_domain::{NewVehicle, Vehicle, VehicleUpdate};

pub struct PgVehicleStore {
    pool: PgPool,
}

impl PgVehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    name: String,
    model: String,
    build_year: i32,
    category: String,
    plate: String,
    inspection_due: chrono::NaiveDate,
    price_per_hour_cents: i32,
    available: bool,
    image_url: Option<String>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = StoreError;

    fn try_from(row: VehicleRow) -> Result<Self, StoreError> {
        Ok(Vehicle {
            id: row.id,
            name: row.name,
            model: row.model,
            build_year: row.build_year,
            category: row.category.parse().map_err(StoreError::Validation)?,
            plate: row.plate,
            inspection_due: row.inspection_due,
            price_per_hour_cents: row.price_per_hour_cents,
            available: row.available,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const VEHICLE_COLUMNS: &str = "id, name, model, build_year, category, plate, inspection_due, \
                               price_per_hour_cents, available, image_url, created_at, updated_at";

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn insert(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "INSERT INTO vehicles \
             (id, name, model, build_year, category, plate, inspection_due, \
              price_per_hour_cents, available, image_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9, $10, $10) \
             RETURNING {VEHICLE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&vehicle.name)
        .bind(&vehicle.model)
        .bind(vehicle.build_year)
        .bind(vehicle.category.as_str())
        .bind(&vehicle.plate)
        .bind(vehicle.inspection_due)
        .bind(vehicle.price_per_hour_cents)
        .bind(&vehicle.image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        row.try_into()
    }

    async fn get(&self, vehicle_id: Uuid) -> StoreResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1"
        ))
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn list_all(&self) -> StoreResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        rows.into_iter().map(Vehicle::try_from).collect()
    }

    async fn update(&self, vehicle_id: Uuid, update: VehicleUpdate) -> StoreResult<Vehicle> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "UPDATE vehicles SET \
             name = COALESCE($2, name), \
             model = COALESCE($3, model), \
             build_year = COALESCE($4, build_year), \
             category = COALESCE($5, category), \
             plate = COALESCE($6, plate), \
             inspection_due = COALESCE($7, inspection_due), \
             price_per_hour_cents = COALESCE($8, price_per_hour_cents), \
             available = COALESCE($9, available), \
             image_url = COALESCE($10, image_url), \
             updated_at = $11 \
             WHERE id = $1 \
             RETURNING {VEHICLE_COLUMNS}"
        ))
        .bind(vehicle_id)
        .bind(update.name)
        .bind(update.model)
        .bind(update.build_year)
        .bind(update.category.map(|c| c.as_str()))
        .bind(update.plate)
        .bind(update.inspection_due)
        .bind(update.price_per_hour_cents)
        .bind(update.available)
        .bind(update.image_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?
        .ok_or(StoreError::NotFound {
            entity: "vehicle",
            id: vehicle_id,
        })?;

        row.try_into()
    }

    async fn delete(&self, vehicle_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .execute(&self.pool)
            .await
            .map_err(crate::database::map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "vehicle",
                id: vehicle_id,
            });
        }
        Ok(())
    }
}
