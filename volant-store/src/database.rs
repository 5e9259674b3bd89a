use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

use volant_core::StoreError;

use crate::app_config::DatabaseConfig;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}

/// Translate driver-level failures into the store taxonomy. Unique and
/// exclusion violations carry their constraint so callers can branch on
/// which rule fired.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        match db.code().as_deref() {
            Some("23505") => {
                return match db.constraint() {
                    Some("users_email_key") => StoreError::EmailTaken,
                    Some("vehicles_plate_key") => StoreError::PlateTaken,
                    other => StoreError::Conflict(format!(
                        "unique constraint violated: {}",
                        other.unwrap_or("unknown")
                    )),
                };
            }
            // Exclusion violation: the bookings no-overlap backstop fired.
            Some("23P01") => return StoreError::Conflict(db.message().to_owned()),
            _ => {}
        }
    }
    StoreError::Unavailable(err.to_string())
}
