use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use volant_core::repository::UserStore;
use volant_core::{StoreError, StoreResult};
use volant_domain::{NewUser, User, UserUpdate};

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    phone: String,
    address: String,
    birth_date: chrono::NaiveDate,
    role: String,
    license_date: Option<chrono::NaiveDate>,
    license_number: Option<String>,
    logbook_number: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, StoreError> {
        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            address: row.address,
            birth_date: row.birth_date,
            role: row.role.parse().map_err(StoreError::Validation)?,
            license_date: row.license_date,
            license_number: row.license_number,
            logbook_number: row.logbook_number,
        })
    }
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, phone, address, \
                            birth_date, role, license_date, license_number, logbook_number";

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users \
             (id, first_name, last_name, email, password_hash, phone, address, \
              birth_date, role, license_date, license_number, logbook_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.birth_date)
        .bind(user.role.as_str())
        .bind(user.license_date)
        .bind(&user.license_number)
        .bind(&user.logbook_number)
        .fetch_one(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        row.try_into()
    }

    async fn get(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        let row =
            sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(crate::database::map_sqlx_err)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        row.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY last_name ASC, first_name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user_id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             email = COALESCE($4, email), \
             phone = COALESCE($5, phone), \
             address = COALESCE($6, address), \
             birth_date = COALESCE($7, birth_date), \
             license_date = COALESCE($8, license_date), \
             license_number = COALESCE($9, license_number), \
             logbook_number = COALESCE($10, logbook_number) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.email)
        .bind(update.phone)
        .bind(update.address)
        .bind(update.birth_date)
        .bind(update.license_date)
        .bind(update.license_number)
        .bind(update.logbook_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?
        .ok_or(StoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;

        row.try_into()
    }

    async fn delete(&self, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(crate::database::map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "user",
                id: user_id,
            });
        }
        Ok(())
    }
}
