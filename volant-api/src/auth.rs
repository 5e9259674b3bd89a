use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;
use volant_domain::{NewUser, User, UserRole};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub role: UserRole,
    pub license_date: Option<NaiveDate>,
    pub license_number: Option<String>,
    pub logbook_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    check_role_fields(
        req.role,
        &req.license_number,
        &req.license_date,
        &req.logbook_number,
    )?;

    let user = state
        .users
        .insert(NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password_hash: hash_password(&req.password)?,
            phone: req.phone,
            address: req.address,
            birth_date: req.birth_date,
            role: req.role,
            license_date: req.license_date,
            license_number: match req.role {
                UserRole::Companion => req.license_number,
                UserRole::Learner => None,
            },
            logbook_number: match req.role {
                UserRole::Learner => req.logbook_number,
                UserRole::Companion => None,
            },
        })
        .await?;

    tracing::info!("Registered {} account {}", user.role, user.id);
    Ok(Json(issue_token(&state, &user)?))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .filter(|u| verify_password(&req.password, &u.password_hash))
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    Ok(Json(issue_token(&state, &user)?))
}

async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MeResponse>, AppError> {
    let user_id = claims.user_id()?;
    let user = state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        role: user.role,
    }))
}

fn issue_token(state: &AppState, user: &User) -> Result<TokenResponse, AppError> {
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration_seconds as i64)).timestamp()
            as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token encoding failed: {e}")))?;

    Ok(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    })
}

/// Role-conditional registration rule: learners carry a logbook number,
/// companions a license number and the date it was obtained.
pub(crate) fn check_role_fields(
    role: UserRole,
    license_number: &Option<String>,
    license_date: &Option<NaiveDate>,
    logbook_number: &Option<String>,
) -> Result<(), AppError> {
    match role {
        UserRole::Learner => {
            if logbook_number.is_none() {
                return Err(AppError::Validation(
                    "A learner must have a logbook number".to_string(),
                ));
            }
        }
        UserRole::Companion => {
            if license_number.is_none() {
                return Err(AppError::Validation(
                    "A companion must have a license number".to_string(),
                ));
            }
            if license_date.is_none() {
                return Err(AppError::Validation(
                    "A companion must have a license date".to_string(),
                ));
            }
        }
    }
    Ok(())
}

pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::SaltString;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
