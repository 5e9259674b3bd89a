use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{check_role_fields, hash_password, RegisterRequest};
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;
use volant_domain::{NewUser, User, UserRole, UserUpdate};

/// What the API exposes about an account; the password hash never leaves
/// the store layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub role: UserRole,
    pub license_date: Option<NaiveDate>,
    pub license_number: Option<String>,
    pub logbook_number: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            birth_date: user.birth_date,
            role: user.role,
            license_date: user.license_date,
            license_number: user.license_number,
            logbook_number: user.logbook_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub license_date: Option<NaiveDate>,
    pub license_number: Option<String>,
    pub logbook_number: Option<String>,
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
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

    Ok(Json(user.into()))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user.into()))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.users.list_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if claims.user_id()? != user_id {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    let user = state
        .users
        .update(
            user_id,
            UserUpdate {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
                address: req.address,
                birth_date: req.birth_date,
                license_date: req.license_date,
                license_number: req.license_number,
                logbook_number: req.logbook_number,
            },
        )
        .await?;

    Ok(Json(user.into()))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    if claims.user_id()? != user_id {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    state.users.delete(user_id).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}
