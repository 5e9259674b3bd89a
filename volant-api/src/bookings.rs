use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    routing::post,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;
use volant_domain::{Booking, BookingChange, BookingPurpose, BookingStatus, NewBooking, Vehicle};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    // user_id comes from the token, not the body
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: BookingPurpose,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub vehicle_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub purpose: Option<BookingPurpose>,
    pub status: Option<BookingStatus>,
}

/// A booking joined with its vehicle, for the caller's own listing.
#[derive(Debug, Serialize)]
pub struct BookingWithVehicle {
    #[serde(flatten)]
    pub booking: Booking,
    pub vehicle: Option<Vehicle>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/user", get(my_bookings))
        .route(
            "/bookings/{booking_id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let user_id = claims.user_id()?;

    state
        .vehicles
        .get(req.vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

    // Admission is entirely the scheduler's call; the route never inspects
    // other bookings itself.
    let booking = state
        .scheduler
        .propose(NewBooking {
            vehicle_id: req.vehicle_id,
            user_id,
            start_time: req.start_time,
            end_time: req.end_time,
            purpose: req.purpose,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_all().await?))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<BookingWithVehicle>>, AppError> {
    let user_id = claims.user_id()?;

    let mut out = Vec::new();
    for booking in state.bookings.list_for_user(user_id).await? {
        let vehicle = state.vehicles.get(booking.vehicle_id).await?;
        out.push(BookingWithVehicle { booking, vehicle });
    }
    Ok(Json(out))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .get(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    Ok(Json(booking))
}

async fn update_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let current = state
        .bookings
        .get(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    if current.user_id != claims.user_id()? {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    let booking = match req.status {
        Some(status) => {
            if req.vehicle_id.is_some() || req.start_time.is_some() || req.end_time.is_some() {
                return Err(AppError::Validation(
                    "Status transitions cannot be combined with interval changes".to_string(),
                ));
            }
            match status {
                BookingStatus::Cancelled => state.scheduler.cancel(booking_id).await?,
                BookingStatus::Completed => state.scheduler.complete(booking_id).await?,
                BookingStatus::Confirmed => {
                    return Err(AppError::Validation(
                        "Reinstating a booking requires a new proposal".to_string(),
                    ));
                }
            }
        }
        None => {
            state
                .scheduler
                .reschedule(
                    booking_id,
                    BookingChange {
                        vehicle_id: req.vehicle_id,
                        start_time: req.start_time,
                        end_time: req.end_time,
                        purpose: req.purpose,
                    },
                )
                .await?
        }
    };

    Ok(Json(booking))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let current = state
        .bookings
        .get(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    if current.user_id != claims.user_id()? {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    state.scheduler.remove(booking_id).await?;
    Ok(Json(json!({ "message": "Booking deleted" })))
}
