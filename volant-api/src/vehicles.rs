use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use volant_domain::{NewVehicle, Vehicle, VehicleUpdate};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", post(create_vehicle).get(list_vehicles))
        .route(
            "/cars/{vehicle_id}",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(req): Json<NewVehicle>,
) -> Result<Json<Vehicle>, AppError> {
    let vehicle = state.vehicles.insert(req).await?;
    tracing::info!("Added vehicle {} ({})", vehicle.id, vehicle.plate);
    Ok(Json(vehicle))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    let vehicle = state
        .vehicles
        .get(vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;
    Ok(Json(vehicle))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    Ok(Json(state.vehicles.list_all().await?))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Json(req): Json<VehicleUpdate>,
) -> Result<Json<Vehicle>, AppError> {
    let vehicle = state.vehicles.update(vehicle_id, req).await?;
    Ok(Json(vehicle))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.vehicles.delete(vehicle_id).await?;
    Ok(Json(json!({ "message": "Vehicle deleted" })))
}
