use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;
use volant_domain::{CompanionLink, NewCompanionLink, UserRole};

#[derive(Debug, Deserialize)]
pub struct CreatePairingRequest {
    pub learner_id: Option<Uuid>,
    pub companion_id: Option<Uuid>,
    pub relation: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pairings", post(create_pairing))
        .route("/pairings/{learner_id}", get(list_pairings))
}

async fn create_pairing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePairingRequest>,
) -> Result<Json<CompanionLink>, AppError> {
    let caller = state
        .users
        .get(claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // The caller fills their own side of the pairing.
    let (learner_id, companion_id) = match caller.role {
        UserRole::Learner => (
            caller.id,
            req.companion_id
                .ok_or_else(|| AppError::Validation("companion_id is required".to_string()))?,
        ),
        UserRole::Companion => (
            req.learner_id
                .ok_or_else(|| AppError::Validation("learner_id is required".to_string()))?,
            caller.id,
        ),
    };

    let learner = state.users.get(learner_id).await?;
    if !learner.is_some_and(|u| u.role == UserRole::Learner) {
        return Err(AppError::Validation(
            "The specified learner does not hold the learner role".to_string(),
        ));
    }
    let companion = state.users.get(companion_id).await?;
    if !companion.is_some_and(|u| u.role == UserRole::Companion) {
        return Err(AppError::Validation(
            "The specified companion does not hold the companion role".to_string(),
        ));
    }

    let link = state
        .pairings
        .insert(NewCompanionLink {
            learner_id,
            companion_id,
            relation: req.relation,
        })
        .await?;

    Ok(Json(link))
}

async fn list_pairings(
    State(state): State<AppState>,
    Path(learner_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<CompanionLink>>, AppError> {
    if claims.user_id()? != learner_id {
        return Err(AppError::Authorization(
            "You may only view your own companions".to_string(),
        ));
    }

    let links = state.pairings.list_for_learner(learner_id).await?;
    if links.is_empty() {
        return Err(AppError::NotFound(
            "No companions found for this learner".to_string(),
        ));
    }
    Ok(Json(links))
}
