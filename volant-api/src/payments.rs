use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    pub amount_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "eur".to_string()
}

#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    pub intent_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub client_secret: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/payments/intent", post(create_payment_intent))
}

async fn create_payment_intent(
    State(state): State<AppState>,
    Json(req): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let intent = state
        .payments
        .create_intent(req.amount_cents, &req.currency)
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(PaymentIntentResponse {
        intent_id: intent.id,
        amount_cents: intent.amount_cents,
        currency: intent.currency,
        client_secret: intent.client_secret,
    }))
}
