use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresPaymentMethod,
    Processing,
    Succeeded,
    Canceled,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent id (e.g. pi_123).
    pub id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub client_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Seam to the payment provider. The HTTP layer only ever creates intents;
/// capture and settlement belong to the provider's own dashboard.
#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, Box<dyn std::error::Error + Send + Sync>>;
}

/// Stand-in provider used outside production deployments.
pub struct MockPaymentAdapter;

#[async_trait]
impl PaymentAdapter for MockPaymentAdapter {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, Box<dyn std::error::Error + Send + Sync>> {
        if amount_cents <= 0 {
            return Err("amount must be positive".into());
        }

        let id = format!("pi_{}", Uuid::new_v4().simple());
        tracing::info!("Created mock payment intent {} for {} {}", id, amount_cents, currency);

        Ok(PaymentIntent {
            client_secret: Some(format!("{id}_secret_{}", Uuid::new_v4().simple())),
            id,
            amount_cents,
            currency: currency.to_owned(),
            status: PaymentStatus::RequiresPaymentMethod,
            created_at: Utc::now(),
        })
    }
}
