use std::sync::Arc;

use volant_booking::ConflictScheduler;
use volant_core::payment::PaymentAdapter;
use volant_core::repository::{BookingStore, CompanionStore, UserStore, VehicleStore};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration_seconds: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub vehicles: Arc<dyn VehicleStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub pairings: Arc<dyn CompanionStore>,
    pub scheduler: Arc<ConflictScheduler>,
    pub payments: Arc<dyn PaymentAdapter>,
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}
