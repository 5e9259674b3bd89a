use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use volant_api::{
    app,
    state::{AppState, AuthConfig},
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volant_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = volant_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Volant API on port {}", config.server.port);

    let db = volant_store::DbClient::new(&config.database)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let bookings = Arc::new(volant_store::PgBookingStore::new(db.pool.clone()));
    let scheduler = Arc::new(volant_booking::ConflictScheduler::new(
        bookings.clone(),
        Duration::from_millis(config.scheduler.lock_timeout_ms),
    ));

    let app_state = AppState {
        users: Arc::new(volant_store::PgUserStore::new(db.pool.clone())),
        vehicles: Arc::new(volant_store::PgVehicleStore::new(db.pool.clone())),
        bookings,
        pairings: Arc::new(volant_store::PgCompanionStore::new(db.pool.clone())),
        scheduler,
        payments: Arc::new(volant_core::payment::MockPaymentAdapter),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration_seconds: config.auth.jwt_expiration_seconds,
        },
        cors_allowed_origins: config.cors.allowed_origins.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
