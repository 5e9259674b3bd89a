use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod middleware;
pub mod pairings;
pub mod payments;
pub mod state;
pub mod users;
pub mod vehicles;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_allowed_origins);

    let public = Router::new()
        .route("/", get(home))
        .merge(auth::routes())
        .merge(users::public_routes())
        .merge(vehicles::routes())
        .merge(payments::routes());

    let protected = Router::new()
        .merge(auth::me_routes())
        .merge(users::routes())
        .merge(bookings::routes())
        .merge(pairings::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to Volant" }))
}
