use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use volant_api::{
    app,
    state::{AppState, AuthConfig},
};
use volant_booking::ConflictScheduler;
use volant_core::payment::MockPaymentAdapter;
use volant_store::MemoryStore;

fn test_app() -> axum::Router {
    let store = Arc::new(MemoryStore::new());
    let scheduler = Arc::new(ConflictScheduler::new(
        store.clone(),
        Duration::from_secs(5),
    ));

    app(AppState {
        users: store.clone(),
        vehicles: store.clone(),
        bookings: store.clone(),
        pairings: store,
        scheduler,
        payments: Arc::new(MockPaymentAdapter),
        auth: AuthConfig {
            secret: "integration-test-secret".to_string(),
            expiration_seconds: 3600,
        },
        cors_allowed_origins: vec!["*".to_string()],
    })
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register_learner(app: &axum::Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "first_name": "Lina",
            "last_name": "Moreau",
            "email": email,
            "password": "s3cret-pass",
            "phone": "0612345678",
            "address": "4 avenue de la Gare",
            "birth_date": "2005-02-17",
            "role": "learner",
            "logbook_number": "LB-0042",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_car(app: &axum::Router, plate: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/cars",
        None,
        Some(json!({
            "name": "Clio école",
            "model": "Renault Clio V",
            "build_year": 2022,
            "category": "dual_control",
            "plate": plate,
            "inspection_due": "2027-01-15",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "car creation failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn booking_conflicts_surface_as_409() {
    let app = test_app();
    let token = register_learner(&app, "lina@example.com").await;
    let car_id = create_car(&app, "AB-123-CD").await;

    let (status, first) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "vehicle_id": car_id,
            "start_time": "2026-09-01T10:00:00Z",
            "end_time": "2026-09-01T11:00:00Z",
            "purpose": "self",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "confirmed");

    // Overlapping interval on the same car is a conflict, not a 500.
    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "vehicle_id": car_id,
            "start_time": "2026-09-01T10:30:00Z",
            "end_time": "2026-09-01T11:30:00Z",
            "purpose": "self",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "vehicle already booked for the requested interval"
    );

    // Back-to-back is fine.
    let (status, _) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "vehicle_id": car_id,
            "start_time": "2026-09-01T11:00:00Z",
            "end_time": "2026-09-01T12:00:00Z",
            "purpose": "self",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn cancelling_a_booking_reopens_the_slot() {
    let app = test_app();
    let token = register_learner(&app, "marc@example.com").await;
    let car_id = create_car(&app, "EF-456-GH").await;

    let slot = json!({
        "vehicle_id": car_id,
        "start_time": "2026-09-02T14:00:00Z",
        "end_time": "2026-09-02T15:00:00Z",
        "purpose": "accompanied",
    });

    let (status, created) = send(&app, "POST", "/bookings", Some(&token), Some(slot.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = created["id"].as_str().unwrap();

    let (status, cancelled) = send(
        &app,
        "PUT",
        &format!("/bookings/{booking_id}"),
        Some(&token),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = send(&app, "POST", "/bookings", Some(&token), Some(slot)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_intervals_are_rejected_with_400() {
    let app = test_app();
    let token = register_learner(&app, "zoe@example.com").await;
    let car_id = create_car(&app, "IJ-789-KL").await;

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "vehicle_id": car_id,
            "start_time": "2026-09-03T10:00:00Z",
            "end_time": "2026-09-03T10:00:00Z",
            "purpose": "self",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "start time must be strictly before end time");
}

#[tokio::test]
async fn booking_routes_require_a_token() {
    let app = test_app();
    let car_id = create_car(&app, "MN-012-OP").await;

    let (status, _) = send(
        &app,
        "POST",
        "/bookings",
        None,
        Some(json!({
            "vehicle_id": car_id,
            "start_time": "2026-09-01T10:00:00Z",
            "end_time": "2026-09-01T11:00:00Z",
            "purpose": "self",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/bookings", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_and_me_round_trip() {
    let app = test_app();
    register_learner(&app, "amel@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "amel@example.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, me) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "amel@example.com");
    assert_eq!(me["role"], "learner");

    // Wrong password is a 401, not a 404.
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "amel@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn payment_intents_come_back_with_a_client_secret() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/payments/intent",
        None,
        Some(json!({ "amount_cents": 4000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["intent_id"].as_str().unwrap().starts_with("pi_"));
    assert!(body["client_secret"].is_string());
    assert_eq!(body["currency"], "eur");
}
