use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use vista_api::middleware::auth::{issue_token, StaffClaims, ROLE_ADMIN, ROLE_STAFF};
use vista_api::{app, AppState};
use vista_core::Airport;
use vista_store::app_config::Config;
use vista_store::{FleetSeed, InMemoryAirportDirectory, InMemoryFleetCatalog};

const SECRET: &str = "integration-secret";
const AIRCRAFT_ID: &str = "6f1c2a3e-9b0d-4c5e-8f7a-1b2c3d4e5f60";
const YACHT_ID: &str = "0a9b8c7d-6e5f-4a3b-8c1d-2e3f4a5b6c7d";

fn test_config() -> Config {
    serde_json::from_value(json!({
        "server": { "port": 0 },
        "auth": { "jwt_secret": SECRET },
        "pricing": { "default_commission_pct": 12.0 },
        "notifications": { "timeout_ms": 500, "failure_threshold": 3, "reset_timeout_secs": 30 },
        "seed": { "airports_path": "unused", "fleet_path": "unused" }
    }))
    .unwrap()
}

fn test_app() -> (Router, AppState) {
    let airports: Vec<Airport> = serde_json::from_value(json!([
        { "code": "JFK", "name": "John F. Kennedy International", "city": "New York", "country": "USA",
          "latitude": 40.6413, "longitude": -73.7781 },
        { "code": "LHR", "name": "Heathrow", "city": "London", "country": "UK",
          "latitude": 51.4700, "longitude": -0.4543 }
    ]))
    .unwrap();
    let fleet: FleetSeed = serde_json::from_value(json!({
        "aircraft": [{
            "id": AIRCRAFT_ID, "name": "Gulfstream G650", "model": "G650", "category": "ultra_long",
            "passenger_capacity": 14, "range_km": 12964, "cruise_speed_kmh": 900.0,
            "hourly_rate_cents": 1_200_000
        }],
        "yachts": [{
            "id": YACHT_ID, "name": "Azure Horizon", "size_category": "large", "length_meters": 45.0,
            "guest_capacity": 12, "crew_count": 9, "daily_rate_cents": 4_500_000, "home_port": "Monaco"
        }]
    }))
    .unwrap();

    let state = AppState::assemble(
        &test_config(),
        Arc::new(InMemoryAirportDirectory::new(airports).unwrap()),
        Arc::new(InMemoryFleetCatalog::new(fleet)),
    )
    .unwrap();

    (app(state.clone()), state)
}

fn token(role: &str) -> String {
    let claims = StaffClaims {
        sub: "staff-1".to_string(),
        email: "ops@vista.example".to_string(),
        role: role.to_string(),
        exp: 4_102_444_800,
    };
    issue_token(SECRET, &claims).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn flight_submission(email: &str) -> Value {
    json!({
        "requester": { "name": "Jane Doe", "email": email },
        "details": {
            "kind": "flight_booking",
            "origin": "JFK",
            "destination": "LHR",
            "departure_date": "2025-06-01",
            "passenger_count": 4
        }
    })
}

fn charter_submission(email: &str) -> Value {
    json!({
        "requester": { "name": "Sam Lee", "email": email },
        "details": {
            "kind": "yacht_charter",
            "yacht_id": YACHT_ID,
            "departure_port": "Monaco",
            "charter_start": "2025-07-01",
            "charter_end": "2025-07-05",
            "guest_count": 8
        }
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_airport_search() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/v1/airports?search=london", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let airports = body.as_array().unwrap();
    assert_eq!(airports.len(), 1);
    assert_eq!(airports[0]["code"], "LHR");
}

#[tokio::test]
async fn test_fleet_listing_filters_by_category() {
    let (app, _) = test_app();
    let (_, body) = send(&app, Method::GET, "/v1/fleet/aircraft?category=ultra_long", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/v1/fleet/aircraft?category=light", None, None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quick_quote() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/quick-quote",
        None,
        Some(json!({ "origin": "jfk", "destination": "LHR", "aircraft_id": AIRCRAFT_ID })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aircraft_name"], "Gulfstream G650");
    assert!(body["estimated_price_cents"].as_i64().unwrap() > 0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/quick-quote",
        None,
        Some(json!({ "origin": "JF", "destination": "LHR", "aircraft_id": AIRCRAFT_ID })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/quick-quote",
        None,
        Some(json!({ "origin": "CDG", "destination": "LHR", "aircraft_id": AIRCRAFT_ID })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_and_track() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::POST, "/v1/reservations", None, Some(flight_submission("jane@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reservation"]["status"], "inquiry");
    let reference = body["reference"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/reservations/flight_booking/track/{}", reference),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inquiry");

    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/reservations/flight_booking?email=JANE@example.com",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tracking_failures_read_as_not_found() {
    let (app, _) = test_app();
    let (_, body) = send(&app, Method::POST, "/v1/reservations", None, Some(flight_submission("jane@example.com"))).await;
    let reference = body["reference"].as_str().unwrap().to_string();

    for uri in [
        format!("/v1/reservations/yacht_charter/track/{}", reference),
        "/v1/reservations/flight_booking/track/not-a-uuid".to_string(),
        format!("/v1/reservations/spaceship/track/{}", reference),
    ] {
        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], "Reservation not found.");
    }
}

#[tokio::test]
async fn test_email_lookup_requires_email() {
    let (app, _) = test_app();
    let (status, _) = send(&app, Method::GET, "/v1/reservations/flight_booking", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_staff_routes_require_token() {
    let (app, _) = test_app();
    let (status, _) = send(&app, Method::GET, "/v1/admin/commission", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/v1/admin/commission", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_staff_quotes_then_confirms() {
    let (app, _) = test_app();
    let staff = token(ROLE_STAFF);
    let (_, body) = send(&app, Method::POST, "/v1/reservations", None, Some(flight_submission("jane@example.com"))).await;
    let reference = body["reference"].as_str().unwrap().to_string();
    let uri = format!("/v1/admin/reservations/flight_booking/{}", reference);

    // A price alone cannot sit on an inquiry.
    let (status, _) = send(&app, Method::PATCH, &uri, Some(&staff), Some(json!({ "quoted_price_cents": 1_597_500 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&staff),
        Some(json!({ "status": "quoted", "quoted_price_cents": 1_597_500, "message": "Quote attached", "notify": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reservation"]["status"], "quoted");
    assert_eq!(body["reservation"]["version"], 2);
    assert_eq!(body["notification"]["status"], "sent");
    assert_eq!(body["reservation"]["timeline"][1]["by"], "ops@vista.example");

    // Stale version is rejected.
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&staff),
        Some(json!({ "status": "confirmed", "expected_version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&staff),
        Some(json!({ "status": "confirmed", "expected_version": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reservation"]["status"], "confirmed");

    let (_, audit) = send(&app, Method::GET, "/v1/admin/notifications", Some(&staff), None).await;
    let audit = audit.as_array().unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0]["recipient"], "j***@example.com");
}

#[tokio::test]
async fn test_route_and_charter_quotes() {
    let (app, _) = test_app();
    let staff = token(ROLE_STAFF);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/admin/route-quote",
        Some(&staff),
        Some(json!({ "origin": "JFK", "destination": "LHR", "aircraft_id": AIRCRAFT_ID, "passengers": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quoted_by"], "ops@vista.example");
    assert!(body["quote"]["breakdown"]["grand_total_cents"].as_i64().unwrap() > 0);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/admin/charter-quote",
        Some(&staff),
        Some(json!({ "yacht_id": YACHT_ID, "charter_start": "2025-07-01", "charter_end": "2025-07-05", "guests": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nights"], 4);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/admin/charter-quote",
        Some(&staff),
        Some(json!({ "yacht_id": YACHT_ID, "charter_start": "2025-07-05", "charter_end": "2025-07-01", "guests": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_commission_changes_need_admin() {
    let (app, state) = test_app();
    let mut events = state.events.subscribe();

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/admin/commission",
        Some(&token(ROLE_STAFF)),
        Some(json!({ "rate_pct": 8.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token(ROLE_ADMIN);
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/admin/commission",
        Some(&admin),
        Some(json!({ "rate_pct": 8.0, "note": "Summer promotion" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 2);

    let (_, body) = send(&app, Method::GET, "/v1/admin/commission", Some(&admin), None).await;
    assert_eq!(body["current"]["rate_pct"], 8.0);
    assert_eq!(body["owner_share_pct"], 92.0);
    assert_eq!(body["history"].as_array().unwrap().len(), 2);

    let event = events.try_recv().unwrap();
    assert_eq!(event.topic(), "commission.rate_changed");
}

#[tokio::test]
async fn test_yacht_charters_cannot_be_deleted() {
    let (app, _) = test_app();
    let staff = token(ROLE_STAFF);

    let (_, body) = send(&app, Method::POST, "/v1/reservations", None, Some(charter_submission("sam@example.com"))).await;
    let charter = body["reference"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/v1/admin/reservations/yacht_charter/{}", charter),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, Method::POST, "/v1/reservations", None, Some(flight_submission("jane@example.com"))).await;
    let flight = body["reference"].as_str().unwrap().to_string();
    let uri = format!("/v1/admin/reservations/flight_booking/{}", flight);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&staff), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, Some(&staff), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attached_quote_keeps_its_commission_after_rate_change() {
    let (app, _) = test_app();
    let staff = token(ROLE_STAFF);
    let admin = token(ROLE_ADMIN);

    let (_, quoted) = send(
        &app,
        Method::POST,
        "/v1/admin/route-quote",
        Some(&staff),
        Some(json!({ "origin": "JFK", "destination": "LHR", "aircraft_id": AIRCRAFT_ID, "passengers": 4 })),
    )
    .await;
    let breakdown = quoted["quote"]["breakdown"].clone();
    assert_eq!(breakdown["commission_pct"], 12.0);

    let (_, body) = send(&app, Method::POST, "/v1/reservations", None, Some(flight_submission("jane@example.com"))).await;
    let uri = format!("/v1/admin/reservations/flight_booking/{}", body["reference"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&staff),
        Some(json!({ "status": "quoted", "quote_breakdown": breakdown })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reservation"]["quoted_price_cents"], breakdown["grand_total_cents"]);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/admin/commission",
        Some(&admin),
        Some(json!({ "rate_pct": 8.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, stored) = send(&app, Method::GET, &uri, Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["quote_breakdown"], breakdown);
    assert_eq!(stored["quote_breakdown"]["commission_pct"], 12.0);
    assert_eq!(stored["quote_breakdown"]["commission_version"], 1);
}

#[tokio::test]
async fn test_breakdown_price_mismatch_is_rejected() {
    let (app, _) = test_app();
    let staff = token(ROLE_STAFF);

    let (_, quoted) = send(
        &app,
        Method::POST,
        "/v1/admin/route-quote",
        Some(&staff),
        Some(json!({ "origin": "JFK", "destination": "LHR", "aircraft_id": AIRCRAFT_ID, "passengers": 4 })),
    )
    .await;
    let breakdown = quoted["quote"]["breakdown"].clone();

    let (_, body) = send(&app, Method::POST, "/v1/reservations", None, Some(flight_submission("jane@example.com"))).await;
    let uri = format!("/v1/admin/reservations/flight_booking/{}", body["reference"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&staff),
        Some(json!({ "status": "quoted", "quoted_price_cents": 1, "quote_breakdown": breakdown })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
