//! End-to-end tests of the HTTP API against an in-memory database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use milebook_api::{AppState, create_router};
use milebook_db::Migrator;
use milebook_shared::auth::{ROLE_ADMIN, ROLE_USER};
use milebook_shared::{JwtConfig, JwtService};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
}

impl TestApp {
    async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "api-test-secret".to_string(),
            audience: None,
            token_expires_secs: 900,
        }));
        let router = create_router(AppState {
            db: Arc::new(db),
            jwt_service: jwt.clone(),
        });
        Self { router, jwt }
    }

    fn token(&self, user_id: Uuid, role: &str) -> String {
        self.jwt.issue_token(user_id, role).unwrap()
    }

    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
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

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_vehicle(&self, token: &str, initial_mileage: i64) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/vehicles",
                Some(token),
                Some(json!({ "name": "Company car", "initial_mileage": initial_mileage })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

fn trip(vehicle_id: &str, date: &str, start: i64, end: i64) -> Value {
    json!({
        "vehicle_id": vehicle_id,
        "date": date,
        "start_odometer": start,
        "end_odometer": end,
        "purpose": "Client visit",
        "is_business": true,
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/api/v1/vehicles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app.send("GET", "/api/v1/vehicles", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_trip_lifecycle() {
    let app = TestApp::new().await;
    let token = app.token(Uuid::new_v4(), ROLE_USER);
    let vehicle_id = app.create_vehicle(&token, 1000).await;

    let (status, body) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-03-01", 1000, 1100)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["distance"], 100);
    let trip_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-03-02", 1050, 1200)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
    assert_eq!(body["code"], "TRIP_OVERLAP");

    let (status, body) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-03-02", 900, 950)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BELOW_INITIAL_MILEAGE");

    let (status, body) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-03-02", 2000, i64::MAX)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ODOMETER_OUT_OF_RANGE");

    let (status, body) = app.send("GET", "/api/v1/years/2024", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["business_km"], 100);

    let (status, _) = app
        .send("DELETE", &format!("/api/v1/trips/{trip_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send("GET", &format!("/api/v1/trips/{trip_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The freed interval can be reused.
    let (status, _) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-03-02", 1050, 1200)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_foreign_vehicle_is_not_found() {
    let app = TestApp::new().await;
    let owner = app.token(Uuid::new_v4(), ROLE_USER);
    let stranger = app.token(Uuid::new_v4(), ROLE_USER);
    let vehicle_id = app.create_vehicle(&owner, 0).await;

    let (status, body) = app
        .send("POST", "/api/v1/trips", Some(&stranger), Some(trip(&vehicle_id, "2024-03-01", 10, 20)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "VEHICLE_NOT_FOUND");

    let (status, _) = app
        .send("GET", &format!("/api/v1/vehicles/{vehicle_id}"), Some(&stranger), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_year_lock_blocks_mutations_until_admin_unlocks() {
    let app = TestApp::new().await;
    let user_id = Uuid::new_v4();
    let token = app.token(user_id, ROLE_USER);
    let admin = app.token(Uuid::new_v4(), ROLE_ADMIN);
    let vehicle_id = app.create_vehicle(&token, 0).await;

    let (status, body) = app
        .send("POST", "/api/v1/years/2024/lock", Some(&token), Some(json!({ "reason": "Filed" })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = app.send("GET", "/api/v1/years/2024/lock", Some(&token), None).await;
    assert_eq!(body["is_locked"], true);

    let (status, body) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-06-01", 0, 10)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "LOCKED_PERIOD");

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/receipts",
            Some(&token),
            Some(json!({ "vehicle_id": vehicle_id, "date": "2024-06-01", "amount": "45.50" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "LOCKED_PERIOD");

    // Other years stay writable.
    let (status, _) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2025-01-02", 0, 10)))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let unlock = json!({ "user_id": user_id, "reason": "Amended return" });
    let (status, body) = app
        .send("POST", "/api/v1/years/2024/unlock", Some(&token), Some(unlock.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "UNLOCK_NOT_PERMITTED");

    let (status, body) = app
        .send("POST", "/api/v1/years/2024/unlock", Some(&admin), Some(unlock))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = app
        .send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-06-01", 10, 20)))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send("GET", "/api/v1/years/2024/history", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, ["lock", "unlock"]);
}

#[tokio::test]
async fn test_lock_twice_conflicts() {
    let app = TestApp::new().await;
    let token = app.token(Uuid::new_v4(), ROLE_USER);
    let lock = json!({ "reason": "Filed" });

    let (status, _) = app
        .send("POST", "/api/v1/years/2023/lock", Some(&token), Some(lock.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send("POST", "/api/v1/years/2023/lock", Some(&token), Some(lock))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "YEAR_ALREADY_LOCKED");

    let (status, _) = app
        .send("POST", "/api/v1/years/2023/lock", Some(&token), Some(json!({ "reason": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_receipts_and_year_overview() {
    let app = TestApp::new().await;
    let token = app.token(Uuid::new_v4(), ROLE_USER);
    let vehicle_id = app.create_vehicle(&token, 0).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/receipts",
            Some(&token),
            Some(json!({
                "vehicle_id": vehicle_id,
                "date": "2024-02-10",
                "amount": "60.25",
                "litres": "40.5",
                "vendor": "Fuel Stop",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/receipts",
            Some(&token),
            Some(json!({ "vehicle_id": vehicle_id, "date": "2024-02-11", "amount": "0" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NON_POSITIVE_AMOUNT");

    app.send("POST", "/api/v1/trips", Some(&token), Some(trip(&vehicle_id, "2024-02-10", 0, 120)))
        .await;

    let (status, body) = app.send("GET", "/api/v1/years/2024", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["year"], 2024);
    assert_eq!(body["is_locked"], false);
    assert_eq!(body["totals"]["trip_count"], 1);
    assert_eq!(body["totals"]["business_km"], 120);
    assert_eq!(body["totals"]["receipt_count"], 1);

    let (status, body) = app
        .send("GET", &format!("/api/v1/receipts?vehicle_id={vehicle_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["receipts"].as_array().unwrap().len(), 1);
}
