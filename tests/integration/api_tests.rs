//! API integration tests
//!
//! Run against a live server with an empty database:
//! `FLEET_TEST_ADMIN_PASSWORD=... cargo test -- --ignored`

use chrono::{Duration, Local};
use rand::Rng;
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn admin_password() -> String {
    std::env::var("FLEET_TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".to_string())
}

/// Random plate in the current format (four letters, two digits)
fn unique_plate() -> String {
    let mut rng = rand::thread_rng();
    let letters: String = (0..4).map(|_| rng.gen_range(b'B'..=b'Z') as char).collect();
    format!("{}{:02}", letters, rng.gen_range(0..100))
}

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": admin_password()
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn create_vehicle(client: &Client, token: &str, initial_mileage_km: Option<i32>) -> Value {
    let response = client
        .post(format!("{}/vehicles", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "plate": unique_plate(),
            "brand": "Volvo",
            "vehicle_type": "Tracto",
            "operational_role": "TITULAR",
            "capacity_m3": 30,
            "workshop": "ZMC",
            "initial_mileage_km": initial_mileage_km,
            "base": "Base Norte"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse vehicle")
}

async fn create_trailer(client: &Client, token: &str) -> Value {
    let response = client
        .post(format!("{}/trailers", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "plate": unique_plate(), "brand": "Randon" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse trailer")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": admin_password()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_requires_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/status/vehicles", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_vehicle_without_data_has_no_status() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let vehicle = create_vehicle(&client, &token, None).await;

    let response = client
        .get(format!("{}/vehicles/{}/status", BASE_URL, vehicle["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["severity"], "SIN_DATOS");
    assert_eq!(body["priority"], 0);
}

#[tokio::test]
#[ignore]
async fn test_expired_document_marks_vehicle_overdue() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let vehicle = create_vehicle(&client, &token, Some(100_000)).await;
    let yesterday = Local::now().date_naive() - Duration::days(1);

    let response = client
        .post(format!("{}/documents", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "entity_kind": "VEHICLE",
            "entity_id": vehicle["id"],
            "category": "SOAP",
            "expiry_date": yesterday.to_string(),
            "url": "https://files.example.com/soap.pdf"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/vehicles/{}/status", BASE_URL, vehicle["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["severity"], "VENCIDO");
    let reasons = body["reasons"].as_array().expect("reasons array");
    assert!(reasons
        .iter()
        .any(|r| r.as_str() == Some("SOAP: Expired 1 day ago")));
}

#[tokio::test]
#[ignore]
async fn test_assignment_exclusivity() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let first = create_vehicle(&client, &token, Some(50_000)).await;
    let second = create_vehicle(&client, &token, Some(60_000)).await;
    let trailer = create_trailer(&client, &token).await;

    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "vehicle_id": first["id"], "trailer_id": trailer["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let assignment: Value = response.json().await.expect("Failed to parse assignment");

    // The trailer is already towed by the first vehicle
    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "vehicle_id": second["id"], "trailer_id": trailer["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "AssignmentConflict");

    // The first vehicle already tows a trailer
    let other_trailer = create_trailer(&client, &token).await;
    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "vehicle_id": first["id"], "trailer_id": other_trailer["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "AssignmentConflict");

    // Same pairing stored inactive, then activated: rejected as well
    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "vehicle_id": first["id"],
            "trailer_id": other_trailer["id"],
            "active": false
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let pending: Value = response.json().await.expect("Failed to parse assignment");

    let response = client
        .post(format!("{}/assignments/{}/activate", BASE_URL, pending["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "AssignmentConflict");

    // The original pairing is still the only active one
    let response = client
        .get(format!(
            "{}/assignments?vehicle_id={}&active=true",
            BASE_URL, first["id"]
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let active: Vec<Value> = response.json().await.expect("Failed to parse assignments");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], assignment["id"]);

    // Free once the first pairing ends
    let response = client
        .post(format!("{}/assignments/{}/deactivate", BASE_URL, assignment["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "vehicle_id": second["id"], "trailer_id": trailer["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_fleet_status_lists_active_vehicles() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let vehicle = create_vehicle(&client, &token, Some(10_000)).await;

    let response = client
        .get(format!("{}/status/vehicles", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let entry = body
        .as_array()
        .expect("entries array")
        .iter()
        .find(|e| e["vehicle_id"] == vehicle["id"])
        .expect("vehicle listed");
    assert!(entry["trailer"].is_null());
}
