//! API integration tests against a running server
//!
//! Start the server with a migrated database, then run: cargo test -- --ignored

use chrono::{Datelike, Duration, Local, Weekday};
use reqwest::Client;
use serde_json::{json, Value};

use salon_booking_server::models::auth::{Role, UserClaims};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn token(user_id: &str, role: Role) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: user_id.to_string(),
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&secret)
    .expect("Failed to create token")
}

/// Next Tuesday, never today
fn next_tuesday() -> String {
    let mut date = Local::now().date_naive() + Duration::days(1);
    while date.weekday() != Weekday::Tue {
        date += Duration::days(1);
    }
    date.format("%Y-%m-%d").to_string()
}

/// Create a service and a barber working Tuesdays 10:00-14:00, returns (barber_id, service_id)
async fn setup_barber(client: &Client) -> (i64, i64) {
    let admin = token("admin-it", Role::Admin);

    let response = client
        .post(format!("{}/services", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Corte IT", "duration_minutes": 30, "price": "12.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let service: Value = response.json().await.expect("Failed to parse response");
    let service_id = service["id"].as_i64().expect("No service ID");

    let response = client
        .post(format!("{}/barbers", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "name": "Barber IT",
            "service_ids": [service_id],
            "working_hours": {
                "tuesday": { "morning": { "start": "10:00", "end": "14:00" } }
            }
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let barber: Value = response.json().await.expect("Failed to parse response");

    (barber["id"].as_i64().expect("No barber ID"), service_id)
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
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/services", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_book_then_slot_disappears() {
    let client = Client::new();
    let (barber_id, service_id) = setup_barber(&client).await;
    let user = token("client-it", Role::Client);
    let date = next_tuesday();

    let response = client
        .get(format!("{}/availability?barber_id={}&date={}", BASE_URL, barber_id, date))
        .bearer_auth(&user)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["slots"].as_array().map(Vec::len), Some(17));

    let booking = json!({ "barber_id": barber_id, "date": date, "time": "11:00", "service_id": service_id });
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(&user)
        .json(&booking)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Same slot again: conditional write refuses it
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(&token("other-client-it", Role::Client))
        .json(&booking)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .get(format!("{}/availability?barber_id={}&date={}", BASE_URL, barber_id, date))
        .bearer_auth(&user)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let slots = body["slots"].as_array().expect("No slots");
    assert_eq!(slots.len(), 16);
    assert!(!slots.contains(&json!("11:00")));
}

#[tokio::test]
#[ignore]
async fn test_weekly_repeat() {
    let client = Client::new();
    let (barber_id, service_id) = setup_barber(&client).await;
    let user = token("weekly-it", Role::Client);
    let date = next_tuesday();
    let until = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap() + Duration::days(21);

    let response = client
        .post(format!("{}/bookings/weekly", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({
            "barber_id": barber_id,
            "date": date,
            "time": "12:00",
            "service_id": service_id,
            "until": until.format("%Y-%m-%d").to_string()
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["created"].as_array().map(Vec::len), Some(4));

    let response = client
        .get(format!("{}/bookings/me", BASE_URL))
        .bearer_auth(&user)
        .send()
        .await
        .expect("Failed to send request");
    let mine: Value = response.json().await.expect("Failed to parse response");
    assert!(mine.as_array().map(Vec::len).unwrap_or(0) >= 4);
}
