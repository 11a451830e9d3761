//! Integration tests for the users API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p leadbook-api)
//!
//! Run with: cargo test -p leadbook-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("LEADBOOK_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn client() -> Client {
    Client::new()
}

/// A unique email per test run so reruns don't trip the unique constraint.
fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{tag}-{nanos}@test.leadbook.dev")
}

/// Create a user and return its JSON representation.
async fn create_user(client: &Client, email: &str) -> Value {
    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "email": email,
            "first_name": "Test",
            "last_name": "User",
            "password": "correct horse battery staple",
            "profile": {"title": "Engineer"}
        }))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse user body")
}

/// Extract the numeric id from a representation's canonical `url`.
fn id_from_url(repr: &Value) -> i64 {
    repr["url"]
        .as_str()
        .expect("missing url")
        .rsplit('/')
        .next()
        .expect("empty url")
        .parse()
        .expect("non-numeric id in url")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_create_user_is_open_and_hides_password() {
    let client = client();
    let body = create_user(&client, &unique_email("create")).await;

    assert_eq!(body["first_name"], "Test");
    assert_eq!(body["profile"]["title"], "Engineer");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_email_conflicts() {
    let client = client();
    let email = unique_email("dup");
    create_user(&client, &email).await;

    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "email": email,
            "first_name": "Other",
            "last_name": "User",
            "password": "correct horse battery staple"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invalid_payload_reports_fields() {
    let client = client();
    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "email": "not-an-email",
            "first_name": "",
            "last_name": "User",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("missing fields array")
        .iter()
        .map(|f| f["field"].as_str().expect("missing field name"))
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"first_name"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_owner_can_retrieve_and_update_self() {
    let client = client();
    let repr = create_user(&client, &unique_email("owner")).await;
    let id = id_from_url(&repr);

    let resp = client
        .get(format!("{}/users/{id}", base_url()))
        .header("x-leadbook-user-id", id)
        .send()
        .await
        .expect("Failed to retrieve user");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .patch(format!("{}/users/{id}", base_url()))
        .header("x-leadbook-user-id", id)
        .json(&json!({"profile": {"title": "Manager"}}))
        .send()
        .await
        .expect("Failed to update user");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["profile"]["title"], "Manager");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_other_user_cannot_retrieve() {
    let client = client();
    let repr = create_user(&client, &unique_email("target")).await;
    let other = create_user(&client, &unique_email("intruder")).await;

    let resp = client
        .get(format!("{}/users/{}", base_url(), id_from_url(&repr)))
        .header("x-leadbook-user-id", id_from_url(&other))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_anonymous_cannot_list_users() {
    let resp = client()
        .get(format!("{}/users", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_can_list_and_delete() {
    let client = client();
    let admin = create_user(&client, &unique_email("admin")).await;
    let victim = create_user(&client, &unique_email("victim")).await;
    let admin_id = id_from_url(&admin);

    let resp = client
        .get(format!("{}/users", base_url()))
        .header("x-leadbook-user-id", admin_id)
        .header("x-leadbook-admin", "true")
        .send()
        .await
        .expect("Failed to list users");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{}/users/{}", base_url(), id_from_url(&victim)))
        .header("x-leadbook-user-id", admin_id)
        .header("x-leadbook-admin", "true")
        .send()
        .await
        .expect("Failed to delete user");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_non_admin_cannot_delete() {
    let client = client();
    let repr = create_user(&client, &unique_email("keep")).await;
    let id = id_from_url(&repr);

    // Even the owner cannot delete their own record
    let resp = client
        .delete(format!("{}/users/{id}", base_url()))
        .header("x-leadbook-user-id", id)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
