//! Integration tests for customer contact records.
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

fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{tag}-{nanos}@test.leadbook.dev")
}

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

/// Create a user plus a customer they own; returns (user id, customer id).
async fn owner_with_customer(client: &Client, tag: &str) -> (i64, i64) {
    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "email": unique_email(tag),
            "first_name": "Test",
            "last_name": "Owner",
            "password": "correct horse battery staple"
        }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: Value = resp.json().await.expect("Failed to parse user body");
    let user_id = id_from_url(&user);

    let resp = client
        .post(format!("{}/customers", base_url()))
        .header("x-leadbook-user-id", user_id)
        .json(&json!({
            "company_title": "Contact Host Ltd",
            "tax_number": "1234567890"
        }))
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let customer: Value = resp.json().await.expect("Failed to parse customer body");

    (user_id, id_from_url(&customer))
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_address_crud() {
    let client = client();
    let (owner, customer) = owner_with_customer(&client, "addr").await;

    let resp = client
        .post(format!("{}/customers/{customer}/addresses", base_url()))
        .header("x-leadbook-user-id", owner)
        .json(&json!({
            "line1": "Main St 1",
            "city": "Ankara",
            "postal_code": "06100",
            "is_default": true
        }))
        .send()
        .await
        .expect("Failed to create address");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let address: Value = resp.json().await.expect("Failed to parse body");
    let address_id = id_from_url(&address);

    let resp = client
        .put(format!(
            "{}/customers/{customer}/addresses/{address_id}",
            base_url()
        ))
        .header("x-leadbook-user-id", owner)
        .json(&json!({
            "line1": "Side St 2",
            "city": "Ankara",
            "postal_code": "06200"
        }))
        .send()
        .await
        .expect("Failed to update address");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["line1"], "Side St 2");
    assert_eq!(body["is_default"], false);

    let resp = client
        .delete(format!(
            "{}/customers/{customer}/addresses/{address_id}",
            base_url()
        ))
        .header("x-leadbook-user-id", owner)
        .send()
        .await
        .expect("Failed to delete address");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_new_default_clears_previous_default() {
    let client = client();
    let (owner, customer) = owner_with_customer(&client, "default").await;

    for number in ["5321234567", "5329876543"] {
        let resp = client
            .post(format!("{}/customers/{customer}/phones", base_url()))
            .header("x-leadbook-user-id", owner)
            .json(&json!({"number": number, "kind": "mobile", "is_default": true}))
            .send()
            .await
            .expect("Failed to create phone");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{}/customers/{customer}/phones", base_url()))
        .header("x-leadbook-user-id", owner)
        .send()
        .await
        .expect("Failed to list phones");
    assert_eq!(resp.status(), StatusCode::OK);

    let phones: Value = resp.json().await.expect("Failed to parse body");
    let defaults = phones
        .as_array()
        .expect("missing phone list")
        .iter()
        .filter(|p| p["is_default"] == true)
        .count();
    assert_eq!(defaults, 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_phone_repr_carries_grouped_display() {
    let client = client();
    let (owner, customer) = owner_with_customer(&client, "grouped").await;

    let resp = client
        .post(format!("{}/customers/{customer}/phones", base_url()))
        .header("x-leadbook-user-id", owner)
        .json(&json!({"number": "5321234567", "kind": "work"}))
        .send()
        .await
        .expect("Failed to create phone");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["display"], "0 532 123 45 67");
    assert_eq!(body["kind"], "work");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_contacts_are_not_publicly_writable() {
    let client = client();
    let (_, customer) = owner_with_customer(&client, "private").await;

    let resp = client
        .post(format!("{}/customers/{customer}/websites", base_url()))
        .json(&json!({"url": "https://example.com"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_phone_kind_is_rejected() {
    let client = client();
    let (owner, customer) = owner_with_customer(&client, "kind").await;

    let resp = client
        .post(format!("{}/customers/{customer}/phones", base_url()))
        .header("x-leadbook-user-id", owner)
        .json(&json!({"number": "5321234567", "kind": "pager"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["fields"][0]["field"], "kind");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_missing_customer_is_not_found_for_admins_too() {
    let client = client();
    let (owner, _) = owner_with_customer(&client, "ghost").await;

    // Admins take the same existence lookup as everyone else
    let resp = client
        .post(format!("{}/customers/2000000000/addresses", base_url()))
        .header("x-leadbook-user-id", owner)
        .header("x-leadbook-admin", "true")
        .json(&json!({
            "line1": "Nowhere 1",
            "city": "Ankara",
            "postal_code": "06100"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_contact_of_other_customer_is_not_reachable() {
    let client = client();
    let (owner_a, customer_a) = owner_with_customer(&client, "cross-a").await;
    let (owner_b, customer_b) = owner_with_customer(&client, "cross-b").await;

    let resp = client
        .post(format!("{}/customers/{customer_a}/emails", base_url()))
        .header("x-leadbook-user-id", owner_a)
        .json(&json!({"address": unique_email("cross")}))
        .send()
        .await
        .expect("Failed to create email record");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let email: Value = resp.json().await.expect("Failed to parse body");
    let email_id = id_from_url(&email);

    // Addressing it under someone else's customer must 404, not leak
    let resp = client
        .delete(format!(
            "{}/customers/{customer_b}/emails/{email_id}",
            base_url()
        ))
        .header("x-leadbook-user-id", owner_b)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
