//! Integration tests for Leadbook.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! sqlx migrate run --source crates/api/migrations
//!
//! # Start the API
//! cargo run -p leadbook-api
//!
//! # Run integration tests
//! cargo test -p leadbook-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running server over HTTP and impersonate callers by
//! setting the trusted identity headers directly, the same way the upstream
//! gateway would. `LEADBOOK_TEST_URL` overrides the server address.
