//! Leadbook Core - Shared types library.
//!
//! This crate provides common types used across all Leadbook components:
//! - `api` - The CRM HTTP service
//! - `integration-tests` - End-to-end test harness
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Every value that crosses a validation boundary (email addresses, tax
//! numbers, phone numbers, postal codes) gets a parse-validated newtype here
//! so the rest of the workspace never handles raw strings for them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and validated fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
