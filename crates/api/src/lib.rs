//! Leadbook API library.
//!
//! Exposes the application as a library so routes, repositories, and the
//! permission resolver can be tested without standing up the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod permissions;
pub mod routes;
pub mod serializers;
pub mod state;
