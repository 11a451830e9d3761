//! Core types for Leadbook.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod postal;
pub mod tax;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneKind, PhoneKindError, PhoneNumber, PhoneNumberError};
pub use postal::{PostalCode, PostalCodeError};
pub use tax::{CitizenId, CitizenIdError, TaxNumber, TaxNumberError};
