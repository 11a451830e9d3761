//! Contact record domain types.
//!
//! Each contact record belongs to exactly one customer and carries an
//! `is_default` flag; at most one record per kind is the default for a
//! customer.

use leadbook_core::{
    AddressId, CustomerId, Email, EmailContactId, PhoneId, PhoneKind, PhoneNumber, PostalCode,
    WebsiteId,
};

/// A postal address of a customer.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: AddressId,
    pub customer_id: CustomerId,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: PostalCode,
    pub is_default: bool,
}

/// A phone record of a customer.
#[derive(Debug, Clone)]
pub struct Phone {
    pub id: PhoneId,
    pub customer_id: CustomerId,
    pub number: PhoneNumber,
    pub kind: PhoneKind,
    pub is_default: bool,
}

/// An email record of a customer.
///
/// Distinct from [`leadbook_core::Email`] itself: this is the owned row with
/// identity and default flag.
#[derive(Debug, Clone)]
pub struct ContactEmail {
    pub id: EmailContactId,
    pub customer_id: CustomerId,
    pub address: Email,
    pub is_default: bool,
}

/// A website record of a customer.
#[derive(Debug, Clone)]
pub struct Website {
    pub id: WebsiteId,
    pub customer_id: CustomerId,
    pub url: String,
    pub is_default: bool,
}
