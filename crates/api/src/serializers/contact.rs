//! Contact record payloads and representations.
//!
//! All four record kinds share the same request shape: full fields plus an
//! optional `is_default` flag that defaults to `false`. PUT and PATCH both
//! take the full payload, matching the replace semantics of the repository.

use serde::{Deserialize, Serialize};

use leadbook_core::{CustomerId, Email, PhoneKind, PhoneNumber, PostalCode};

use crate::db::contacts::{AddressFields, EmailFields, PhoneFields, WebsiteFields};
use crate::error::{AppError, FieldError};
use crate::models::contact::{Address, ContactEmail, Phone, Website};

/// Payload for an address record.
#[derive(Debug, Deserialize)]
pub struct AddressPayload {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressPayload {
    /// Validate the payload into repository fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with one entry per bad field.
    pub fn into_fields(self) -> Result<AddressFields, AppError> {
        let mut errors = Vec::new();

        if self.line1.trim().is_empty() {
            errors.push(FieldError::new("line1", "must not be empty"));
        }
        if self.city.trim().is_empty() {
            errors.push(FieldError::new("city", "must not be empty"));
        }
        let postal_code = match PostalCode::parse(&self.postal_code) {
            Ok(code) => Some(code),
            Err(e) => {
                errors.push(FieldError::new("postal_code", e));
                None
            }
        };

        let Some(postal_code) = postal_code.filter(|_| errors.is_empty()) else {
            return Err(AppError::Validation(errors));
        };

        Ok(AddressFields {
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            postal_code,
            is_default: self.is_default,
        })
    }
}

/// Payload for a phone record. `kind` is one of `mobile`, `work`, `fax`,
/// `home`.
#[derive(Debug, Deserialize)]
pub struct PhonePayload {
    pub number: String,
    pub kind: String,
    #[serde(default)]
    pub is_default: bool,
}

impl PhonePayload {
    /// Validate the payload into repository fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with one entry per bad field.
    pub fn into_fields(self) -> Result<PhoneFields, AppError> {
        let mut errors = Vec::new();

        let number = match PhoneNumber::parse(&self.number) {
            Ok(number) => Some(number),
            Err(e) => {
                errors.push(FieldError::new("number", e));
                None
            }
        };
        let kind = match self.kind.parse::<PhoneKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                errors.push(FieldError::new("kind", e));
                None
            }
        };

        match (number, kind) {
            (Some(number), Some(kind)) if errors.is_empty() => Ok(PhoneFields {
                number,
                kind,
                is_default: self.is_default,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Payload for an email record.
#[derive(Debug, Deserialize)]
pub struct EmailPayload {
    pub address: String,
    #[serde(default)]
    pub is_default: bool,
}

impl EmailPayload {
    /// Validate the payload into repository fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the address doesn't parse.
    pub fn into_fields(self) -> Result<EmailFields, AppError> {
        let address =
            Email::parse(&self.address).map_err(|e| AppError::field("address", e))?;

        Ok(EmailFields {
            address,
            is_default: self.is_default,
        })
    }
}

/// Payload for a website record.
#[derive(Debug, Deserialize)]
pub struct WebsitePayload {
    pub url: String,
    #[serde(default)]
    pub is_default: bool,
}

impl WebsitePayload {
    /// Validate the payload into repository fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the URL is blank.
    pub fn into_fields(self) -> Result<WebsiteFields, AppError> {
        if self.url.trim().is_empty() {
            return Err(AppError::field("url", "must not be empty"));
        }

        Ok(WebsiteFields {
            url: self.url,
            is_default: self.is_default,
        })
    }
}

/// Caller-facing representation of an address record.
#[derive(Debug, Serialize)]
pub struct AddressRepr {
    pub url: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub is_default: bool,
}

impl AddressRepr {
    #[must_use]
    pub fn from_address(address: &Address, base_url: &str) -> Self {
        Self {
            url: contact_url(base_url, address.customer_id, "addresses", address.id.as_i32()),
            line1: address.line1.clone(),
            line2: address.line2.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.to_string(),
            is_default: address.is_default,
        }
    }
}

/// Caller-facing representation of a phone record.
///
/// `display` carries the grouped national form ("0 532 123 45 67") next to
/// the raw digits.
#[derive(Debug, Serialize)]
pub struct PhoneRepr {
    pub url: String,
    pub number: String,
    pub display: String,
    pub kind: PhoneKind,
    pub is_default: bool,
}

impl PhoneRepr {
    #[must_use]
    pub fn from_phone(phone: &Phone, base_url: &str) -> Self {
        Self {
            url: contact_url(base_url, phone.customer_id, "phones", phone.id.as_i32()),
            number: phone.number.as_str().to_owned(),
            display: phone.number.display_grouped(),
            kind: phone.kind,
            is_default: phone.is_default,
        }
    }
}

/// Caller-facing representation of an email record.
#[derive(Debug, Serialize)]
pub struct EmailRepr {
    pub url: String,
    pub address: String,
    pub is_default: bool,
}

impl EmailRepr {
    #[must_use]
    pub fn from_email(email: &ContactEmail, base_url: &str) -> Self {
        Self {
            url: contact_url(base_url, email.customer_id, "emails", email.id.as_i32()),
            address: email.address.as_str().to_owned(),
            is_default: email.is_default,
        }
    }
}

/// Caller-facing representation of a website record.
#[derive(Debug, Serialize)]
pub struct WebsiteRepr {
    pub url: String,
    pub site_url: String,
    pub is_default: bool,
}

impl WebsiteRepr {
    #[must_use]
    pub fn from_website(website: &Website, base_url: &str) -> Self {
        Self {
            url: contact_url(base_url, website.customer_id, "websites", website.id.as_i32()),
            site_url: website.url.clone(),
            is_default: website.is_default,
        }
    }
}

fn contact_url(base_url: &str, customer_id: CustomerId, segment: &str, id: i32) -> String {
    format!("{base_url}/customers/{customer_id}/{segment}/{id}")
}
