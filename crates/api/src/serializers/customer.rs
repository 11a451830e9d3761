//! Customer payloads and representations.
//!
//! The `lead` flag is server-owned on creation: whatever the caller sends,
//! a new customer is stored as a lead. On update the flag applies only when
//! supplied, so staff can confirm or clear it explicitly without plain
//! field updates resetting it.

use serde::{Deserialize, Serialize};

use leadbook_core::{CitizenId, CustomerId, TaxNumber, UserId};

use super::double_option;
use crate::db::customers::{CustomerChanges, NewCustomer};
use crate::error::{AppError, FieldError};
use crate::models::customer::Customer;
use crate::serializers::user::user_url;

/// Payload to create a customer.
///
/// Deliberately no `lead` field: a caller-supplied value would be ignored
/// anyway, and leaving it out of the struct makes that unrepresentable.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub company_title: String,
    #[serde(default)]
    pub tax_office: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub citizen_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub headquarter: Option<i32>,
    #[serde(default)]
    pub staff: Vec<i32>,
}

impl CreateCustomerRequest {
    /// Validate the payload into a repository insert.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with one entry per bad field.
    pub fn into_new_customer(self, owner_id: Option<UserId>) -> Result<NewCustomer, AppError> {
        let mut errors = Vec::new();

        if self.company_title.trim().is_empty() {
            errors.push(FieldError::new("company_title", "must not be empty"));
        }

        let tax_number = parse_tax_number(self.tax_number.as_deref(), &mut errors);
        let citizen_id = parse_citizen_id(self.citizen_id.as_deref(), &mut errors);

        if self.tax_number.is_none() && self.citizen_id.is_none() {
            errors.push(FieldError::new(
                "tax_number",
                "either tax_number or citizen_id is required",
            ));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewCustomer {
            company_title: self.company_title,
            tax_office: self.tax_office,
            tax_number,
            citizen_id,
            description: self.description,
            headquarter_id: self.headquarter.map(CustomerId::new),
            owner_id,
            staff: self.staff.into_iter().map(UserId::new).collect(),
        })
    }
}

/// Payload to update a customer. Absent fields are kept as-is.
///
/// `headquarter` distinguishes absent (keep) from `null` (clear the link).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub company_title: Option<String>,
    #[serde(default)]
    pub tax_office: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub citizen_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lead: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub headquarter: Option<Option<i32>>,
}

impl UpdateCustomerRequest {
    /// Validate the payload into repository changes for customer `id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with one entry per bad field,
    /// including a self-referential headquarter link.
    pub fn into_changes(self, id: CustomerId) -> Result<CustomerChanges, AppError> {
        let mut errors = Vec::new();

        if let Some(title) = &self.company_title
            && title.trim().is_empty()
        {
            errors.push(FieldError::new("company_title", "must not be empty"));
        }

        let tax_number = parse_tax_number(self.tax_number.as_deref(), &mut errors);
        let citizen_id = parse_citizen_id(self.citizen_id.as_deref(), &mut errors);

        let headquarter_id = self.headquarter.map(|hq| hq.map(CustomerId::new));
        if headquarter_id.flatten() == Some(id) {
            errors.push(FieldError::new(
                "headquarter",
                "customer cannot be its own headquarter",
            ));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(CustomerChanges {
            company_title: self.company_title,
            tax_office: self.tax_office,
            tax_number,
            citizen_id,
            description: self.description,
            headquarter_id,
            lead: self.lead,
        })
    }
}

/// Payload to replace a customer's staff set.
#[derive(Debug, Deserialize)]
pub struct StaffRequest {
    pub staff: Vec<i32>,
}

/// Caller-facing representation of a customer.
#[derive(Debug, Serialize)]
pub struct CustomerRepr {
    pub url: String,
    pub company_title: String,
    pub tax_office: Option<String>,
    pub tax_number: Option<String>,
    pub citizen_id: Option<String>,
    pub description: Option<String>,
    pub headquarter_url: Option<String>,
    pub staff: Vec<String>,
    pub lead: bool,
}

impl CustomerRepr {
    /// Build the representation, including canonical URLs for the record
    /// itself, its headquarter, and its staff.
    #[must_use]
    pub fn from_customer(customer: &Customer, base_url: &str) -> Self {
        Self {
            url: customer_url(base_url, customer.id),
            company_title: customer.company_title.clone(),
            tax_office: customer.tax_office.clone(),
            tax_number: customer.tax_number.as_ref().map(ToString::to_string),
            citizen_id: customer.citizen_id.as_ref().map(ToString::to_string),
            description: customer.description.clone(),
            headquarter_url: customer
                .headquarter_id
                .map(|id| customer_url(base_url, id)),
            staff: customer
                .staff
                .iter()
                .map(|&id| user_url(base_url, id))
                .collect(),
            lead: customer.lead,
        }
    }
}

/// Canonical URL of a customer resource.
#[must_use]
pub fn customer_url(base_url: &str, id: CustomerId) -> String {
    format!("{base_url}/customers/{id}")
}

fn parse_tax_number(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<TaxNumber> {
    raw.and_then(|s| match TaxNumber::parse(s) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.push(FieldError::new("tax_number", e));
            None
        }
    })
}

fn parse_citizen_id(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<CitizenId> {
    raw.and_then(|s| match CitizenId::parse(s) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.push(FieldError::new("citizen_id", e));
            None
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_create() -> CreateCustomerRequest {
        CreateCustomerRequest {
            company_title: "Acme Ltd".to_string(),
            tax_office: Some("Central".to_string()),
            tax_number: Some("1234567890".to_string()),
            citizen_id: None,
            description: None,
            headquarter: None,
            staff: vec![],
        }
    }

    #[test]
    fn test_create_accepts_valid_payload() {
        let new = valid_create().into_new_customer(Some(UserId::new(1))).unwrap();
        assert_eq!(new.company_title, "Acme Ltd");
        assert_eq!(new.owner_id, Some(UserId::new(1)));
        assert!(new.citizen_id.is_none());
    }

    #[test]
    fn test_create_requires_tax_number_or_citizen_id() {
        let mut request = valid_create();
        request.tax_number = None;

        let err = request.into_new_customer(None).unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "tax_number");
    }

    #[test]
    fn test_create_rejects_wrong_length_tax_number() {
        let mut request = valid_create();
        request.tax_number = Some("123".to_string());

        assert!(matches!(
            request.into_new_customer(None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_create_rejects_wrong_length_citizen_id() {
        let mut request = valid_create();
        request.citizen_id = Some("123456789012".to_string());

        assert!(matches!(
            request.into_new_customer(None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_update_omitted_lead_is_kept() {
        let request: UpdateCustomerRequest =
            serde_json::from_str(r#"{"company_title": "New Name"}"#).unwrap();
        let changes = request.into_changes(CustomerId::new(1)).unwrap();

        assert_eq!(changes.lead, None);
        assert_eq!(changes.company_title.as_deref(), Some("New Name"));
        assert_eq!(changes.headquarter_id, None);
    }

    #[test]
    fn test_update_explicit_lead_applies() {
        let request: UpdateCustomerRequest = serde_json::from_str(r#"{"lead": false}"#).unwrap();
        let changes = request.into_changes(CustomerId::new(1)).unwrap();
        assert_eq!(changes.lead, Some(false));
    }

    #[test]
    fn test_update_null_headquarter_clears_link() {
        let request: UpdateCustomerRequest =
            serde_json::from_str(r#"{"headquarter": null}"#).unwrap();
        let changes = request.into_changes(CustomerId::new(1)).unwrap();
        assert_eq!(changes.headquarter_id, Some(None));
    }

    #[test]
    fn test_update_rejects_self_headquarter() {
        let request: UpdateCustomerRequest =
            serde_json::from_str(r#"{"headquarter": 7}"#).unwrap();

        let err = request.into_changes(CustomerId::new(7)).unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "headquarter");
    }

    #[test]
    fn test_repr_links() {
        let customer = Customer {
            id: CustomerId::new(3),
            company_title: "Acme Ltd".to_string(),
            tax_office: None,
            tax_number: Some(TaxNumber::parse("1234567890").unwrap()),
            citizen_id: None,
            description: None,
            headquarter_id: Some(CustomerId::new(1)),
            owner_id: None,
            lead: true,
            staff: vec![UserId::new(4)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let repr = CustomerRepr::from_customer(&customer, "http://api.test");
        assert_eq!(repr.url, "http://api.test/customers/3");
        assert_eq!(repr.headquarter_url.as_deref(), Some("http://api.test/customers/1"));
        assert_eq!(repr.staff, vec!["http://api.test/users/4".to_string()]);
        assert!(repr.lead);
    }
}
