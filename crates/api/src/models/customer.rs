//! Customer domain type.

use chrono::{DateTime, Utc};

use leadbook_core::{CitizenId, CustomerId, TaxNumber, UserId};

/// A customer record (domain type).
///
/// Customers created through the public endpoint are flagged as leads until
/// staff qualify them. The `headquarter_id` link forms a tree of branches
/// under a headquarters record.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Company title.
    pub company_title: String,
    /// Tax office the company reports to.
    pub tax_office: Option<String>,
    /// Company tax number (10 digits). At least one of `tax_number` and
    /// `citizen_id` is expected.
    pub tax_number: Option<TaxNumber>,
    /// Citizen id for sole proprietors (11 digits).
    pub citizen_id: Option<CitizenId>,
    /// Free-text notes.
    pub description: Option<String>,
    /// Parent headquarters record, if this is a branch.
    pub headquarter_id: Option<CustomerId>,
    /// The authenticated user that created the record, if any.
    pub owner_id: Option<UserId>,
    /// Whether this record is an unqualified lead.
    pub lead: bool,
    /// Users responsible for the account.
    pub staff: Vec<UserId>,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}
