//! Customer repository for database operations.
//!
//! Creation always stores `lead = true`; the flag is only writable through
//! an explicit update. Deleting a customer cascades to its contact records
//! and staff links through the schema's foreign keys.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use leadbook_core::{CitizenId, CustomerId, TaxNumber, UserId};

use super::RepositoryError;
use crate::models::customer::Customer;

/// Fields accepted when creating a customer.
///
/// There is no `lead` field here on purpose: every publicly created
/// customer starts as a lead.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub company_title: String,
    pub tax_office: Option<String>,
    pub tax_number: Option<TaxNumber>,
    pub citizen_id: Option<CitizenId>,
    pub description: Option<String>,
    pub headquarter_id: Option<CustomerId>,
    pub owner_id: Option<UserId>,
    pub staff: Vec<UserId>,
}

/// Mutable fields of a customer. `None` means "keep".
///
/// `headquarter_id` is doubly optional so an update can distinguish
/// "leave it alone" (`None`) from "clear the link" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub company_title: Option<String>,
    pub tax_office: Option<String>,
    pub tax_number: Option<TaxNumber>,
    pub citizen_id: Option<CitizenId>,
    pub description: Option<String>,
    pub headquarter_id: Option<Option<CustomerId>>,
    pub lead: Option<bool>,
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    company_title: String,
    tax_office: Option<String>,
    tax_number: Option<String>,
    citizen_id: Option<String>,
    description: Option<String>,
    headquarter_id: Option<i32>,
    owner_id: Option<i32>,
    lead: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self, staff: Vec<UserId>) -> Result<Customer, RepositoryError> {
        let tax_number = self
            .tax_number
            .as_deref()
            .map(TaxNumber::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid tax number in database: {e}"))
            })?;
        let citizen_id = self
            .citizen_id
            .as_deref()
            .map(CitizenId::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid citizen id in database: {e}"))
            })?;

        Ok(Customer {
            id: CustomerId::new(self.id),
            company_title: self.company_title,
            tax_office: self.tax_office,
            tax_number,
            citizen_id,
            description: self.description,
            headquarter_id: self.headquarter_id.map(CustomerId::new),
            owner_id: self.owner_id.map(UserId::new),
            lead: self.lead,
            staff,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_CUSTOMER: &str = r"
    SELECT id, company_title, tax_office, tax_number, citizen_id,
           description, headquarter_id, owner_id, lead,
           created_at, updated_at
    FROM customers
";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a customer, flagged as a lead, with its initial staff set.
    ///
    /// The customer insert and staff links run inside one transaction.
    /// Duplicate ids in the staff input are collapsed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the headquarter or a staff
    /// user does not exist.
    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: CustomerRow = sqlx::query_as(
            r"
            INSERT INTO customers
                (company_title, tax_office, tax_number, citizen_id,
                 description, headquarter_id, owner_id, lead)
            VALUES ($1, $2, $3, $4, $5, $6, $7, true)
            RETURNING id, company_title, tax_office, tax_number, citizen_id,
                      description, headquarter_id, owner_id, lead,
                      created_at, updated_at
            ",
        )
        .bind(&new.company_title)
        .bind(&new.tax_office)
        .bind(new.tax_number.as_ref().map(TaxNumber::as_str))
        .bind(new.citizen_id.as_ref().map(CitizenId::as_str))
        .bind(&new.description)
        .bind(new.headquarter_id.as_ref().map(CustomerId::as_i32))
        .bind(new.owner_id.as_ref().map(UserId::as_i32))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_foreign_key(e, "record"))?;

        let staff = dedup_staff(&new.staff);
        for user_id in &staff {
            sqlx::query("INSERT INTO customer_staff (customer_id, user_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(user_id.as_i32())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::from_foreign_key(e, "staff user"))?;
        }

        tx.commit().await?;

        row.into_customer(staff)
    }

    /// Get a customer by ID, staff included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!("{SELECT_CUSTOMER} WHERE id = $1");
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let staff = self.staff_of(id).await?;
        Ok(Some(row.into_customer(staff)?))
    }

    /// Get only the owner of a customer.
    ///
    /// Returns `None` if the customer doesn't exist, `Some(None)` when it
    /// exists but has no owner. Used by the permission gate so the contact
    /// routes don't have to load the full record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn owner_of(
        &self,
        id: CustomerId,
    ) -> Result<Option<Option<UserId>>, RepositoryError> {
        let row: Option<(Option<i32>,)> =
            sqlx::query_as("SELECT owner_id FROM customers WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(|(owner,)| owner.map(UserId::new)))
    }

    /// List all customers, oldest first, staff included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let sql = format!("{SELECT_CUSTOMER} ORDER BY id");
        let rows: Vec<CustomerRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;

        let links: Vec<(i32, i32)> =
            sqlx::query_as("SELECT customer_id, user_id FROM customer_staff ORDER BY user_id")
                .fetch_all(self.pool)
                .await?;

        let mut staff_by_customer: HashMap<i32, Vec<UserId>> = HashMap::new();
        for (customer_id, user_id) in links {
            staff_by_customer
                .entry(customer_id)
                .or_default()
                .push(UserId::new(user_id));
        }

        rows.into_iter()
            .map(|row| {
                let staff = staff_by_customer.remove(&row.id).unwrap_or_default();
                row.into_customer(staff)
            })
            .collect()
    }

    /// Apply field changes to a customer.
    ///
    /// `lead` is only touched when supplied; an omitted flag retains the
    /// stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new headquarter link points
    /// at a missing customer.
    pub async fn update(
        &self,
        id: CustomerId,
        changes: &CustomerChanges,
    ) -> Result<Customer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE customers
            SET company_title = COALESCE($2, company_title),
                tax_office    = COALESCE($3, tax_office),
                tax_number    = COALESCE($4, tax_number),
                citizen_id    = COALESCE($5, citizen_id),
                description   = COALESCE($6, description),
                lead          = COALESCE($7, lead),
                updated_at    = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(&changes.company_title)
        .bind(&changes.tax_office)
        .bind(changes.tax_number.as_ref().map(TaxNumber::as_str))
        .bind(changes.citizen_id.as_ref().map(CitizenId::as_str))
        .bind(&changes.description)
        .bind(changes.lead)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        if let Some(headquarter) = changes.headquarter_id {
            sqlx::query("UPDATE customers SET headquarter_id = $2 WHERE id = $1")
                .bind(id.as_i32())
                .bind(headquarter.as_ref().map(CustomerId::as_i32))
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::from_foreign_key(e, "headquarter"))?;
        }

        let sql = format!("{SELECT_CUSTOMER} WHERE id = $1");
        let row: CustomerRow = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let staff = self.staff_of(id).await?;
        row.into_customer(staff)
    }

    /// Replace the staff set of a customer.
    ///
    /// Duplicate ids in the input are collapsed; the staff link table holds
    /// a set, not a list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Conflict` if a staff user doesn't exist.
    pub async fn set_staff(
        &self,
        id: CustomerId,
        staff: &[UserId],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM customers WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM customer_staff WHERE customer_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        for user_id in &dedup_staff(staff) {
            sqlx::query("INSERT INTO customer_staff (customer_id, user_id) VALUES ($1, $2)")
                .bind(id.as_i32())
                .bind(user_id.as_i32())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::from_foreign_key(e, "staff user"))?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Delete a customer and, via cascade, its contact records and staff
    /// links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn staff_of(&self, id: CustomerId) -> Result<Vec<UserId>, RepositoryError> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            "SELECT user_id FROM customer_staff WHERE customer_id = $1 ORDER BY user_id",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(user_id,)| UserId::new(user_id)).collect())
    }
}

/// Collapse duplicate user ids, keeping first-seen order.
///
/// The staff link table's primary key is `(customer_id, user_id)`, so a
/// repeated id in the input would otherwise fail the second insert.
fn dedup_staff(staff: &[UserId]) -> Vec<UserId> {
    let mut unique = Vec::with_capacity(staff.len());
    for &user_id in staff {
        if !unique.contains(&user_id) {
            unique.push(user_id);
        }
    }
    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_staff_collapses_repeats() {
        let staff = [UserId::new(1), UserId::new(1), UserId::new(2), UserId::new(1)];
        assert_eq!(dedup_staff(&staff), vec![UserId::new(1), UserId::new(2)]);
    }

    #[test]
    fn test_dedup_staff_keeps_order() {
        let staff = [UserId::new(3), UserId::new(1), UserId::new(3), UserId::new(2)];
        assert_eq!(
            dedup_staff(&staff),
            vec![UserId::new(3), UserId::new(1), UserId::new(2)]
        );
    }

    #[test]
    fn test_dedup_staff_empty() {
        assert!(dedup_staff(&[]).is_empty());
    }
}
