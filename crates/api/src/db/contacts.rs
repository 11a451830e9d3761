//! Contact record repositories.
//!
//! Addresses, phones, emails, and websites all follow the same shape: owned
//! by exactly one customer, addressed as a nested resource, with a single
//! default per kind. Writes that set `is_default` clear the previous
//! default of the same kind inside the transaction; the partial unique
//! indexes in the schema back this up against concurrent writers.

use sqlx::{PgPool, Postgres, Transaction};

use leadbook_core::{
    AddressId, CustomerId, Email, EmailContactId, PhoneId, PhoneKind, PhoneNumber, PostalCode,
    WebsiteId,
};

use super::RepositoryError;
use crate::models::contact::{Address, ContactEmail, Phone, Website};

/// Fields of an address record.
#[derive(Debug, Clone)]
pub struct AddressFields {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: PostalCode,
    pub is_default: bool,
}

/// Fields of a phone record.
#[derive(Debug, Clone)]
pub struct PhoneFields {
    pub number: PhoneNumber,
    pub kind: PhoneKind,
    pub is_default: bool,
}

/// Fields of an email record.
#[derive(Debug, Clone)]
pub struct EmailFields {
    pub address: Email,
    pub is_default: bool,
}

/// Fields of a website record.
#[derive(Debug, Clone)]
pub struct WebsiteFields {
    pub url: String,
    pub is_default: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    customer_id: i32,
    line1: String,
    line2: Option<String>,
    city: String,
    postal_code: String,
    is_default: bool,
}

impl AddressRow {
    fn into_address(self) -> Result<Address, RepositoryError> {
        let postal_code = PostalCode::parse(&self.postal_code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid postal code in database: {e}"))
        })?;

        Ok(Address {
            id: AddressId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            postal_code,
            is_default: self.is_default,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PhoneRow {
    id: i32,
    customer_id: i32,
    number: String,
    kind: PhoneKind,
    is_default: bool,
}

impl PhoneRow {
    fn into_phone(self) -> Result<Phone, RepositoryError> {
        let number = PhoneNumber::parse(&self.number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone number in database: {e}"))
        })?;

        Ok(Phone {
            id: PhoneId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            number,
            kind: self.kind,
            is_default: self.is_default,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmailRow {
    id: i32,
    customer_id: i32,
    address: String,
    is_default: bool,
}

impl EmailRow {
    fn into_email(self) -> Result<ContactEmail, RepositoryError> {
        let address = Email::parse(&self.address).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(ContactEmail {
            id: EmailContactId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            address,
            is_default: self.is_default,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WebsiteRow {
    id: i32,
    customer_id: i32,
    url: String,
    is_default: bool,
}

impl WebsiteRow {
    fn into_website(self) -> Website {
        Website {
            id: WebsiteId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            url: self.url,
            is_default: self.is_default,
        }
    }
}

/// Repository for customer contact records.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// List a customer's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_addresses(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Address>, RepositoryError> {
        let rows: Vec<AddressRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, line1, line2, city, postal_code, is_default
            FROM customer_addresses
            WHERE customer_id = $1
            ORDER BY id
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AddressRow::into_address).collect()
    }

    /// Create an address for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer doesn't exist.
    pub async fn create_address(
        &self,
        customer_id: CustomerId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_addresses", customer_id).await?;
        }

        let row: AddressRow = sqlx::query_as(
            r"
            INSERT INTO customer_addresses
                (customer_id, line1, line2, city, postal_code, is_default)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, customer_id, line1, line2, city, postal_code, is_default
            ",
        )
        .bind(customer_id.as_i32())
        .bind(&fields.line1)
        .bind(&fields.line2)
        .bind(&fields.city)
        .bind(fields.postal_code.as_str())
        .bind(fields.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_foreign_key(e, "customer"))?;

        tx.commit().await?;

        row.into_address()
    }

    /// Replace an address record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such address belongs to
    /// the customer.
    pub async fn update_address(
        &self,
        customer_id: CustomerId,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_addresses", customer_id).await?;
        }

        let row: Option<AddressRow> = sqlx::query_as(
            r"
            UPDATE customer_addresses
            SET line1 = $3, line2 = $4, city = $5, postal_code = $6, is_default = $7
            WHERE id = $1 AND customer_id = $2
            RETURNING id, customer_id, line1, line2, city, postal_code, is_default
            ",
        )
        .bind(id.as_i32())
        .bind(customer_id.as_i32())
        .bind(&fields.line1)
        .bind(&fields.line2)
        .bind(&fields.city)
        .bind(fields.postal_code.as_str())
        .bind(fields.is_default)
        .fetch_optional(&mut *tx)
        .await?;

        let row = row.ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        row.into_address()
    }

    /// Delete an address record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such address belongs to
    /// the customer.
    pub async fn delete_address(
        &self,
        customer_id: CustomerId,
        id: AddressId,
    ) -> Result<(), RepositoryError> {
        delete_contact(self.pool, "customer_addresses", customer_id, id.as_i32()).await
    }

    // =========================================================================
    // Phones
    // =========================================================================

    /// List a customer's phone records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_phones(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Phone>, RepositoryError> {
        let rows: Vec<PhoneRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, number, kind, is_default
            FROM customer_phones
            WHERE customer_id = $1
            ORDER BY id
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PhoneRow::into_phone).collect()
    }

    /// Create a phone record for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer doesn't exist.
    pub async fn create_phone(
        &self,
        customer_id: CustomerId,
        fields: &PhoneFields,
    ) -> Result<Phone, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_phones", customer_id).await?;
        }

        let row: PhoneRow = sqlx::query_as(
            r"
            INSERT INTO customer_phones (customer_id, number, kind, is_default)
            VALUES ($1, $2, $3, $4)
            RETURNING id, customer_id, number, kind, is_default
            ",
        )
        .bind(customer_id.as_i32())
        .bind(fields.number.as_str())
        .bind(fields.kind)
        .bind(fields.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_foreign_key(e, "customer"))?;

        tx.commit().await?;

        row.into_phone()
    }

    /// Replace a phone record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such phone belongs to the
    /// customer.
    pub async fn update_phone(
        &self,
        customer_id: CustomerId,
        id: PhoneId,
        fields: &PhoneFields,
    ) -> Result<Phone, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_phones", customer_id).await?;
        }

        let row: Option<PhoneRow> = sqlx::query_as(
            r"
            UPDATE customer_phones
            SET number = $3, kind = $4, is_default = $5
            WHERE id = $1 AND customer_id = $2
            RETURNING id, customer_id, number, kind, is_default
            ",
        )
        .bind(id.as_i32())
        .bind(customer_id.as_i32())
        .bind(fields.number.as_str())
        .bind(fields.kind)
        .bind(fields.is_default)
        .fetch_optional(&mut *tx)
        .await?;

        let row = row.ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        row.into_phone()
    }

    /// Delete a phone record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such phone belongs to the
    /// customer.
    pub async fn delete_phone(
        &self,
        customer_id: CustomerId,
        id: PhoneId,
    ) -> Result<(), RepositoryError> {
        delete_contact(self.pool, "customer_phones", customer_id, id.as_i32()).await
    }

    // =========================================================================
    // Emails
    // =========================================================================

    /// List a customer's email records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_emails(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<ContactEmail>, RepositoryError> {
        let rows: Vec<EmailRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, address, is_default
            FROM customer_emails
            WHERE customer_id = $1
            ORDER BY id
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(EmailRow::into_email).collect()
    }

    /// Create an email record for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer doesn't exist.
    pub async fn create_email(
        &self,
        customer_id: CustomerId,
        fields: &EmailFields,
    ) -> Result<ContactEmail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_emails", customer_id).await?;
        }

        let row: EmailRow = sqlx::query_as(
            r"
            INSERT INTO customer_emails (customer_id, address, is_default)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, address, is_default
            ",
        )
        .bind(customer_id.as_i32())
        .bind(fields.address.as_str())
        .bind(fields.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_foreign_key(e, "customer"))?;

        tx.commit().await?;

        row.into_email()
    }

    /// Replace an email record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such email belongs to the
    /// customer.
    pub async fn update_email(
        &self,
        customer_id: CustomerId,
        id: EmailContactId,
        fields: &EmailFields,
    ) -> Result<ContactEmail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_emails", customer_id).await?;
        }

        let row: Option<EmailRow> = sqlx::query_as(
            r"
            UPDATE customer_emails
            SET address = $3, is_default = $4
            WHERE id = $1 AND customer_id = $2
            RETURNING id, customer_id, address, is_default
            ",
        )
        .bind(id.as_i32())
        .bind(customer_id.as_i32())
        .bind(fields.address.as_str())
        .bind(fields.is_default)
        .fetch_optional(&mut *tx)
        .await?;

        let row = row.ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        row.into_email()
    }

    /// Delete an email record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such email belongs to the
    /// customer.
    pub async fn delete_email(
        &self,
        customer_id: CustomerId,
        id: EmailContactId,
    ) -> Result<(), RepositoryError> {
        delete_contact(self.pool, "customer_emails", customer_id, id.as_i32()).await
    }

    // =========================================================================
    // Websites
    // =========================================================================

    /// List a customer's website records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_websites(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Website>, RepositoryError> {
        let rows: Vec<WebsiteRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, url, is_default
            FROM customer_websites
            WHERE customer_id = $1
            ORDER BY id
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(WebsiteRow::into_website).collect())
    }

    /// Create a website record for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer doesn't exist.
    pub async fn create_website(
        &self,
        customer_id: CustomerId,
        fields: &WebsiteFields,
    ) -> Result<Website, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_websites", customer_id).await?;
        }

        let row: WebsiteRow = sqlx::query_as(
            r"
            INSERT INTO customer_websites (customer_id, url, is_default)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, url, is_default
            ",
        )
        .bind(customer_id.as_i32())
        .bind(&fields.url)
        .bind(fields.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_foreign_key(e, "customer"))?;

        tx.commit().await?;

        Ok(row.into_website())
    }

    /// Replace a website record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such website belongs to
    /// the customer.
    pub async fn update_website(
        &self,
        customer_id: CustomerId,
        id: WebsiteId,
        fields: &WebsiteFields,
    ) -> Result<Website, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, "customer_websites", customer_id).await?;
        }

        let row: Option<WebsiteRow> = sqlx::query_as(
            r"
            UPDATE customer_websites
            SET url = $3, is_default = $4
            WHERE id = $1 AND customer_id = $2
            RETURNING id, customer_id, url, is_default
            ",
        )
        .bind(id.as_i32())
        .bind(customer_id.as_i32())
        .bind(&fields.url)
        .bind(fields.is_default)
        .fetch_optional(&mut *tx)
        .await?;

        let row = row.ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(row.into_website())
    }

    /// Delete a website record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such website belongs to
    /// the customer.
    pub async fn delete_website(
        &self,
        customer_id: CustomerId,
        id: WebsiteId,
    ) -> Result<(), RepositoryError> {
        delete_contact(self.pool, "customer_websites", customer_id, id.as_i32()).await
    }
}

/// Clear the default flag on every record of `table` for a customer.
///
/// The table name comes from a fixed set of literals above, never from
/// caller input.
async fn clear_default(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    customer_id: CustomerId,
) -> Result<(), RepositoryError> {
    let sql = format!("UPDATE {table} SET is_default = false WHERE customer_id = $1 AND is_default");
    sqlx::query(&sql)
        .bind(customer_id.as_i32())
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Delete one contact row scoped to its owning customer.
async fn delete_contact(
    pool: &PgPool,
    table: &str,
    customer_id: CustomerId,
    id: i32,
) -> Result<(), RepositoryError> {
    let sql = format!("DELETE FROM {table} WHERE id = $1 AND customer_id = $2");
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(customer_id.as_i32())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
