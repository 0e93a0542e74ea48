//! Contact repository
//!
//! Pass-through CRUD against the contacts table, plus the narrow
//! `ContactDirectory` lookup consumed by the delivery pipeline.

use reportwire_common::{Error, Result};
use sqlx::PgPool;

use crate::entities::{Contact, ContactFilter, NewContact};
use crate::ContactDirectory;

/// All columns in the contacts table, used for SELECT and RETURNING clauses.
const CONTACT_COLUMNS: &str = "id, name, phone, email, is_active, created_at";

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a contact. Duplicate phone or email reports a conflict.
    pub async fn create(&self, contact: &NewContact) -> Result<Contact> {
        let query = format!(
            "INSERT INTO contacts (name, phone, email) \
             VALUES ($1, $2, $3) RETURNING {CONTACT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Contact>(&query)
            .bind(&contact.name)
            .bind(&contact.phone)
            .bind(&contact.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if Error::is_unique_violation(&e) {
                    Error::Conflict("A contact with that phone or email already exists".to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(created)
    }

    /// Find contact by ID
    pub async fn find(&self, id: i64) -> Result<Option<Contact>> {
        let query = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contact)
    }

    /// Find contact by exact phone number
    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Contact>> {
        let query = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE phone = $1");
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contact)
    }

    /// Find contact by exact email address
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Contact>> {
        let query = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE email = $1");
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contact)
    }

    /// Search contacts by name (case-insensitive substring)
    pub async fn search_by_name(&self, name: &str, limit: i64, offset: i64) -> Result<Vec<Contact>> {
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             WHERE name ILIKE $1 ORDER BY name LIMIT $2 OFFSET $3"
        );
        let contacts = sqlx::query_as::<_, Contact>(&query)
            .bind(format!("%{}%", name))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }

    /// List contacts by activity state
    pub async fn list(&self, filter: ContactFilter, limit: i64, offset: i64) -> Result<Vec<Contact>> {
        let predicate = match filter {
            ContactFilter::Active => "WHERE is_active",
            ContactFilter::Inactive => "WHERE NOT is_active",
            ContactFilter::All => "",
        };
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             {predicate} ORDER BY name LIMIT $1 OFFSET $2"
        );
        let contacts = sqlx::query_as::<_, Contact>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }

    /// Update a contact's attributes, including activity state
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        phone: &str,
        email: Option<&str>,
        is_active: bool,
    ) -> Result<Option<Contact>> {
        let query = format!(
            "UPDATE contacts SET name = $2, phone = $3, email = $4, is_active = $5 \
             WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(name)
            .bind(phone)
            .bind(email)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if Error::is_unique_violation(&e) {
                    Error::Conflict("A contact with that phone or email already exists".to_string())
                } else {
                    Error::from(e)
                }
            })?;

        Ok(updated)
    }

    /// Logical delete: mark a contact inactive
    pub async fn deactivate(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE contacts SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ContactDirectory for ContactRepository {
    async fn resolve(&self, contact_id: i64) -> Result<Option<Contact>> {
        self.find(contact_id).await
    }
}
