//! Contact management API handlers
//!
//! Pass-through CRUD over the contact repository. Lookup precedence for
//! the list endpoint: name search, then phone, then email, then the
//! activity-state listing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use reportwire_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::AppState;
use reportwire_db::{Contact, ContactFilter, Delivery, NewContact};

/// E.164-style phone numbers (compiled once)
static PHONE_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\+[0-9]{7,15}$").expect("phone regex is valid"));

/// Request for creating a contact
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "phone must be E.164, e.g. +15550001111"))]
    pub phone: String,

    #[validate(email)]
    pub email: Option<String>,
}

/// Request for updating a contact
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "phone must be E.164, e.g. +15550001111"))]
    pub phone: String,

    #[validate(email)]
    pub email: Option<String>,

    pub is_active: bool,
}

/// Query parameters for listing contacts
#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub status: ContactFilter,
}

/// Contact response DTO
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            is_active: c.is_active,
            created_at: c.created_at,
        }
    }
}

/// List contacts, with optional name/phone/email lookup
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<ContactResponse>>> {
    let contacts = if let Some(name) = query.name.as_deref() {
        state
            .repos
            .contacts
            .search_by_name(name, page.limit(), page.offset())
            .await?
    } else if let Some(phone) = query.phone.as_deref() {
        state
            .repos
            .contacts
            .find_by_phone(phone)
            .await?
            .into_iter()
            .collect()
    } else if let Some(email) = query.email.as_deref() {
        state
            .repos
            .contacts
            .find_by_email(email)
            .await?
            .into_iter()
            .collect()
    } else {
        state
            .repos
            .contacts
            .list(query.status, page.limit(), page.offset())
            .await?
    };

    let responses: Vec<ContactResponse> = contacts.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Create a contact
pub async fn create_contact(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let created = state
        .repos
        .contacts
        .create(&NewContact {
            name: req.name,
            phone: req.phone,
            email: req.email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single contact by ID
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContactResponse>> {
    let contact = state
        .repos
        .contacts
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Contact not found".to_string()))?;

    Ok(Json(contact.into()))
}

/// Update a contact
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateContactRequest>,
) -> Result<Json<ContactResponse>> {
    let updated = state
        .repos
        .contacts
        .update(id, &req.name, &req.phone, req.email.as_deref(), req.is_active)
        .await?
        .ok_or_else(|| Error::NotFound("Contact not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Deactivate a contact (logical delete)
pub async fn deactivate_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let deactivated = state.repos.contacts.deactivate(id).await?;
    if !deactivated {
        return Err(Error::NotFound("Contact not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Delivery history for a contact, newest first
pub async fn contact_deliveries(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Delivery>>> {
    // 404 for unknown contacts rather than an empty history
    state
        .repos
        .contacts
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Contact not found".to_string()))?;

    let history = state.repos.deliveries.list_by_contact(id).await?;
    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_accepts_e164() {
        assert!(PHONE_REGEX.is_match("+15550001111"));
        assert!(PHONE_REGEX.is_match("+4930123456"));
    }

    #[test]
    fn test_phone_regex_rejects_malformed() {
        assert!(!PHONE_REGEX.is_match("15550001111"));
        assert!(!PHONE_REGEX.is_match("+1-555-000"));
        assert!(!PHONE_REGEX.is_match("+12"));
    }

    #[test]
    fn test_create_contact_request_validation() {
        let valid = CreateContactRequest {
            name: "Dana".to_string(),
            phone: "+15550001111".to_string(),
            email: Some("dana@example.com".to_string()),
        };
        assert!(valid.validate().is_ok());

        let bad_phone = CreateContactRequest {
            name: "Dana".to_string(),
            phone: "555".to_string(),
            email: None,
        };
        assert!(bad_phone.validate().is_err());

        let bad_email = CreateContactRequest {
            name: "Dana".to_string(),
            phone: "+15550001111".to_string(),
            email: Some("not-an-email".to_string()),
        };
        assert!(bad_email.validate().is_err());
    }
}
