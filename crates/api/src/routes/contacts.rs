//! Contact record routes, nested under a customer.
//!
//! Every operation here, listing included, requires owner-or-admin on the
//! parent customer; contact records are never publicly readable or
//! writable. The gate is shared with the customer routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};

use leadbook_core::{AddressId, CustomerId, EmailContactId, PhoneId, WebsiteId};

use super::customers::authorize_on_customer;
use crate::db::contacts::ContactRepository;
use crate::error::Result;
use crate::permissions::{Action, Caller};
use crate::serializers::contact::{
    AddressPayload, AddressRepr, EmailPayload, EmailRepr, PhonePayload, PhoneRepr, WebsitePayload,
    WebsiteRepr,
};
use crate::state::AppState;

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/customers/{id}/addresses",
            get(list_addresses).post(create_address),
        )
        .route(
            "/customers/{id}/addresses/{contact_id}",
            put(update_address).delete(delete_address),
        )
        .route("/customers/{id}/phones", get(list_phones).post(create_phone))
        .route(
            "/customers/{id}/phones/{contact_id}",
            put(update_phone).delete(delete_phone),
        )
        .route("/customers/{id}/emails", get(list_emails).post(create_email))
        .route(
            "/customers/{id}/emails/{contact_id}",
            put(update_email).delete(delete_email),
        )
        .route(
            "/customers/{id}/websites",
            get(list_websites).post(create_website),
        )
        .route(
            "/customers/{id}/websites/{contact_id}",
            put(update_website).delete(delete_website),
        )
}

// =========================================================================
// Addresses
// =========================================================================

async fn list_addresses(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<AddressRepr>>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Retrieve, &caller, customer_id).await?;

    let addresses = ContactRepository::new(state.pool())
        .list_addresses(customer_id)
        .await?;
    let reprs = addresses
        .iter()
        .map(|address| AddressRepr::from_address(address, state.base_url()))
        .collect();

    Ok(Json(reprs))
}

async fn create_address(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
    Json(payload): Json<AddressPayload>,
) -> Result<(StatusCode, Json<AddressRepr>)> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let address = ContactRepository::new(state.pool())
        .create_address(customer_id, &fields)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddressRepr::from_address(&address, state.base_url())),
    ))
}

async fn update_address(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
    Json(payload): Json<AddressPayload>,
) -> Result<Json<AddressRepr>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let address = ContactRepository::new(state.pool())
        .update_address(customer_id, AddressId::new(contact_id), &fields)
        .await?;

    Ok(Json(AddressRepr::from_address(&address, state.base_url())))
}

async fn delete_address(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    ContactRepository::new(state.pool())
        .delete_address(customer_id, AddressId::new(contact_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Phones
// =========================================================================

async fn list_phones(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<PhoneRepr>>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Retrieve, &caller, customer_id).await?;

    let phones = ContactRepository::new(state.pool())
        .list_phones(customer_id)
        .await?;
    let reprs = phones
        .iter()
        .map(|phone| PhoneRepr::from_phone(phone, state.base_url()))
        .collect();

    Ok(Json(reprs))
}

async fn create_phone(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
    Json(payload): Json<PhonePayload>,
) -> Result<(StatusCode, Json<PhoneRepr>)> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let phone = ContactRepository::new(state.pool())
        .create_phone(customer_id, &fields)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PhoneRepr::from_phone(&phone, state.base_url())),
    ))
}

async fn update_phone(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
    Json(payload): Json<PhonePayload>,
) -> Result<Json<PhoneRepr>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let phone = ContactRepository::new(state.pool())
        .update_phone(customer_id, PhoneId::new(contact_id), &fields)
        .await?;

    Ok(Json(PhoneRepr::from_phone(&phone, state.base_url())))
}

async fn delete_phone(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    ContactRepository::new(state.pool())
        .delete_phone(customer_id, PhoneId::new(contact_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Emails
// =========================================================================

async fn list_emails(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<EmailRepr>>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Retrieve, &caller, customer_id).await?;

    let emails = ContactRepository::new(state.pool())
        .list_emails(customer_id)
        .await?;
    let reprs = emails
        .iter()
        .map(|email| EmailRepr::from_email(email, state.base_url()))
        .collect();

    Ok(Json(reprs))
}

async fn create_email(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
    Json(payload): Json<EmailPayload>,
) -> Result<(StatusCode, Json<EmailRepr>)> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let email = ContactRepository::new(state.pool())
        .create_email(customer_id, &fields)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EmailRepr::from_email(&email, state.base_url())),
    ))
}

async fn update_email(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
    Json(payload): Json<EmailPayload>,
) -> Result<Json<EmailRepr>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let email = ContactRepository::new(state.pool())
        .update_email(customer_id, EmailContactId::new(contact_id), &fields)
        .await?;

    Ok(Json(EmailRepr::from_email(&email, state.base_url())))
}

async fn delete_email(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    ContactRepository::new(state.pool())
        .delete_email(customer_id, EmailContactId::new(contact_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Websites
// =========================================================================

async fn list_websites(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<WebsiteRepr>>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Retrieve, &caller, customer_id).await?;

    let websites = ContactRepository::new(state.pool())
        .list_websites(customer_id)
        .await?;
    let reprs = websites
        .iter()
        .map(|website| WebsiteRepr::from_website(website, state.base_url()))
        .collect();

    Ok(Json(reprs))
}

async fn create_website(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer_id): Path<i32>,
    Json(payload): Json<WebsitePayload>,
) -> Result<(StatusCode, Json<WebsiteRepr>)> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let website = ContactRepository::new(state.pool())
        .create_website(customer_id, &fields)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WebsiteRepr::from_website(&website, state.base_url())),
    ))
}

async fn update_website(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
    Json(payload): Json<WebsitePayload>,
) -> Result<Json<WebsiteRepr>> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    let fields = payload.into_fields()?;
    let website = ContactRepository::new(state.pool())
        .update_website(customer_id, WebsiteId::new(contact_id), &fields)
        .await?;

    Ok(Json(WebsiteRepr::from_website(&website, state.base_url())))
}

async fn delete_website(
    State(state): State<AppState>,
    caller: Caller,
    Path((customer_id, contact_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    let customer_id = CustomerId::new(customer_id);
    authorize_on_customer(&state, Action::Update, &caller, customer_id).await?;

    ContactRepository::new(state.pool())
        .delete_website(customer_id, WebsiteId::new(contact_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
