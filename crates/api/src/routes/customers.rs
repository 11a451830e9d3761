//! Customer routes.
//!
//! Unlike users, the owner of a customer is not derivable from the path,
//! so owner-gated handlers look it up first. Callers who could never pass
//! the gate (anonymous non-admins) are denied before any database access;
//! for the rest a missing record is a 404 and a record owned by someone
//! else is a 403.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};

use leadbook_core::{CustomerId, UserId};

use crate::db::customers::CustomerRepository;
use crate::error::{AppError, Result};
use crate::permissions::{self, Action, Caller};
use crate::serializers::customer::{
    CreateCustomerRequest, CustomerRepr, StaffRequest, UpdateCustomerRequest,
};
use crate::state::AppState;

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer)
                .put(update_customer)
                .patch(patch_customer)
                .delete(delete_customer),
        )
        .route("/customers/{id}/staff", put(set_staff))
}

/// Gate an owner-or-admin action on customer `id`.
///
/// Anonymous callers are denied before any store access. Everyone else,
/// admins included, triggers an owner lookup so a missing customer is a
/// 404 regardless of role; someone else's customer is a 403.
pub(super) async fn authorize_on_customer(
    state: &AppState,
    action: Action,
    caller: &Caller,
    id: CustomerId,
) -> Result<()> {
    if !caller.is_authenticated() {
        return Err(AppError::Forbidden);
    }

    let owner = CustomerRepository::new(state.pool())
        .owner_of(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    permissions::authorize(action, caller, owner)?;
    Ok(())
}

async fn create_customer(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerRepr>)> {
    permissions::authorize(Action::Create, &caller, None)?;

    let new = payload.into_new_customer(caller.user_id)?;
    let customer = CustomerRepository::new(state.pool()).create(&new).await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerRepr::from_customer(&customer, state.base_url())),
    ))
}

async fn list_customers(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<CustomerRepr>>> {
    permissions::authorize(Action::List, &caller, None)?;

    let customers = CustomerRepository::new(state.pool()).list().await?;
    let reprs = customers
        .iter()
        .map(|customer| CustomerRepr::from_customer(customer, state.base_url()))
        .collect();

    Ok(Json(reprs))
}

async fn get_customer(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<CustomerRepr>> {
    let id = CustomerId::new(id);
    authorize_on_customer(&state, Action::Retrieve, &caller, id).await?;

    let customer = CustomerRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(Json(CustomerRepr::from_customer(&customer, state.base_url())))
}

async fn update_customer(
    state: State<AppState>,
    caller: Caller,
    path: Path<i32>,
    payload: Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerRepr>> {
    apply_customer_update(state, caller, path, payload, Action::Update).await
}

async fn patch_customer(
    state: State<AppState>,
    caller: Caller,
    path: Path<i32>,
    payload: Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerRepr>> {
    apply_customer_update(state, caller, path, payload, Action::PartialUpdate).await
}

async fn apply_customer_update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCustomerRequest>,
    action: Action,
) -> Result<Json<CustomerRepr>> {
    let id = CustomerId::new(id);
    authorize_on_customer(&state, action, &caller, id).await?;

    let changes = payload.into_changes(id)?;
    let customer = CustomerRepository::new(state.pool())
        .update(id, &changes)
        .await?;

    Ok(Json(CustomerRepr::from_customer(&customer, state.base_url())))
}

async fn set_staff(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<StaffRequest>,
) -> Result<Json<CustomerRepr>> {
    let id = CustomerId::new(id);
    authorize_on_customer(&state, Action::Update, &caller, id).await?;

    let staff: Vec<UserId> = payload.staff.into_iter().map(UserId::new).collect();
    let repository = CustomerRepository::new(state.pool());
    repository.set_staff(id, &staff).await?;

    let customer = repository
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(Json(CustomerRepr::from_customer(&customer, state.base_url())))
}

async fn delete_customer(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    permissions::authorize(Action::Delete, &caller, None)?;

    CustomerRepository::new(state.pool())
        .delete(CustomerId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
