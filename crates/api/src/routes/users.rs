//! User routes.
//!
//! The record owner of a user resource is the user itself, so the
//! permission gate resolves from the path id alone and denies before any
//! database access.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use leadbook_core::UserId;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::permissions::{self, Action, Caller};
use crate::serializers::user::{CreateUserRequest, UpdateUserRequest, UserRepr};
use crate::state::AppState;

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .put(update_user)
                .patch(patch_user)
                .delete(delete_user),
        )
}

async fn create_user(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserRepr>)> {
    permissions::authorize(Action::Create, &caller, None)?;

    let new = payload.into_new_user()?;
    let user = UserRepository::new(state.pool()).create(&new).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserRepr::from_user(&user, state.base_url())),
    ))
}

async fn list_users(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<UserRepr>>> {
    permissions::authorize(Action::List, &caller, None)?;

    let users = UserRepository::new(state.pool()).list().await?;
    let reprs = users
        .iter()
        .map(|user| UserRepr::from_user(user, state.base_url()))
        .collect();

    Ok(Json(reprs))
}

async fn get_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<UserRepr>> {
    let id = UserId::new(id);
    permissions::authorize(Action::Retrieve, &caller, Some(id))?;

    let user = UserRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    Ok(Json(UserRepr::from_user(&user, state.base_url())))
}

async fn update_user(
    state: State<AppState>,
    caller: Caller,
    path: Path<i32>,
    payload: Json<UpdateUserRequest>,
) -> Result<Json<UserRepr>> {
    apply_user_update(state, caller, path, payload, Action::Update).await
}

async fn patch_user(
    state: State<AppState>,
    caller: Caller,
    path: Path<i32>,
    payload: Json<UpdateUserRequest>,
) -> Result<Json<UserRepr>> {
    apply_user_update(state, caller, path, payload, Action::PartialUpdate).await
}

/// PUT and PATCH share semantics here: only email and profile title are
/// mutable, and both accept a sparse payload.
async fn apply_user_update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
    action: Action,
) -> Result<Json<UserRepr>> {
    let id = UserId::new(id);
    permissions::authorize(action, &caller, Some(id))?;

    let changes = payload.into_changes()?;
    let user = UserRepository::new(state.pool()).update(id, &changes).await?;

    Ok(Json(UserRepr::from_user(&user, state.base_url())))
}

async fn delete_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    permissions::authorize(Action::Delete, &caller, None)?;

    UserRepository::new(state.pool())
        .delete(UserId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
