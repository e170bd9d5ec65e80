//! User routes
//!
//! The collection endpoints (list, direct create) sit behind the admin
//! layer. Individual records are visible to their owner or an admin;
//! deletion is admin work.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::ensure_admin;
use crate::response::{ApiResponse, Page, PageQuery};
use crate::session::SessionUser;
use crate::state::AppState;
use crate::validation::{self, Payload};

/// List users, paginated (admin only, enforced by the router layer)
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page();
    let per_page = state.config.rows_per_page;

    let (users, count) = state.users.list(page, per_page).await?;

    ApiResponse::with_data(
        "Users fetched successfully",
        &Page::new("/users", page, per_page, count, users),
    )
}

/// Create a user directly (admin only, enforced by the router layer)
///
/// Same validation and atomic user-plus-license write as self-registration.
pub async fn create_user(
    State(state): State<AppState>,
    body: Option<Json<Payload>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let new_user = validation::validate_registration(&body, &state.users).await?;

    let (user, license) = state.users.register(&new_user).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data(
            "User created successfully",
            &json!({ "user": user, "license": license }),
        )?,
    ))
}

/// Get a user by ID; non-admins only see themselves
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !current.is_admin && id != current.user_id {
        return Err(ApiError::RecordNotFound("User".to_string()));
    }

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound("User".to_string()))?;

    ApiResponse::with_data("User fetched successfully", &user)
}

/// Partially update a user; non-admins only update themselves, and only an
/// admin can grant or revoke the admin flag
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
    body: Option<Json<Payload>>,
) -> Result<impl IntoResponse, ApiError> {
    if !current.is_admin && id != current.user_id {
        return Err(ApiError::RecordNotFound("User".to_string()));
    }

    let body = body.map(|Json(b)| b).unwrap_or_default();
    let update = validation::validate_user_update(&body, current.is_admin, &state.users).await?;

    let user = state.users.update(id, &update).await?;

    Ok(ApiResponse::message(format!(
        "User {} updated successfully",
        user.id
    )))
}

/// Delete a user (admin only); their license and reservations go with them
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&current)?;

    state.users.delete(id).await?;

    Ok(ApiResponse::message("User deleted successfully"))
}
