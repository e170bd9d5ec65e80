//! Account routes: login, logout, registration

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::repositories::user::verify_password;
use crate::response::ApiResponse;
use crate::session::SessionUser;
use crate::state::AppState;
use crate::validation::{self, Payload};

/// User login endpoint
///
/// Verifies credentials, stamps `last_login`, and mints a session token.
pub async fn login(
    State(state): State<AppState>,
    body: Option<Json<Payload>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let credentials = validation::validate_login(&body)?;

    info!("Login attempt for user: {}", credentials.username);

    let user = state
        .users
        .find_by_username(&credentials.username)
        .await?
        .ok_or_else(|| ApiError::InputNotAcceptable("Invalid credentials".to_string()))?;

    if !verify_password(&user, &credentials.password)? {
        return Err(ApiError::InputNotAcceptable("Invalid credentials".to_string()));
    }

    state.users.touch_last_login(user.id).await?;

    let token = state
        .sessions
        .create(&SessionUser {
            user_id: user.id,
            is_admin: user.is_admin,
        })
        .await?;

    ApiResponse::with_data(
        "You are logged in successfully.",
        &json!({ "token": token, "user": user }),
    )
}

/// Logout endpoint; succeeds whether or not a live session was presented
pub async fn logout(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(TypedHeader(auth)) = auth {
        state.sessions.destroy(auth.token()).await?;
    }

    Ok(ApiResponse::message("You are logged out successfully."))
}

/// Registration endpoint: creates the user and their license atomically
pub async fn register(
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
