//! Access policy gate
//!
//! Two composable checks wrap the protected routes: `require_auth` resolves
//! the bearer token to a live session and always runs first; `require_admin`
//! layers on top for admin-only routes. Handlers receive the session user
//! through request extensions and apply ownership rules themselves, since
//! those depend on the record being touched.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{error::ApiError, session::SessionUser, state::AppState};

/// Reject callers without a live session; inserts [`SessionUser`] into the
/// request extensions on success
pub async fn require_auth(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(auth) = auth.ok_or(ApiError::Unauthorized)?;

    let session = state
        .sessions
        .fetch(auth.token())
        .await?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

/// Reject non-admin callers; must be layered inside `require_auth`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<SessionUser>()
        .copied()
        .ok_or(ApiError::Unauthorized)?;

    if !user.is_admin {
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// In-handler admin pre-check for routes that mix admin and non-admin
/// methods on one path
pub fn ensure_admin(user: &SessionUser) -> Result<(), ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_ensure_admin_accepts_admin_sessions() {
        let admin = SessionUser {
            user_id: Uuid::new_v4(),
            is_admin: true,
        };
        assert!(ensure_admin(&admin).is_ok());
    }

    #[test]
    fn test_ensure_admin_rejects_non_admin_sessions() {
        let user = SessionUser {
            user_id: Uuid::new_v4(),
            is_admin: false,
        };
        assert!(matches!(ensure_admin(&user), Err(ApiError::Forbidden)));
    }
}
