//! Rental service routes
//!
//! Three tiers: public (health, login, logout, register), authenticated,
//! and admin-only. The auth layer is outermost so it always runs before the
//! admin check; routes mixing admin and non-admin methods on one path use
//! an in-handler admin pre-check instead.

use axum::{
    Json, Router,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;

use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;

pub mod accounts;
pub mod cars;
pub mod reservations;
pub mod users;

/// Create the router for the rental service
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route_layer(middleware::from_fn(require_admin));

    let protected_routes = Router::new()
        .route("/cars", get(cars::list_cars).post(cars::create_car))
        .route(
            "/cars/:id",
            get(cars::get_car)
                .patch(cars::update_car)
                .delete(cars::delete_car),
        )
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/reservations/:id",
            get(reservations::get_reservation).delete(reservations::delete_reservation),
        )
        .route(
            "/reservations/:id/cancel",
            patch(reservations::cancel_reservation),
        )
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/register", post(accounts::register))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "rental-service"
    }))
}
