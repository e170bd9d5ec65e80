//! Reservation routes
//!
//! Booking goes through the lifecycle manager so the car's availability
//! flag and the reservation row always move together. Non-admins only see
//! and cancel their own reservations; hard deletion is admin work.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::ensure_admin;
use crate::models::Reservation;
use crate::response::{ApiResponse, Page, PageQuery};
use crate::session::SessionUser;
use crate::state::AppState;
use crate::validation::{self, Payload};

/// List reservations, paginated; admins see all, others their own
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page();
    let per_page = state.config.rows_per_page;
    let renter = (!current.is_admin).then_some(current.user_id);

    let (reservations, count) = state.reservations.list(page, per_page, renter).await?;

    ApiResponse::with_data(
        "Reservations fetched successfully",
        &Page::new("/reservations", page, per_page, count, reservations),
    )
}

/// Book a car for the calling user
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    body: Option<Json<Payload>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let new_reservation = validation::validate_new_reservation(&body, &state.cars).await?;

    let reservation = state
        .reservations
        .book(current.user_id, &new_reservation)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("Reservation created successfully", &reservation)?,
    ))
}

/// Get a reservation by ID, subject to ownership
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = find_visible(&state, &current, id).await?;

    ApiResponse::with_data("Reservation fetched successfully", &reservation)
}

/// Cancel a reservation, releasing its car; idempotent for the caller
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // Ownership is checked before the transition so a foreign reservation
    // reads as absent rather than forbidden.
    find_visible(&state, &current, id).await?;

    state.reservations.cancel(id).await?;

    Ok(ApiResponse::message("Reservation cancelled successfully"))
}

/// Hard-delete a reservation (admin only), restoring car availability if
/// it was still active
pub async fn delete_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&current)?;

    state.reservations.delete(id).await?;

    Ok(ApiResponse::message("Reservation deleted successfully"))
}

/// Fetch a reservation the caller is allowed to see; others read as absent
async fn find_visible(
    state: &AppState,
    current: &SessionUser,
    id: Uuid,
) -> Result<Reservation, ApiError> {
    let reservation = state
        .reservations
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound(format!("Reservation {id}")))?;

    if !current.is_admin && reservation.user_id != current.user_id {
        return Err(ApiError::RecordNotFound(format!("Reservation {id}")));
    }

    Ok(reservation)
}
