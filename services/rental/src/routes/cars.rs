//! Car routes
//!
//! Any authenticated caller can browse cars, but non-admins only see the
//! available ones. Creating, updating, and deleting cars is admin work.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::ensure_admin;
use crate::response::{ApiResponse, Page, PageQuery};
use crate::session::SessionUser;
use crate::state::AppState;
use crate::validation::{self, Payload};

/// List cars, paginated; availability filter applies to non-admins
pub async fn list_cars(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page();
    let per_page = state.config.rows_per_page;

    let (cars, count) = state.cars.list(page, per_page, !current.is_admin).await?;

    ApiResponse::with_data(
        "Cars fetched successfully",
        &Page::new("/cars", page, per_page, count, cars),
    )
}

/// Create a car (admin only)
pub async fn create_car(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    body: Option<Json<Payload>>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&current)?;

    let body = body.map(|Json(b)| b).unwrap_or_default();
    let new_car = validation::validate_new_car(&body, &state.cars).await?;

    let car = state.cars.create(&new_car).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("Car created successfully", &car)?,
    ))
}

/// Get a car by ID
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let car = state
        .cars
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound("Car".to_string()))?;

    ApiResponse::with_data("Car fetched successfully", &car)
}

/// Partially update a car (admin only)
pub async fn update_car(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
    body: Option<Json<Payload>>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&current)?;

    let body = body.map(|Json(b)| b).unwrap_or_default();
    let update = validation::validate_car_update(&body, &state.cars).await?;

    let car = state.cars.update(id, &update).await?;

    Ok(ApiResponse::message(format!(
        "Car {} updated successfully",
        car.id
    )))
}

/// Delete a car (admin only)
pub async fn delete_car(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&current)?;

    state.cars.delete(id).await?;

    Ok(ApiResponse::message("Car deleted successfully"))
}
