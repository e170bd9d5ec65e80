//! Car repository for database operations

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Car, CarUpdate, NewCar};

/// Car repository
#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    /// Create a new car repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a car; new cars start out available
    pub async fn create(&self, new_car: &NewCar) -> Result<Car, ApiError> {
        info!("Creating new car: {}", new_car.license_plate);

        let car = sqlx::query_as(
            r#"
            INSERT INTO cars (id, license_plate, company, model, fabrication_year, number_of_seats)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_car.license_plate)
        .bind(&new_car.company)
        .bind(&new_car.model)
        .bind(&new_car.fabrication_year)
        .bind(new_car.number_of_seats)
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    /// Find a car by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, ApiError> {
        let car = sqlx::query_as("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    /// Existence check used by the booking validator
    pub async fn exists(&self, id: Uuid) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cars WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Uniqueness pre-check on license plate
    pub async fn plate_exists(&self, license_plate: &str) -> Result<bool, ApiError> {
        let exists =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cars WHERE license_plate = $1)")
                .bind(license_plate)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// List cars one page at a time
    ///
    /// Non-admin callers only see available cars; `only_available` applies
    /// that visibility rule to both the page and the count.
    pub async fn list(
        &self,
        page: u32,
        per_page: u32,
        only_available: bool,
    ) -> Result<(Vec<Car>, i64), ApiError> {
        let offset = i64::from(page - 1) * i64::from(per_page);

        let cars = sqlx::query_as(
            r#"
            SELECT * FROM cars
            WHERE is_available = TRUE OR $3 = FALSE
            ORDER BY license_plate
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(per_page))
        .bind(offset)
        .bind(only_available)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cars WHERE is_available = TRUE OR $1 = FALSE",
        )
        .bind(only_available)
        .fetch_one(&self.pool)
        .await?;

        Ok((cars, count))
    }

    /// Apply an allow-listed partial update; absent fields stay untouched
    pub async fn update(&self, id: Uuid, update: &CarUpdate) -> Result<Car, ApiError> {
        let car = sqlx::query_as(
            r#"
            UPDATE cars SET
                license_plate = COALESCE($2, license_plate),
                company = COALESCE($3, company),
                model = COALESCE($4, model),
                fabrication_year = COALESCE($5, fabrication_year),
                number_of_seats = COALESCE($6, number_of_seats),
                is_available = COALESCE($7, is_available)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.license_plate)
        .bind(&update.company)
        .bind(&update.model)
        .bind(&update.fabrication_year)
        .bind(update.number_of_seats)
        .bind(update.is_available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound("Car".to_string()))?;

        Ok(car)
    }

    /// Delete a car; its reservation rows cascade with it
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::RecordNotFound("Car".to_string()));
        }

        Ok(())
    }
}
