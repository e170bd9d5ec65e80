//! Reservation repository: the reservation lifecycle manager
//!
//! Every state transition pairs the reservation write with the car
//! availability write inside one transaction. Either both apply or neither
//! does; a reservation marked reserved with a stale car flag must never be
//! observable.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{NewReservation, Reservation, ReservationStatus};

/// Reservation repository
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Book a car for a user
    ///
    /// The car is claimed with a conditional UPDATE: concurrent bookers
    /// serialize on the row lock and the loser sees zero rows, so exactly
    /// one booking can succeed on an available car.
    pub async fn book(
        &self,
        user_id: Uuid,
        new: &NewReservation,
    ) -> Result<Reservation, ApiError> {
        info!("Booking car {} for user {}", new.car_id, user_id);

        let mut tx = self.pool.begin().await?;

        let claimed =
            sqlx::query("UPDATE cars SET is_available = FALSE WHERE id = $1 AND is_available = TRUE")
                .bind(new.car_id)
                .execute(&mut *tx)
                .await?;

        if claimed.rows_affected() == 0 {
            // Distinguish a missing car from one already claimed.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cars WHERE id = $1)")
                    .bind(new.car_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if exists {
                ApiError::InputNotAcceptable("Car is not available".to_string())
            } else {
                ApiError::RecordNotFound(format!("Car {}", new.car_id))
            });
        }

        let reservation = sqlx::query_as(
            r#"
            INSERT INTO reservations (id, car_id, user_id, reservation_start_date, reservation_end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.car_id)
        .bind(user_id)
        .bind(new.reservation_start_date)
        .bind(new.reservation_end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    /// Cancel a reservation and release its car
    ///
    /// Cancelling an already-cancelled reservation succeeds; the
    /// availability restore is a no-op then.
    pub async fn cancel(&self, id: Uuid) -> Result<Reservation, ApiError> {
        info!("Cancelling reservation {}", id);

        let mut tx = self.pool.begin().await?;

        let reservation: Reservation = sqlx::query_as(
            r#"
            UPDATE reservations SET status = 'cancelled', date_last_update = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound(format!("Reservation {id}")))?;

        sqlx::query("UPDATE cars SET is_available = TRUE WHERE id = $1")
            .bind(reservation.car_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    /// Hard-delete a reservation, releasing its car if it was still active
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        info!("Deleting reservation {}", id);

        let mut tx = self.pool.begin().await?;

        let deleted: Option<(Uuid, ReservationStatus)> =
            sqlx::query_as("DELETE FROM reservations WHERE id = $1 RETURNING car_id, status")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let (car_id, status) =
            deleted.ok_or_else(|| ApiError::RecordNotFound(format!("Reservation {id}")))?;

        if status == ReservationStatus::Reserved {
            sqlx::query("UPDATE cars SET is_available = TRUE WHERE id = $1")
                .bind(car_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Find a reservation by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, ApiError> {
        let reservation = sqlx::query_as("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reservation)
    }

    /// List reservations one page at a time, newest first
    ///
    /// Non-admin callers only see their own; `renter` applies that filter.
    pub async fn list(
        &self,
        page: u32,
        per_page: u32,
        renter: Option<Uuid>,
    ) -> Result<(Vec<Reservation>, i64), ApiError> {
        let offset = i64::from(page - 1) * i64::from(per_page);

        let reservations = sqlx::query_as(
            r#"
            SELECT * FROM reservations
            WHERE $3::uuid IS NULL OR user_id = $3
            ORDER BY date_created DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(per_page))
        .bind(offset)
        .bind(renter)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE $1::uuid IS NULL OR user_id = $1",
        )
        .bind(renter)
        .fetch_one(&self.pool)
        .await?;

        Ok((reservations, count))
    }
}
