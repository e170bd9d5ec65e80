//! User repository for database operations

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{License, NewUser, User, UserUpdate};

/// Hash a plaintext password into its opaque stored form
fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a user's stored hash
pub fn verify_password(user: &User, password: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user together with their license, atomically
    pub async fn register(&self, new_user: &NewUser) -> Result<(User, License), ApiError> {
        info!("Creating new user: {}", new_user.username);

        let password_hash = hash_password(&new_user.password)?;

        let mut tx = self.pool.begin().await?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let license: License = sqlx::query_as(
            r#"
            INSERT INTO licenses (id, license_number, user_id, date_issued, date_expiry)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.license.license_number)
        .bind(user.id)
        .bind(new_user.license.date_issued)
        .bind(new_user.license.date_expiry)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((user, license))
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Uniqueness pre-check on email
    pub async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Uniqueness pre-check on username
    pub async fn username_exists(&self, username: &str) -> Result<bool, ApiError> {
        let exists =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Uniqueness pre-check on license number
    pub async fn license_number_exists(&self, license_number: &str) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM licenses WHERE license_number = $1)",
        )
        .bind(license_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Stamp the user's last successful login
    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List users, newest first, one page at a time
    pub async fn list(&self, page: u32, per_page: u32) -> Result<(Vec<User>, i64), ApiError> {
        let offset = i64::from(page - 1) * i64::from(per_page);

        let users = sqlx::query_as(
            "SELECT * FROM users ORDER BY date_created DESC LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((users, count))
    }

    /// Apply an allow-listed partial update; absent fields stay untouched
    pub async fn update(&self, id: Uuid, update: &UserUpdate) -> Result<User, ApiError> {
        let password_hash = update
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let user = sqlx::query_as(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                is_admin = COALESCE($4, is_admin)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.username)
        .bind(&password_hash)
        .bind(update.is_admin)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound("User".to_string()))?;

        Ok(user)
    }

    /// Delete a user, their license and reservation cascading with them
    ///
    /// Cars held by the user's active reservations are released first, in
    /// the same transaction, so the availability invariant survives the
    /// cascade.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE cars SET is_available = TRUE
            WHERE id IN (
                SELECT car_id FROM reservations
                WHERE user_id = $1 AND status = 'reserved'
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::RecordNotFound("User".to_string()));
        }

        tx.commit().await?;

        Ok(())
    }
}
