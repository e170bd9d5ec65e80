//! Shared helpers for the live-database integration tests
#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use rental::MIGRATOR;
use rental::config::AppConfig;
use rental::models::{Car, NewCar, NewLicense, NewReservation, NewUser, User};
use rental::repositories::{CarRepository, ReservationRepository, UserRepository};
use rental::session::{SessionStore, SessionUser};
use rental::state::AppState;

use common::cache::{RedisConfig, RedisPool};
use common::database::{DatabaseConfig, init_pool};

/// Connect to the test database and apply migrations
pub async fn test_pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");
    MIGRATOR.run(&pool).await.expect("migrations");
    pool
}

/// Application state wired to the live test database and cache
pub async fn test_state() -> AppState {
    let db_pool = test_pool().await;

    let redis_config = RedisConfig::from_env().expect("redis config");
    let redis_pool = RedisPool::new(&redis_config).await.expect("redis pool");

    let config = AppConfig::from_env();
    let sessions = SessionStore::new(redis_pool, config.session_ttl_seconds());

    AppState {
        db_pool: db_pool.clone(),
        config,
        users: UserRepository::new(db_pool.clone()),
        cars: CarRepository::new(db_pool.clone()),
        reservations: ReservationRepository::new(db_pool),
        sessions,
    }
}

/// Mint a live session token for a user
pub async fn session_token(state: &AppState, user_id: Uuid, is_admin: bool) -> String {
    state
        .sessions
        .create(&SessionUser { user_id, is_admin })
        .await
        .expect("create session")
}

/// Random alphanumeric suffix so records never collide across runs
fn unique(prefix: &str, len: usize) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &suffix[..len - prefix.len()])
}

/// A valid registration payload with unique identity fields
pub fn new_user() -> NewUser {
    NewUser {
        username: unique("u", 20),
        email: format!("{}@example.com", unique("e", 20)),
        password: "Sup3r-secret".to_string(),
        license: NewLicense {
            // 12 alphanumeric characters
            license_number: unique("L", 12),
            date_issued: Utc::now().date_naive() - Duration::days(30),
            date_expiry: Utc::now().date_naive() + Duration::days(365),
        },
    }
}

/// Register a fresh user
pub async fn create_user(pool: &PgPool) -> User {
    let (user, _license) = UserRepository::new(pool.clone())
        .register(&new_user())
        .await
        .expect("register user");
    user
}

/// Create a fresh available car
pub async fn create_car(pool: &PgPool) -> Car {
    CarRepository::new(pool.clone())
        .create(&NewCar {
            license_plate: unique("P", 10),
            company: "Renault".to_string(),
            model: "Clio".to_string(),
            fabrication_year: "2021".to_string(),
            number_of_seats: 5,
        })
        .await
        .expect("create car")
}

/// A booking window starting now
pub fn booking(car_id: Uuid) -> NewReservation {
    NewReservation {
        car_id,
        reservation_start_date: Utc::now(),
        reservation_end_date: Utc::now() + Duration::days(2),
    }
}
