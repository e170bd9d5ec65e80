//! Application state shared across handlers

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::repositories::{CarRepository, ReservationRepository, UserRepository};
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub users: UserRepository,
    pub cars: CarRepository,
    pub reservations: ReservationRepository,
    pub sessions: SessionStore,
}
