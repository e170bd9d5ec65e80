//! Car-rental management backend
//!
//! Authenticates users, manages car inventory, and tracks reservations
//! linking users to cars over time ranges. The reservation lifecycle keeps
//! each car's availability flag consistent with its active reservation
//! under concurrent writers; every request passes the access policy gate
//! and the validation pipeline before any mutation.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

/// Schema migrations, applied at startup and by integration tests
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
