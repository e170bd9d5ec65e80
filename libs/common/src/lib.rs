//! Common library for the car-rental backend
//!
//! This crate provides the shared infrastructure used by the rental
//! service: PostgreSQL connection pooling and migrations, the Redis pool
//! backing the session store, and the typed errors both report.

pub mod cache;
pub mod database;
pub mod error;
