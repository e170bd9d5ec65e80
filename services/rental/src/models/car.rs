//! Car model and related functionality

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Car entity
///
/// `is_available` is toggled by the reservation lifecycle only; the one
/// exception is the explicit admin override through [`CarUpdate`].
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub license_plate: String,
    pub company: String,
    pub model: String,
    pub fabrication_year: String,
    pub number_of_seats: i32,
    pub is_available: bool,
}

/// Normalized car creation payload
#[derive(Debug, Clone)]
pub struct NewCar {
    pub license_plate: String,
    pub company: String,
    pub model: String,
    pub fabrication_year: String,
    pub number_of_seats: i32,
}

/// Allow-listed partial-update payload for a car
#[derive(Debug, Clone, Default)]
pub struct CarUpdate {
    pub license_plate: Option<String>,
    pub company: Option<String>,
    pub model: Option<String>,
    pub fabrication_year: Option<String>,
    pub number_of_seats: Option<i32>,
    /// Admin availability override
    pub is_available: Option<bool>,
}
