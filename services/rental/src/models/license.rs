//! License model

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// License entity, 1:1 with its user and immutable after registration
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct License {
    pub id: Uuid,
    pub license_number: String,
    pub user_id: Uuid,
    pub date_issued: NaiveDate,
    pub date_expiry: NaiveDate,
}

/// Normalized license fields carried inside a registration payload
#[derive(Debug, Clone)]
pub struct NewLicense {
    pub license_number: String,
    pub date_issued: NaiveDate,
    pub date_expiry: NaiveDate,
}
