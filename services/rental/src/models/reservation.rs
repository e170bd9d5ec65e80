//! Reservation model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reservation lifecycle state
///
/// `none -> reserved -> cancelled`; hard deletion is reachable from either
/// live state and removes the row entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Reserved,
    Cancelled,
}

/// Reservation entity, binding one user to one car over a time window
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub car_id: Uuid,
    pub user_id: Uuid,
    pub status: ReservationStatus,
    pub reservation_start_date: DateTime<Utc>,
    pub reservation_end_date: DateTime<Utc>,
    pub date_created: DateTime<Utc>,
    pub date_last_update: Option<DateTime<Utc>>,
}

/// Normalized booking payload; the renter comes from the session
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub car_id: Uuid,
    pub reservation_start_date: DateTime<Utc>,
    pub reservation_end_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Reserved).unwrap(),
            "\"reserved\""
        );
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
