//! Rental service domain models

pub mod car;
pub mod license;
pub mod reservation;
pub mod user;

// Re-export for convenience
pub use car::{Car, CarUpdate, NewCar};
pub use license::{License, NewLicense};
pub use reservation::{NewReservation, Reservation, ReservationStatus};
pub use user::{LoginCredentials, NewUser, User, UserUpdate};
