//! Repositories for database operations

pub mod car;
pub mod reservation;
pub mod user;

pub use car::CarRepository;
pub use reservation::ReservationRepository;
pub use user::UserRepository;
