//! Repository modules for database access

pub mod reservation;
pub mod reservation_sql;

pub use reservation::ReservationRepository;
pub use reservation_sql::SqlReservationRepository;
