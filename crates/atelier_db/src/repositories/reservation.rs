//! Repository for reservations
//!
//! Reservations are append-only: the booking site creates them and reads
//! them back by date, it never updates or deletes one.

use crate::error::DbError;

pub use atelier_common::models::{NewReservation, Reservation};

/// Repository for reservations
pub trait ReservationRepository {
    /// Create the `reservations` and `available_slots` tables if they don't
    /// already exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Append one reservation and return its assigned id.
    fn insert_reservation(
        &self,
        reservation: NewReservation,
    ) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;

    /// Every slot recorded for `date`, in insertion order. Repeats are kept.
    ///
    /// A row that fails to decode fails the whole call.
    fn booked_slots(
        &self,
        date: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, DbError>> + Send;

    /// Every reservation for `date`, in insertion order.
    fn find_by_date(
        &self,
        date: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Reservation>, DbError>> + Send;
}
