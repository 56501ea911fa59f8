// --- File: crates/atelier_booking/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod pages;
pub mod routes;
pub mod slots;
pub mod workflow;
#[cfg(test)]
mod test_support;

pub use handlers::BookingState;
pub use slots::SlotCatalog;
pub use workflow::{ReservationState, WorkflowError, WorkflowOutcome};
