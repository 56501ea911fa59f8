// --- File: crates/atelier_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod logic;
pub mod service;

pub use logic::GcalError;
pub use service::GoogleCalendarService;

/// OAuth scope needed to insert events.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
