// --- File: crates/services/atelier_backend/src/lib.rs ---
// Declare modules within this crate
pub mod app_state;
pub mod prompt;
pub mod service_factory;

pub use app_state::{build_router, AppState};
pub use service_factory::AtelierServiceFactory;
