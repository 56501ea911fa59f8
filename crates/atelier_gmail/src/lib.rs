// --- File: crates/atelier_gmail/src/lib.rs ---
pub mod mime;
pub mod service;

pub use service::{GmailError, GmailNotificationService};

/// OAuth scope needed to send mail on the operator's behalf.
pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";
