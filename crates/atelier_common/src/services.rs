// --- File: crates/atelier_common/src/services.rs ---
//! Service abstractions for the external providers.
//!
//! The reservation workflow only knows these traits. Concrete Google
//! implementations live in `atelier-gcal` and `atelier-gmail`; tests plug in
//! hand-written doubles.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

use crate::credentials::CredentialError;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Failure of a calendar or mail provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider rejected the access token (HTTP 401). The operator must
    /// re-authorize the application.
    #[error("{service}: credential expired or revoked, re-authorization required")]
    CredentialExpired { service: String },

    /// Any other provider-side or transport failure.
    #[error("{service}: {message}")]
    Provider { service: String, message: String },

    /// No usable credential could be obtained.
    #[error("credential unavailable: {0}")]
    Credential(#[from] CredentialError),
}

impl ProviderError {
    pub fn provider(service: &str, message: impl std::fmt::Display) -> Self {
        ProviderError::Provider {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_credential_expired(&self) -> bool {
        matches!(self, ProviderError::CredentialExpired { .. })
    }
}

/// A trait for calendar service operations.
pub trait CalendarService: Send + Sync {
    /// Create a calendar event and return the provider's reference to it.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, ProviderError>;
}

/// A trait for notification service operations.
pub trait NotificationService: Send + Sync {
    /// Send a plain-text email.
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, NotificationResult, ProviderError>;
}

/// A factory for creating service instances.
///
/// The backend builds one at startup and hands the services to the
/// application context.
pub trait ServiceFactory: Send + Sync {
    /// Get the calendar service instance.
    fn calendar_service(&self) -> Arc<dyn CalendarService>;

    /// Get the notification service instance.
    fn notification_service(&self) -> Arc<dyn NotificationService>;
}

/// A calendar event as requested by the workflow.
///
/// `date` and `time` are the raw local values from the booking form
/// (`YYYY-MM-DD`, `HH:MM`). The provider interprets them in its configured
/// time zone and rejects values it cannot parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: String,
    pub time: String,
    pub summary: String,
    pub description: Option<String>,
    pub attendees: Vec<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: String,
    /// The status of the event.
    pub status: String,
    pub html_link: Option<String>,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The ID of the sent message.
    pub id: String,
    /// The status of the notification.
    pub status: String,
}
