// --- File: crates/atelier_booking/src/workflow.rs ---
//! Intake of one reservation request.
//!
//! Order is fixed: validate, create the calendar event, store the row with
//! the event reference, then notify the customer and the operator. The two
//! emails are best-effort; every earlier step stops the request on failure.
//! A stored-row failure leaves the calendar event in place.

use atelier_common::error::{external_service_error, storage_error, validation_error};
use atelier_common::services::{
    CalendarEvent, CalendarService, NotificationService, ProviderError,
};
use atelier_common::AtelierError;
use atelier_config::BookingConfig;
use atelier_db::{DbError, ReservationRepository};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::logic::{
    customer_email, event_description, event_summary, operator_email, validate, EmailMessage,
    ReservationForm, ValidationFailure, MSG_TECHNICAL,
};

/// Where a request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    Received,
    Validated,
    CalendarCreated,
    Persisted,
    NotifiedCustomer,
    NotifiedOperator,
    Completed,
    RejectedInvalid,
    FailedCalendar,
    FailedPersist,
}

impl ReservationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationState::Completed
                | ReservationState::RejectedInvalid
                | ReservationState::FailedCalendar
                | ReservationState::FailedPersist
        )
    }
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("reservation rejected: {0}")]
    Invalid(#[from] ValidationFailure),

    #[error("calendar event creation failed: {0}")]
    Calendar(#[source] ProviderError),

    #[error("reservation not stored, calendar event {event_id} kept: {source}")]
    Persist {
        event_id: String,
        #[source]
        source: DbError,
    },
}

impl WorkflowError {
    /// The terminal state the request ended in.
    pub fn state(&self) -> ReservationState {
        match self {
            WorkflowError::Invalid(_) => ReservationState::RejectedInvalid,
            WorkflowError::Calendar(_) => ReservationState::FailedCalendar,
            WorkflowError::Persist { .. } => ReservationState::FailedPersist,
        }
    }
}

impl From<WorkflowError> for AtelierError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Invalid(failure) => validation_error(failure),
            WorkflowError::Calendar(_) => external_service_error("google_calendar", MSG_TECHNICAL),
            WorkflowError::Persist { .. } => storage_error(MSG_TECHNICAL),
        }
    }
}

/// Result of one best-effort email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent { message_id: String },
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotificationOutcome::Sent { .. })
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub reservation_id: i64,
    pub event_id: String,
    pub state: ReservationState,
    pub customer_notification: NotificationOutcome,
    pub operator_notification: NotificationOutcome,
}

/// Runs reservation requests against the store and the providers.
pub struct ReservationWorkflow<R> {
    repository: R,
    calendar: Arc<dyn CalendarService>,
    notifier: Arc<dyn NotificationService>,
    calendar_id: String,
    booking: BookingConfig,
}

impl<R: ReservationRepository + Send + Sync> ReservationWorkflow<R> {
    pub fn new(
        repository: R,
        calendar: Arc<dyn CalendarService>,
        notifier: Arc<dyn NotificationService>,
        calendar_id: impl Into<String>,
        booking: BookingConfig,
    ) -> Self {
        Self {
            repository,
            calendar,
            notifier,
            calendar_id: calendar_id.into(),
            booking,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn transition(&self, email: &str, state: ReservationState) {
        info!("Reservation for {}: {:?}", email, state);
    }

    async fn notify(&self, message: &EmailMessage, recipient_kind: &str) -> NotificationOutcome {
        match self
            .notifier
            .send_email(&message.to, &message.subject, &message.body)
            .await
        {
            Ok(result) => NotificationOutcome::Sent {
                message_id: result.id,
            },
            Err(e) => {
                warn!("Failed to send {} email to {}: {}", recipient_kind, message.to, e);
                NotificationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Processes one submitted form.
    pub async fn run(&self, form: &ReservationForm) -> Result<WorkflowOutcome, WorkflowError> {
        let email = form.email.trim();
        self.transition(email, ReservationState::Received);

        // Received -> Validated
        let mut reservation = match validate(form) {
            Ok(reservation) => reservation,
            Err(failure) => {
                info!("Reservation for {} rejected: {}", email, failure);
                return Err(failure.into());
            }
        };
        self.transition(&reservation.email, ReservationState::Validated);

        // Validated -> CalendarCreated
        let event = CalendarEvent {
            date: reservation.date_session.clone(),
            time: reservation.heure_session.clone(),
            summary: event_summary(&reservation),
            description: Some(event_description(&reservation)),
            attendees: vec![self.booking.operator_email.clone(), reservation.email.clone()],
        };
        let created = self
            .calendar
            .create_event(&self.calendar_id, event)
            .await
            .map_err(|e| {
                if e.is_credential_expired() {
                    error!(
                        "Calendar credential expired, the operator must re-authorize: {}",
                        e
                    );
                } else {
                    error!("Failed to create calendar event: {}", e);
                }
                WorkflowError::Calendar(e)
            })?;
        let event_id = created.event_id;
        info!("Calendar event {} created", event_id);
        self.transition(&reservation.email, ReservationState::CalendarCreated);

        // CalendarCreated -> Persisted
        reservation.google_event_id = Some(event_id.clone());
        let reservation_id = self
            .repository
            .insert_reservation(reservation.clone())
            .await
            .map_err(|source| {
                error!(
                    "Failed to store reservation, calendar event {} is left in place: {}",
                    event_id, source
                );
                WorkflowError::Persist {
                    event_id: event_id.clone(),
                    source,
                }
            })?;
        self.transition(&reservation.email, ReservationState::Persisted);

        // Persisted -> NotifiedCustomer -> NotifiedOperator
        let customer_notification = self
            .notify(&customer_email(&reservation, &self.booking), "customer")
            .await;
        self.transition(&reservation.email, ReservationState::NotifiedCustomer);

        let operator_notification = self
            .notify(
                &operator_email(&reservation, &event_id, &self.booking),
                "operator",
            )
            .await;
        self.transition(&reservation.email, ReservationState::NotifiedOperator);

        self.transition(&reservation.email, ReservationState::Completed);
        Ok(WorkflowOutcome {
            reservation_id,
            event_id,
            state: ReservationState::Completed,
            customer_notification,
            operator_notification,
        })
    }
}
