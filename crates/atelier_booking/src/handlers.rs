// File: crates/atelier_booking/src/handlers.rs
use atelier_common::error::{storage_error, validation_error};
use atelier_common::AtelierError;
use atelier_config::AppConfig;
use atelier_db::ReservationRepository;
use axum::{
    extract::{rejection::FormRejection, Form, Query, State},
    response::{Json, Redirect},
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::logic::{
    available_slots, ReservationForm, ValidationFailure, MSG_DATE_MISSING, MSG_STORAGE,
};
use crate::slots::SlotCatalog;
use crate::workflow::ReservationWorkflow;

// Shared state needed by the booking handlers
pub struct BookingState<R> {
    pub config: Arc<AppConfig>,
    pub catalog: SlotCatalog,
    pub workflow: ReservationWorkflow<R>,
}

impl<R> BookingState<R> {
    pub fn templates_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.site.templates_dir)
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Date in YYYY-MM-DD format
    pub date: Option<String>,
}

/// Handler listing the slots still free on a date.
pub async fn available_slots_handler<R>(
    State(state): State<Arc<BookingState<R>>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<String>>, AtelierError>
where
    R: ReservationRepository + Send + Sync + 'static,
{
    let date = query
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| validation_error(MSG_DATE_MISSING))?;

    let slots = available_slots(state.workflow.repository(), &state.catalog, date)
        .await
        .map_err(|e| {
            error!("Failed to load booked slots for {}: {}", date, e);
            storage_error(MSG_STORAGE)
        })?;

    Ok(Json(slots))
}

/// Handler accepting the reservation form. A body that is not a form is
/// answered like an empty form.
pub async fn reservation_handler<R>(
    State(state): State<Arc<BookingState<R>>>,
    form: Result<Form<ReservationForm>, FormRejection>,
) -> Result<Redirect, AtelierError>
where
    R: ReservationRepository + Send + Sync + 'static,
{
    let Form(form) = form.map_err(|rejection| {
        warn!("Unreadable reservation form: {}", rejection.body_text());
        validation_error(ValidationFailure::MissingFields)
    })?;

    let outcome = state.workflow.run(&form).await?;

    info!(
        "Reservation {} completed (event {}, customer email sent: {}, operator email sent: {})",
        outcome.reservation_id,
        outcome.event_id,
        outcome.customer_notification.is_sent(),
        outcome.operator_notification.is_sent()
    );
    Ok(Redirect::to("/confirmation"))
}
