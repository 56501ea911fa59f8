// File: crates/atelier_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::AvailabilityQuery;
use crate::logic::ReservationForm;

#[utoipa::path(
    get,
    path = "/api/heures-disponibles",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free slots in catalog order", body = Vec<String>,
         example = json!(["09:00", "13:00", "15:00", "19:00"])),
        (status = 400, description = "Missing date", body = String, example = "Date non fournie"),
        (status = 500, description = "Storage error", body = String)
    ),
    tag = "Booking"
)]
fn doc_available_slots_handler() {}

#[utoipa::path(
    post,
    path = "/reservation",
    request_body(content = ReservationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Reservation accepted, redirect to /confirmation"),
        (status = 400, description = "Invalid form", body = String,
         example = "Le format de l'email est invalide."),
        (status = 500, description = "Calendar or storage failure", body = String)
    ),
    tag = "Booking"
)]
fn doc_reservation_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_available_slots_handler, doc_reservation_handler),
    components(schemas(ReservationForm)),
    tags((name = "Booking", description = "Slot availability and reservation intake"))
)]
pub struct BookingApiDoc;
