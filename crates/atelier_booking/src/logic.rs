// --- File: crates/atelier_booking/src/logic.rs ---
//! Form validation, availability lookup and the texts sent to the calendar
//! and mail providers.

use atelier_common::models::NewReservation;
use atelier_config::BookingConfig;
use atelier_db::{DbError, ReservationRepository};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::slots::SlotCatalog;

// --- User-facing messages ---
pub const MSG_TECHNICAL: &str =
    "Erreur lors de l'ajout de l'événement au calendrier : erreur technique : impossible de traiter votre demande";
pub const MSG_DATE_MISSING: &str = "Date non fournie";
pub const MSG_STORAGE: &str = "Erreur lors de la récupération des données";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

// --- Data Structures ---

/// The reservation form as posted by the site. Absent fields are empty.
#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct ReservationForm {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub type_session: String,
    pub date_session: String,
    pub heure_session: String,
    pub nb_personnes: String,
    pub message: String,
}

/// Why a form was rejected. `Display` is the text shown to the visitor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Veuillez remplir tous les champs obligatoires.")]
    MissingFields,
    #[error("Le format de l'email est invalide.")]
    InvalidEmail,
    #[error("Le nombre de personnes est invalide.")]
    InvalidPartySize,
}

/// A plain-text email ready for the notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

// --- Validation ---

pub fn is_email_valid(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Blank means "not given"; anything else must be a non-negative integer.
pub fn parse_party_size(raw: &str) -> Result<Option<i64>, ValidationFailure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(Some(n)),
        _ => Err(ValidationFailure::InvalidPartySize),
    }
}

/// Checks the required fields and the email format, and returns the trimmed
/// reservation without a calendar reference.
pub fn validate(form: &ReservationForm) -> Result<NewReservation, ValidationFailure> {
    let required = [
        &form.nom,
        &form.prenom,
        &form.email,
        &form.telephone,
        &form.type_session,
        &form.date_session,
        &form.heure_session,
    ];
    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(ValidationFailure::MissingFields);
    }

    let email = form.email.trim();
    if !is_email_valid(email) {
        return Err(ValidationFailure::InvalidEmail);
    }

    let nb_personnes = parse_party_size(&form.nb_personnes)?;

    Ok(NewReservation {
        nom: form.nom.trim().to_string(),
        prenom: form.prenom.trim().to_string(),
        email: email.to_string(),
        telephone: form.telephone.trim().to_string(),
        type_session: form.type_session.trim().to_string(),
        date_session: form.date_session.trim().to_string(),
        heure_session: form.heure_session.trim().to_string(),
        nb_personnes,
        message: form.message.trim().to_string(),
        google_event_id: None,
    })
}

// --- Availability ---

/// Slots still bookable on `date`.
pub async fn available_slots<R: ReservationRepository>(
    repository: &R,
    catalog: &SlotCatalog,
    date: &str,
) -> Result<Vec<String>, DbError> {
    let booked = repository.booked_slots(date).await?;
    let available = catalog.available(&booked);
    debug!(
        "{}: {} booked, {} available",
        date,
        booked.len(),
        available.len()
    );
    Ok(available)
}

// --- Provider texts ---

fn party_size_text(reservation: &NewReservation) -> String {
    reservation
        .nb_personnes
        .map(|n| n.to_string())
        .unwrap_or_default()
}

pub fn event_summary(reservation: &NewReservation) -> String {
    format!(
        "Réservation de {} - {}",
        reservation.nom, reservation.type_session
    )
}

pub fn event_description(reservation: &NewReservation) -> String {
    format!(
        "Téléphone: {}\nEmail: {}\nMessage: {}\nNombre de personnes: {}",
        reservation.telephone,
        reservation.email,
        reservation.message,
        party_size_text(reservation)
    )
}

pub fn customer_email(reservation: &NewReservation, booking: &BookingConfig) -> EmailMessage {
    let body = format!(
        "Bonjour {prenom},\n\n\
         Votre réservation pour une session de type '{session}' a été enregistrée pour le {date} à {time}.\n\
         Nous avons également ajouté cet événement à votre Google Calendar.\n\n\
         Vous pouvez consulter et gérer les détails de votre réservation en suivant ce lien :\n\
         {link}\n\n\
         Cordialement,\n\
         L'équipe de {business}\n",
        prenom = reservation.prenom,
        session = reservation.type_session,
        date = reservation.date_session,
        time = reservation.heure_session,
        link = booking.calendar_link,
        business = booking.business_name,
    );

    EmailMessage {
        to: reservation.email.clone(),
        subject: "Confirmation de votre réservation".to_string(),
        body,
    }
}

pub fn operator_email(
    reservation: &NewReservation,
    event_id: &str,
    booking: &BookingConfig,
) -> EmailMessage {
    let body = format!(
        "Bonjour,\n\n\
         Une nouvelle réservation a été effectuée :\n\n\
         Nom : {nom} {prenom}\n\
         Email : {email}\n\
         Téléphone : {telephone}\n\
         Type de session : {session}\n\
         Date : {date}\n\
         Heure : {time}\n\
         Nombre de personnes : {nb}\n\
         Message : {message}\n\n\
         Consultez le Google Calendar pour plus de détails :\n\
         {event_id}\n\n\
         Cordialement,\n\
         Votre système de réservation\n",
        nom = reservation.nom,
        prenom = reservation.prenom,
        email = reservation.email,
        telephone = reservation.telephone,
        session = reservation.type_session,
        date = reservation.date_session,
        time = reservation.heure_session,
        nb = party_size_text(reservation),
        message = reservation.message,
        event_id = event_id,
    );

    EmailMessage {
        to: booking.operator_email.clone(),
        subject: "Nouvelle réservation reçue".to_string(),
        body,
    }
}
