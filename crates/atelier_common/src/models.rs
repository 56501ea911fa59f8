// --- File: crates/atelier_common/src/models.rs ---
use serde::{Deserialize, Serialize};

/// A booking as written by the reservation workflow.
///
/// All string fields are already trimmed and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub type_session: String,
    pub date_session: String,
    pub heure_session: String,
    pub nb_personnes: Option<i64>,
    pub message: String,
    pub google_event_id: Option<String>,
}

/// A stored booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub type_session: String,
    pub date_session: String,
    pub heure_session: String,
    pub nb_personnes: Option<i64>,
    pub message: String,
    pub google_event_id: Option<String>,
}
