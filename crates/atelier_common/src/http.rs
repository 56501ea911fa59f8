// --- File: crates/atelier_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::{AtelierError, HttpStatusCode};

// Include the client module
pub mod client;

/// Errors become a plain-text body with the status from [`HttpStatusCode`];
/// the site's forms show that text as is.
impl IntoResponse for AtelierError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status_code, self.to_string()).into_response()
    }
}
