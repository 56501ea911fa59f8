// --- File: crates/atelier_booking/src/pages.rs ---
//! Static site pages, read from the template directory on every request.

use atelier_common::error::internal_error;
use atelier_common::AtelierError;
use axum::response::Html;
use std::path::Path;
use tracing::error;

/// Route path and template file of every page of the site.
pub const PAGES: [(&str, &str); 7] = [
    ("/", "accueil.html"),
    ("/a-propos", "apropos.html"),
    ("/services", "services.html"),
    ("/portfolio", "portfolio.html"),
    ("/contact", "contact.html"),
    ("/confirmation", "confirmation.html"),
    ("/reservation", "reservation.html"),
];

pub async fn render_page(templates_dir: &Path, template: &str) -> Result<Html<String>, AtelierError> {
    let path = templates_dir.join(template);
    tokio::fs::read_to_string(&path).await.map(Html).map_err(|e| {
        error!("Failed to read page {}: {}", path.display(), e);
        internal_error(format!("Impossible d'afficher la page {}", template))
    })
}
