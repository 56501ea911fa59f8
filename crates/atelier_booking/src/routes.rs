// --- File: crates/atelier_booking/src/routes.rs ---

use crate::handlers::{available_slots_handler, reservation_handler, BookingState};
use crate::pages::{render_page, PAGES};
use atelier_db::ReservationRepository;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates the router for the whole site: pages, the reservation form and
/// the availability API. Static assets are mounted by the binary.
pub fn routes<R>(state: Arc<BookingState<R>>) -> Router
where
    R: ReservationRepository + Send + Sync + 'static,
{
    let mut router = Router::new();

    for (path, template) in PAGES {
        router = router.route(
            path,
            get(move |State(state): State<Arc<BookingState<R>>>| async move {
                render_page(&state.templates_dir(), template).await
            }),
        );
    }

    router
        .route("/reservation", post(reservation_handler::<R>))
        .route("/api/heures-disponibles", get(available_slots_handler::<R>))
        .with_state(state)
}
