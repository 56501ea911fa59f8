// --- File: crates/services/atelier_backend/src/app_state.rs ---
use atelier_booking::routes::routes;
use atelier_booking::workflow::ReservationWorkflow;
use atelier_booking::{BookingState, SlotCatalog};
use atelier_common::services::ServiceFactory;
use atelier_common::AtelierError;
use atelier_config::AppConfig;
use atelier_db::{DbClient, ReservationRepository, SqlReservationRepository};
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application context built once at startup and shared with every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking: Arc<BookingState<SqlReservationRepository>>,
}

impl AppState {
    /// Open the reservation store, create its schema and wire the workflow
    /// to the services of `service_factory`.
    pub async fn new(
        config: Arc<AppConfig>,
        service_factory: &dyn ServiceFactory,
    ) -> Result<Self, AtelierError> {
        let client = DbClient::from_config(&config.database).await?;
        info!("Reservation store: {}", client);

        let repository = SqlReservationRepository::new(client);
        repository.init_schema().await?;

        let workflow = ReservationWorkflow::new(
            repository,
            service_factory.calendar_service(),
            service_factory.notification_service(),
            config.gcal.calendar_id.clone(),
            config.booking.clone(),
        );

        let booking = Arc::new(BookingState {
            config: config.clone(),
            catalog: SlotCatalog::from_config(&config.booking),
            workflow,
        });

        Ok(Self { config, booking })
    }
}

/// The complete application: site routes, static assets and request tracing.
pub fn build_router(state: &AppState) -> Router {
    let site = &state.config.site;

    #[allow(unused_mut)] // mutable only with the openapi feature
    let mut app = routes(state.booking.clone())
        .nest_service(&site.static_prefix, ServeDir::new(&site.static_dir))
        .nest_service(&site.images_prefix, ServeDir::new(&site.images_dir));

    #[cfg(feature = "openapi")]
    {
        use atelier_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Republik Photo booking API",
                version = "0.1.0",
                description = "Reservation intake and slot availability",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags((name = "Atelier", description = "Booking site endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("📖 Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
}
