// File: services/atelier_backend/src/main.rs
use atelier_backend::prompt::TerminalPrompt;
use atelier_backend::{build_router, AppState, AtelierServiceFactory};
use atelier_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    atelier_common::init_with_filter(&config.logging.level);

    let service_factory = AtelierServiceFactory::new(&config, Arc::new(TerminalPrompt))
        .expect("Failed to initialize Google services");
    service_factory.warm_up().await;

    let state = AppState::new(config.clone(), &service_factory)
        .await
        .expect("Failed to initialize the reservation store");
    let app = build_router(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind address");
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
