use atelier_backend::{build_router, AppState, AtelierServiceFactory};
use atelier_common::credentials::TokenSource;
use atelier_config::AppConfig;
use atelier_db::ReservationRepository;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORM: &str = "nom=Durand&prenom=Alice&email=alice%40example.com&telephone=0600000000\
    &type_session=Portrait&date_session=2024-06-01&heure_session=11%3A00&nb_personnes=2\
    &message=En+ext%C3%A9rieur";

fn site_dir() -> PathBuf {
    let root = std::env::temp_dir().join(format!("atelier-site-{}", uuid::Uuid::new_v4()));
    for dir in ["templates", "static/css", "images"] {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }
    std::fs::write(root.join("templates/confirmation.html"), "<h1>Merci</h1>").unwrap();
    std::fs::write(root.join("templates/reservation.html"), "<form></form>").unwrap();
    std::fs::write(root.join("static/css/site.css"), "body { margin: 0; }").unwrap();
    std::fs::write(root.join("images/logo.txt"), "logo").unwrap();
    root
}

fn config(server: &MockServer, root: &PathBuf) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.site.templates_dir = root.join("templates").display().to_string();
    config.site.static_dir = root.join("static").display().to_string();
    config.site.images_dir = root.join("images").display().to_string();
    config.booking.operator_email = "studio@example.com".to_string();
    config.gcal.api_base = format!("{}/calendar/v3", server.uri());
    config.gmail.api_base = format!("{}/gmail/v1", server.uri());
    config.gmail.sender_address = "studio@example.com".to_string();
    config
}

async fn app_state(config: AppConfig) -> AppState {
    let factory = AtelierServiceFactory::with_token_sources(
        &config,
        Arc::new(TokenSource::fixed("google_calendar", "cal-token")),
        Arc::new(TokenSource::fixed("gmail", "mail-token")),
    )
    .unwrap();
    assert_eq!(factory.warm_up().await, 2);
    AppState::new(Arc::new(config), &factory).await.unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/reservation")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn decoded_messages(requests: &[wiremock::Request]) -> Vec<String> {
    requests
        .iter()
        .filter(|r| r.url.path().ends_with("/messages/send"))
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            let raw = body["raw"].as_str().unwrap();
            String::from_utf8(URL_SAFE.decode(raw).unwrap()).unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_reservation_goes_through_calendar_store_and_mail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(header_eq("authorization", "Bearer cal-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt-1",
            "status": "confirmed"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/messages/send"))
        .and(header_eq("authorization", "Bearer mail-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg-1",
            "labelIds": ["SENT"]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let root = site_dir();
    let state = app_state(config(&server, &root)).await;
    let app = build_router(&state);

    let response = app.clone().oneshot(post_form(FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/confirmation");

    let stored = state
        .booking
        .workflow
        .repository()
        .find_by_date("2024-06-01")
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].google_event_id.as_deref(), Some("evt-1"));
    assert_eq!(stored[0].nb_personnes, Some(2));

    let requests = server.received_requests().await.unwrap();
    let messages = decoded_messages(&requests);
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().any(|m| m.contains("To: alice@example.com")));
    assert!(messages.iter().any(|m| m.contains("To: studio@example.com")));

    let response = app
        .oneshot(get("/api/heures-disponibles?date=2024-06-01"))
        .await
        .unwrap();
    let slots: Vec<String> = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(slots, vec!["09:00", "13:00", "15:00", "17:00", "19:00"]);
}

#[tokio::test]
async fn test_expired_calendar_credential_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/messages/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-1" })))
        .expect(0)
        .mount(&server)
        .await;

    let root = site_dir();
    let state = app_state(config(&server, &root)).await;
    let app = build_router(&state);

    let response = app.oneshot(post_form(FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response)
        .await
        .starts_with("Erreur lors de l'ajout de l'événement au calendrier"));

    let stored = state
        .booking
        .workflow
        .repository()
        .find_by_date("2024-06-01")
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_mail_outage_still_confirms() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "evt-9" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/messages/send"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let root = site_dir();
    let state = app_state(config(&server, &root)).await;

    let response = build_router(&state).oneshot(post_form(FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_static_assets_and_pages_are_served() {
    let server = MockServer::start().await;
    let root = site_dir();
    let state = app_state(config(&server, &root)).await;
    let app = build_router(&state);

    let response = app.clone().oneshot(get("/static/css/site.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "body { margin: 0; }");

    let response = app
        .clone()
        .oneshot(get("/Image_republik_entertainment/logo.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/confirmation")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "<h1>Merci</h1>");

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
