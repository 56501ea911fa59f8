use crate::routes::routes;
use crate::test_support::*;
use atelier_db::ReservationRepository;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::path::PathBuf;
use tower::ServiceExt;

fn templates_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("atelier-pages-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    for (name, title) in [
        ("accueil.html", "Accueil"),
        ("apropos.html", "A propos"),
        ("services.html", "Services"),
        ("portfolio.html", "Portfolio"),
        ("contact.html", "Contact"),
        ("confirmation.html", "Merci"),
        ("reservation.html", "Réserver"),
    ] {
        std::fs::write(dir.join(name), format!("<h1>{}</h1>", title)).unwrap();
    }
    dir
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(body: &str) -> Request<Body> {
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

const VALID_FORM: &str = "nom=Durand&prenom=Alice&email=alice%40example.com&telephone=0600000000\
    &type_session=Portrait&date_session=2024-06-01&heure_session=11%3A00&nb_personnes=2&message=";

async fn app() -> (Router, std::sync::Arc<MockCalendar>, std::sync::Arc<MockNotifier>) {
    let calendar = MockCalendar::new(CalendarBehavior::Succeed);
    let notifier = MockNotifier::new(false);
    let state = booking_state(
        memory_repository().await,
        calendar.clone(),
        notifier.clone(),
        &templates_dir(),
    );
    (routes(state), calendar, notifier)
}

#[tokio::test]
async fn test_pages_are_served_from_templates() {
    let (app, _, _) = app().await;

    for (uri, expected) in [
        ("/", "Accueil"),
        ("/a-propos", "A propos"),
        ("/services", "Services"),
        ("/portfolio", "Portfolio"),
        ("/contact", "Contact"),
        ("/confirmation", "Merci"),
        ("/reservation", "Réserver"),
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert!(body_string(response).await.contains(expected), "{}", uri);
    }
}

#[tokio::test]
async fn test_missing_template_is_server_error() {
    let calendar = MockCalendar::new(CalendarBehavior::Succeed);
    let notifier = MockNotifier::new(false);
    let empty_dir = std::env::temp_dir().join(format!("atelier-empty-{}", uuid::Uuid::new_v4()));
    let app = routes(booking_state(
        memory_repository().await,
        calendar,
        notifier,
        &empty_dir,
    ));

    let response = app.oneshot(get("/contact")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_availability_requires_date() {
    let (app, _, _) = app().await;

    for uri in ["/api/heures-disponibles", "/api/heures-disponibles?date="] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "Date non fournie");
    }
}

#[tokio::test]
async fn test_availability_returns_json_catalog() {
    let (app, _, _) = app().await;

    let response = app
        .oneshot(get("/api/heures-disponibles?date=2024-06-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let slots: Vec<String> = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(slots, vec!["09:00", "11:00", "13:00", "15:00", "17:00", "19:00"]);
}

#[tokio::test]
async fn test_availability_storage_error_is_500() {
    let app = routes(booking_state(
        FailingRepository,
        MockCalendar::new(CalendarBehavior::Succeed),
        MockNotifier::new(false),
        &templates_dir(),
    ));

    let response = app
        .oneshot(get("/api/heures-disponibles?date=2024-06-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_booking_redirects_and_removes_slot() {
    let (app, calendar, notifier) = app().await;

    let response = app.clone().oneshot(form_request(VALID_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/confirmation");
    assert_eq!(calendar.calls(), 1);
    assert_eq!(notifier.attempts().len(), 2);

    let response = app
        .oneshot(get("/api/heures-disponibles?date=2024-06-01"))
        .await
        .unwrap();
    let slots: Vec<String> = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(slots, vec!["09:00", "13:00", "15:00", "17:00", "19:00"]);
}

#[tokio::test]
async fn test_invalid_email_is_plain_text_400() {
    let (app, calendar, _) = app().await;
    let body = VALID_FORM.replace("alice%40example.com", "foo%40bar");

    let response = app.oneshot(form_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Le format de l'email est invalide.");
    assert_eq!(calendar.calls(), 0);
}

#[tokio::test]
async fn test_unreadable_form_body_is_plain_text_400() {
    let (app, calendar, notifier) = app().await;

    let without_content_type = Request::builder()
        .method("POST")
        .uri("/reservation")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(without_content_type).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Veuillez remplir tous les champs obligatoires."
    );
    assert_eq!(calendar.calls(), 0);
    assert!(notifier.attempts().is_empty());
}

#[tokio::test]
async fn test_calendar_failure_is_500_without_store_write() {
    let repository = memory_repository().await;
    let app = routes(booking_state(
        repository.clone(),
        MockCalendar::new(CalendarBehavior::Expired),
        MockNotifier::new(false),
        &templates_dir(),
    ));

    let response = app.oneshot(form_request(VALID_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(repository.find_by_date("2024-06-01").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_emails_still_redirect() {
    let app = routes(booking_state(
        memory_repository().await,
        MockCalendar::new(CalendarBehavior::Succeed),
        MockNotifier::new(true),
        &templates_dir(),
    ));

    let response = app.oneshot(form_request(VALID_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/confirmation");
}
