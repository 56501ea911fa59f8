// Test doubles shared by the unit tests of this crate.
#![allow(dead_code)]

use atelier_common::models::NewReservation;
use atelier_common::services::{
    BoxFuture, CalendarEvent, CalendarEventResult, CalendarService, NotificationResult,
    NotificationService, ProviderError,
};
use atelier_config::{AppConfig, BookingConfig};
use atelier_db::repositories::reservation::Reservation;
use atelier_db::{DbClient, DbError, ReservationRepository, SqlReservationRepository};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::handlers::BookingState;
use crate::slots::SlotCatalog;
use crate::workflow::ReservationWorkflow;

#[derive(Clone, Copy, Debug)]
pub enum CalendarBehavior {
    Succeed,
    Fail,
    Expired,
}

pub struct MockCalendar {
    behavior: CalendarBehavior,
    pub events: Mutex<Vec<CalendarEvent>>,
}

impl MockCalendar {
    pub fn new(behavior: CalendarBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl CalendarService for MockCalendar {
    fn create_event(
        &self,
        _calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, ProviderError> {
        Box::pin(async move {
            let n = {
                let mut events = self.events.lock().unwrap();
                events.push(event);
                events.len()
            };
            match self.behavior {
                CalendarBehavior::Succeed => Ok(CalendarEventResult {
                    event_id: format!("evt-{}", n),
                    status: "confirmed".to_string(),
                    html_link: None,
                }),
                CalendarBehavior::Fail => Err(ProviderError::provider("mock_calendar", "outage")),
                CalendarBehavior::Expired => Err(ProviderError::CredentialExpired {
                    service: "mock_calendar".to_string(),
                }),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub struct MockNotifier {
    fail: bool,
    pub sent: Mutex<Vec<SentEmail>>,
}

impl MockNotifier {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationService for MockNotifier {
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, NotificationResult, ProviderError> {
        let email = SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };
        Box::pin(async move {
            let n = {
                let mut sent = self.sent.lock().unwrap();
                sent.push(email);
                sent.len()
            };
            if self.fail {
                Err(ProviderError::provider("mock_mail", "smtp down"))
            } else {
                Ok(NotificationResult {
                    id: format!("msg-{}", n),
                    status: "sent".to_string(),
                })
            }
        })
    }
}

/// A store whose every operation fails.
#[derive(Clone, Default)]
pub struct FailingRepository;

impl ReservationRepository for FailingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert_reservation(&self, _reservation: NewReservation) -> Result<i64, DbError> {
        Err(DbError::QueryError("disk I/O error".to_string()))
    }

    async fn booked_slots(&self, _date: &str) -> Result<Vec<String>, DbError> {
        Err(DbError::QueryError("disk I/O error".to_string()))
    }

    async fn find_by_date(&self, _date: &str) -> Result<Vec<Reservation>, DbError> {
        Err(DbError::QueryError("disk I/O error".to_string()))
    }
}

pub async fn memory_repository() -> SqlReservationRepository {
    let client = DbClient::from_url("sqlite::memory:")
        .await
        .expect("in-memory database");
    let repository = SqlReservationRepository::new(client);
    repository.init_schema().await.expect("schema");
    repository
}

pub fn booking_config() -> BookingConfig {
    BookingConfig {
        operator_email: "studio@example.com".to_string(),
        business_name: "Republik Photo".to_string(),
        calendar_link: "https://calendar.google.com/calendar".to_string(),
        ..BookingConfig::default()
    }
}

pub fn workflow<R: ReservationRepository + Send + Sync>(
    repository: R,
    calendar: Arc<MockCalendar>,
    notifier: Arc<MockNotifier>,
) -> ReservationWorkflow<R> {
    ReservationWorkflow::new(repository, calendar, notifier, "primary", booking_config())
}

pub fn booking_state<R: ReservationRepository + Send + Sync>(
    repository: R,
    calendar: Arc<MockCalendar>,
    notifier: Arc<MockNotifier>,
    templates_dir: &PathBuf,
) -> Arc<BookingState<R>> {
    let mut config = AppConfig::default();
    config.site.templates_dir = templates_dir.display().to_string();
    config.booking = booking_config();

    Arc::new(BookingState {
        config: Arc::new(config),
        catalog: SlotCatalog::default(),
        workflow: workflow(repository, calendar, notifier),
    })
}

pub fn valid_form() -> crate::logic::ReservationForm {
    crate::logic::ReservationForm {
        nom: "Durand".to_string(),
        prenom: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        telephone: "0600000000".to_string(),
        type_session: "Portrait".to_string(),
        date_session: "2024-06-01".to_string(),
        heure_session: "11:00".to_string(),
        nb_personnes: "2".to_string(),
        message: "En extérieur si possible".to_string(),
    }
}
