// --- File: crates/services/atelier_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the Google Calendar and Gmail services from the configuration,
//! each with its own token source.
use atelier_common::credentials::{AuthorizationPrompt, TokenSource};
use atelier_common::oauth::GoogleOAuthProvider;
use atelier_common::services::{CalendarService, NotificationService, ServiceFactory};
use atelier_common::{config_error, AtelierError};
use atelier_config::AppConfig;
use atelier_gcal::{GoogleCalendarService, CALENDAR_SCOPE};
use atelier_gmail::{GmailNotificationService, GMAIL_SEND_SCOPE};
use std::sync::Arc;
use tracing::{error, info};

pub struct AtelierServiceFactory {
    calendar_service: Arc<GoogleCalendarService>,
    notification_service: Arc<GmailNotificationService>,
    token_sources: Vec<Arc<TokenSource>>,
}

impl AtelierServiceFactory {
    /// Create the factory with Google OAuth token sources read from the
    /// configured client-secrets and token-cache files.
    pub fn new(
        config: &AppConfig,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Result<Self, AtelierError> {
        let calendar_provider = GoogleOAuthProvider::from_files(
            &config.gcal.credentials_path,
            &config.gcal.token_path,
            CALENDAR_SCOPE,
        )
        .map_err(|e| config_error(format!("Google Calendar credentials: {}", e)))?;

        let gmail_provider = GoogleOAuthProvider::from_files(
            &config.gmail.credentials_path,
            &config.gmail.token_path,
            GMAIL_SEND_SCOPE,
        )
        .map_err(|e| config_error(format!("Gmail credentials: {}", e)))?;

        let calendar_tokens = Arc::new(TokenSource::new(
            "google_calendar",
            Arc::new(calendar_provider),
            prompt.clone(),
        ));
        let gmail_tokens = Arc::new(TokenSource::new("gmail", Arc::new(gmail_provider), prompt));

        Self::with_token_sources(config, calendar_tokens, gmail_tokens)
    }

    /// Create the factory over already built token sources.
    pub fn with_token_sources(
        config: &AppConfig,
        calendar_tokens: Arc<TokenSource>,
        gmail_tokens: Arc<TokenSource>,
    ) -> Result<Self, AtelierError> {
        let calendar_service = GoogleCalendarService::from_config(&config.gcal, calendar_tokens.clone())
            .map_err(|e| config_error(format!("Google Calendar: {}", e)))?;
        let notification_service = GmailNotificationService::from_config(&config.gmail, gmail_tokens.clone())
            .map_err(|e| config_error(format!("Gmail: {}", e)))?;

        info!(
            "Google Calendar service ready (time zone {})",
            calendar_service.time_zone()
        );

        Ok(Self {
            calendar_service: Arc::new(calendar_service),
            notification_service: Arc::new(notification_service),
            token_sources: vec![calendar_tokens, gmail_tokens],
        })
    }

    /// Obtain a credential for every provider once. Returns how many
    /// succeeded; failures are logged and left for the first request.
    pub async fn warm_up(&self) -> usize {
        let mut ready = 0;
        for tokens in &self.token_sources {
            match tokens.credential().await {
                Ok(_) => {
                    info!("✅ {} credential ready", tokens.name());
                    ready += 1;
                }
                Err(e) => error!("❌ {} credential unavailable: {}", tokens.name(), e),
            }
        }
        ready
    }
}

impl ServiceFactory for AtelierServiceFactory {
    fn calendar_service(&self) -> Arc<dyn CalendarService> {
        self.calendar_service.clone()
    }

    fn notification_service(&self) -> Arc<dyn NotificationService> {
        self.notification_service.clone()
    }
}
