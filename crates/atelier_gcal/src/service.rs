// --- File: crates/atelier_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! Calls the Calendar v3 REST API directly with the shared `reqwest` client
//! and a bearer token from the calendar [`TokenSource`].

use atelier_common::credentials::TokenSource;
use atelier_common::http::client::HTTP_CLIENT;
use atelier_common::services::{
    BoxFuture, CalendarEvent, CalendarEventResult, CalendarService, ProviderError,
};
use atelier_config::GcalConfig;
use chrono::Duration;
use chrono_tz::Tz;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use tracing::{error, info};

use crate::logic::{build_event, parse_time_zone, GcalError, InsertedEvent};

pub(crate) const SERVICE_NAME: &str = "google_calendar";

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    tokens: Arc<TokenSource>,
    api_base: Url,
    time_zone: Tz,
    event_duration: Duration,
    client: Client,
}

impl GoogleCalendarService {
    pub fn new(
        tokens: Arc<TokenSource>,
        api_base: &str,
        time_zone: Tz,
        event_duration: Duration,
    ) -> Result<Self, GcalError> {
        let api_base =
            Url::parse(api_base).map_err(|e| GcalError::UrlError(format!("{}: {}", api_base, e)))?;
        Ok(Self {
            tokens,
            api_base,
            time_zone,
            event_duration,
            client: HTTP_CLIENT.clone(),
        })
    }

    pub fn from_config(config: &GcalConfig, tokens: Arc<TokenSource>) -> Result<Self, GcalError> {
        Self::new(
            tokens,
            &config.api_base,
            parse_time_zone(&config.time_zone)?,
            Duration::minutes(config.event_duration_minutes),
        )
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url, GcalError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| GcalError::UrlError(format!("{} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }

    async fn insert(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEventResult, ProviderError> {
        let resource = build_event(event, self.time_zone, self.event_duration)?;
        let url = self.events_url(calendar_id)?;
        let token = self.tokens.access_token().await?;

        info!(
            "Creating calendar event '{}' starting {}",
            resource.summary, resource.start.date_time
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&resource)
            .send()
            .await
            .map_err(|e| ProviderError::provider(SERVICE_NAME, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
            error!(
                "Google Calendar rejected the {} access token: the operator must re-authorize (remove the token cache and restart)",
                self.tokens.name()
            );
            return Err(ProviderError::CredentialExpired {
                service: SERVICE_NAME.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Google Calendar returned {}: {}", status, body);
            return Err(ProviderError::provider(
                SERVICE_NAME,
                format!("status {}: {}", status, body),
            ));
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| ProviderError::provider(SERVICE_NAME, e))?;

        info!("Calendar event {} created", inserted.id);
        Ok(CalendarEventResult {
            event_id: inserted.id,
            status: inserted.status.unwrap_or_else(|| "confirmed".to_string()),
            html_link: inserted.html_link,
        })
    }
}

impl CalendarService for GoogleCalendarService {
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, ProviderError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move { self.insert(&calendar_id, &event).await })
    }
}
