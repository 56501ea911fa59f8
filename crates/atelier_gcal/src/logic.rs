// --- File: crates/atelier_gcal/src/logic.rs ---
//! Translation of a booking into a Google Calendar event resource.

use atelier_common::services::{CalendarEvent, ProviderError};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum GcalError {
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("Calendar URL error: {0}")]
    UrlError(String),
}

impl From<GcalError> for ProviderError {
    fn from(err: GcalError) -> Self {
        ProviderError::provider(crate::service::SERVICE_NAME, err)
    }
}

// --- Google API resources ---
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventAttendee {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub use_default: bool,
}

/// The subset of the Google `Event` resource sent on insert.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GoogleEvent {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<EventAttendee>,
    pub reminders: EventReminders,
}

/// The fields of the insert response the service reads back.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InsertedEvent {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
}

pub fn parse_time_zone(name: &str) -> Result<Tz, GcalError> {
    name.parse::<Tz>()
        .map_err(|_| GcalError::UnknownTimeZone(name.to_string()))
}

/// Interprets a form date (`YYYY-MM-DD`) and time (`HH:MM`, seconds
/// optional) as wall-clock time in `tz`.
///
/// On the autumn DST overlap the earlier instant wins; times that fall in the
/// spring gap do not exist and are rejected.
pub fn local_start(date: &str, time: &str, tz: Tz) -> Result<DateTime<Tz>, GcalError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| GcalError::TimeParseError(format!("date '{}': {}", date, e)))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .map_err(|e| GcalError::TimeParseError(format!("time '{}': {}", time, e)))?;

    match tz.from_local_datetime(&NaiveDateTime::new(date, time)) {
        LocalResult::Single(start) => Ok(start),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(GcalError::TimeParseError(format!(
            "{} {} does not exist in {}",
            date, time, tz
        ))),
    }
}

/// Builds the event resource for a booking: `duration` long, starting at the
/// requested local time, with default reminders.
pub fn build_event(
    event: &CalendarEvent,
    tz: Tz,
    duration: Duration,
) -> Result<GoogleEvent, GcalError> {
    let start = local_start(&event.date, &event.time, tz)?;
    let end = start + duration;
    let time_zone = tz.name().to_string();

    Ok(GoogleEvent {
        summary: event.summary.clone(),
        description: event.description.clone(),
        start: EventDateTime {
            date_time: start.to_rfc3339(),
            time_zone: time_zone.clone(),
        },
        end: EventDateTime {
            date_time: end.to_rfc3339(),
            time_zone,
        },
        attendees: event
            .attendees
            .iter()
            .map(|email| EventAttendee {
                email: email.clone(),
            })
            .collect(),
        reminders: EventReminders { use_default: true },
    })
}
