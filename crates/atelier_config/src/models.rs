// --- File: crates/atelier_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Slots offered every day when `booking.slots` is not configured.
pub const DEFAULT_SLOTS: [&str; 6] = ["09:00", "11:00", "13:00", "15:00", "17:00", "19:00"];

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String, // e.g. ATELIER__DATABASE__URL=sqlite:data/reservations.db
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:reservations.db".to_string(),
        }
    }
}

// --- Site Config ---
// Where pages and static assets live on disk.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub templates_dir: String,
    pub static_dir: String,
    pub static_prefix: String,
    pub images_dir: String,
    pub images_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            templates_dir: "templates".to_string(),
            static_dir: "static".to_string(),
            static_prefix: "/static".to_string(),
            images_dir: "Image_republik_entertainment".to_string(),
            images_prefix: "/Image_republik_entertainment".to_string(),
        }
    }
}

// --- Booking Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BookingConfig {
    /// Ordered catalog of bookable time-of-day slots.
    pub slots: Vec<String>,
    /// Address that receives the "new reservation" notification and is
    /// invited to every calendar event.
    pub operator_email: String,
    pub business_name: String,
    pub calendar_link: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect(),
            operator_email: "contact@republik-photo.fr".to_string(),
            business_name: "Republik Photo".to_string(),
            calendar_link: "https://calendar.google.com/calendar".to_string(),
        }
    }
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GcalConfig {
    pub credentials_path: String, // OAuth client secrets downloaded from the Google console
    pub token_path: String,       // cached access/refresh token, written after authorization
    pub calendar_id: String,
    pub time_zone: String,
    pub event_duration_minutes: i64,
    pub api_base: String,
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            credentials_path: "calendar_credentials.json".to_string(),
            token_path: "calendar_token.json".to_string(),
            calendar_id: "primary".to_string(),
            time_zone: "Europe/Paris".to_string(),
            event_duration_minutes: 120,
            api_base: "https://www.googleapis.com/calendar/v3".to_string(),
        }
    }
}

// --- Gmail Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GmailConfig {
    pub credentials_path: String,
    pub token_path: String,
    pub sender_name: String,
    pub sender_address: String,
    pub api_base: String,
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            credentials_path: "gmail_credentials.json".to_string(),
            token_path: "gmail_token.json".to_string(),
            sender_name: "Republik photo".to_string(),
            sender_address: "contact@republik-photo.fr".to_string(),
            api_base: "https://gmail.googleapis.com/gmail/v1".to_string(),
        }
    }
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String, // overridden by RUST_LOG when set
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub gmail: GmailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
