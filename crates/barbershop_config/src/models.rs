// --- File: crates/barbershop_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Time zone used when `gcal.time_zone` is not configured.
pub const DEFAULT_TIME_ZONE: &str = "Europe/Lisbon";

/// Days ahead a booking may be placed when `booking.horizon_days` is not configured.
pub const DEFAULT_HORIZON_DAYS: i64 = 30;

// --- General Server Config ---
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
            port: 3000,
        }
    }
}

// --- Google Calendar Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub key_path: Option<String>,    // path to the service account JSON key
    pub calendar_id: Option<String>, // Mandatory when use_gcal is set
    pub time_zone: Option<String>,   // IANA name, e.g. "Europe/Lisbon"
}

impl GcalConfig {
    pub fn time_zone_name(&self) -> &str {
        self.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE)
    }
}

// --- Booking Rules ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HairdresserConfig {
    /// Stable identifier, stored on calendar events. Never rename an id in use.
    pub id: String,
    /// Display name, written into the event description.
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
    #[serde(default = "default_hairdressers")]
    pub hairdressers: Vec<HairdresserConfig>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            hairdressers: default_hairdressers(),
        }
    }
}

fn default_horizon_days() -> i64 {
    DEFAULT_HORIZON_DAYS
}

fn default_hairdressers() -> Vec<HairdresserConfig> {
    vec![
        HairdresserConfig {
            id: "julio".to_string(),
            name: "Júlio".to_string(),
        },
        HairdresserConfig {
            id: "brando".to_string(),
            name: "Brando".to_string(),
        },
    ]
}

// --- Outbound Webhook ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhookConfig {
    pub url: String, // may be "secret_from_env"
    pub source: Option<String>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_webhook: bool,

    #[serde(default)]
    pub log_level: Option<String>,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}
