// --- File: crates/services/barbershop_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the external services the configuration switches on. A service that
//! fails to initialize is logged and left out; its routes then answer 503.
use barbershop_common::services::BoxedNotifier;
use barbershop_common::{is_gcal_enabled, is_webhook_enabled};
use barbershop_config::AppConfig;
use barbershop_gcal::{
    auth::create_calendar_hub,
    handlers::{GcalState, SharedCalendar, SharedNotifier},
    service::GoogleCalendarService,
};
use barbershop_webhook::WebhookNotifier;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct BarbershopServiceFactory {
    config: Arc<AppConfig>,
    calendar_service: Option<SharedCalendar>,
    notification_service: Option<SharedNotifier>,
}

impl BarbershopServiceFactory {
    /// Create a new service factory.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let calendar_service = Self::init_calendar(&config).await;
        let notification_service = Self::init_notifier(&config);

        Self {
            config,
            calendar_service,
            notification_service,
        }
    }

    async fn init_calendar(config: &AppConfig) -> Option<SharedCalendar> {
        let gcal = match config.gcal.as_ref() {
            Some(gcal) if is_gcal_enabled(config) => gcal,
            _ => {
                warn!("Google Calendar is disabled; booking routes will answer 503");
                return None;
            }
        };

        info!("Initializing Google Calendar service...");
        match create_calendar_hub(gcal).await {
            Ok(hub) => Some(Arc::new(GoogleCalendarService::new(Arc::new(hub)))),
            Err(e) => {
                error!("Failed to initialize Google Calendar: {}", e);
                None
            }
        }
    }

    fn init_notifier(config: &AppConfig) -> Option<SharedNotifier> {
        let webhook = config.webhook.as_ref().filter(|_| is_webhook_enabled(config))?;
        match WebhookNotifier::from_config(webhook) {
            Ok(notifier) => {
                info!("Booking webhook enabled");
                Some(Arc::new(BoxedNotifier(notifier)))
            }
            Err(e) => {
                error!("Failed to initialize booking webhook: {}", e);
                None
            }
        }
    }

    pub fn calendar_service(&self) -> Option<SharedCalendar> {
        self.calendar_service.clone()
    }

    pub fn notification_service(&self) -> Option<SharedNotifier> {
        self.notification_service.clone()
    }

    /// State for the booking routes.
    pub fn gcal_state(&self) -> Arc<GcalState> {
        Arc::new(GcalState {
            config: self.config.clone(),
            calendar: self.calendar_service(),
            notifier: self.notification_service(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barbershop_config::{GcalConfig, WebhookConfig};

    #[tokio::test]
    async fn test_disabled_features_build_no_services() {
        let factory = BarbershopServiceFactory::new(Arc::new(AppConfig::default())).await;
        assert!(factory.calendar_service().is_none());
        assert!(factory.notification_service().is_none());
        assert!(factory.gcal_state().calendar.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_key_leaves_calendar_out() {
        let config = AppConfig {
            use_gcal: true,
            gcal: Some(GcalConfig {
                key_path: Some("missing/service-account.json".to_string()),
                calendar_id: Some("shop@group.calendar.google.com".to_string()),
                time_zone: None,
            }),
            use_webhook: true,
            webhook: Some(WebhookConfig {
                url: "https://hooks.example.com/booking".to_string(),
                source: None,
            }),
            ..Default::default()
        };
        let factory = BarbershopServiceFactory::new(Arc::new(config)).await;
        assert!(factory.calendar_service().is_none());
        assert!(factory.notification_service().is_some());
    }
}
