//! Runtime feature switches.
//!
//! A feature is on when its `use_*` flag is set and its config section is
//! present. The calendar feature additionally needs a resolved calendar id.

use barbershop_config::env_vars::SECRET_MARKER;
use barbershop_config::AppConfig;

/// Check if a feature is enabled: flag set and config section present.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

pub fn is_gcal_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
        && config
            .gcal
            .as_ref()
            .and_then(|gcal| gcal.calendar_id.as_deref())
            .is_some_and(|id| !id.trim().is_empty() && id != SECRET_MARKER)
}

pub fn is_webhook_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_webhook, config.webhook.as_ref())
        && config
            .webhook
            .as_ref()
            .is_some_and(|webhook| webhook.url.starts_with("http"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use barbershop_config::{GcalConfig, WebhookConfig};

    #[test]
    fn test_gcal_needs_flag_section_and_calendar_id() {
        let mut config = AppConfig::default();
        assert!(!is_gcal_enabled(&config));

        config.use_gcal = true;
        config.gcal = Some(GcalConfig::default());
        assert!(!is_gcal_enabled(&config));

        config.gcal = Some(GcalConfig {
            calendar_id: Some("shop@group.calendar.google.com".to_string()),
            ..Default::default()
        });
        assert!(is_gcal_enabled(&config));
    }

    #[test]
    fn test_gcal_ignores_unresolved_secret() {
        let config = AppConfig {
            use_gcal: true,
            gcal: Some(GcalConfig {
                calendar_id: Some(SECRET_MARKER.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!is_gcal_enabled(&config));
    }

    #[test]
    fn test_webhook_ignores_unresolved_secret() {
        let mut config = AppConfig {
            use_webhook: true,
            webhook: Some(WebhookConfig {
                url: "secret_from_env".to_string(),
                source: None,
            }),
            ..Default::default()
        };
        assert!(!is_webhook_enabled(&config));

        config.webhook = Some(WebhookConfig {
            url: "https://hooks.example.com/booking".to_string(),
            source: None,
        });
        assert!(is_webhook_enabled(&config));
    }
}
