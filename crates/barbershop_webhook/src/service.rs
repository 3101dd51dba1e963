use barbershop_common::http::client::post;
use barbershop_common::services::{
    BookingNotice, BoxFuture, NotificationResult, NotificationService,
};
use barbershop_config::WebhookConfig;
use thiserror::Error;
use tracing::{debug, warn};

/// Webhook-specific error types.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The request never got an HTTP answer (DNS, TLS, timeout)
    #[error("Webhook request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The receiver answered with a non-success status
    #[error("Webhook returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing or unusable webhook configuration
    #[error("Webhook configuration missing or incomplete")]
    ConfigError,
}

/// Posts accepted bookings as JSON to a configured URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Builds the notifier from `webhook.url`, which must be an http(s) URL.
    pub fn from_config(config: &WebhookConfig) -> Result<Self, WebhookError> {
        let url = config.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(WebhookError::ConfigError);
        }
        Ok(Self::new(url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NotificationService for WebhookNotifier {
    type Error = WebhookError;

    fn send_booking_notice(
        &self,
        notice: &BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        // the returned future must not borrow the caller's notice
        let notice = notice.clone();

        Box::pin(async move {
            debug!("Posting booking {:?} to webhook", notice.event_id);
            let response = post(&self.url, &notice).await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                warn!("Webhook answered {}: {}", status, message);
                return Err(WebhookError::ApiError {
                    status_code: status.as_u16(),
                    message,
                });
            }

            Ok(NotificationResult {
                id: notice.event_id.unwrap_or_default(),
                status: status.as_u16().to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_http_url() {
        let config = WebhookConfig {
            url: "secret_from_env".to_string(),
            source: None,
        };
        assert!(matches!(
            WebhookNotifier::from_config(&config),
            Err(WebhookError::ConfigError)
        ));

        let config = WebhookConfig {
            url: " https://hooks.example.com/booking ".to_string(),
            source: None,
        };
        let notifier = WebhookNotifier::from_config(&config).unwrap();
        assert_eq!(notifier.url(), "https://hooks.example.com/booking");
    }
}
