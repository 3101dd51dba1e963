// --- File: crates/barbershop_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! Handlers depend on these traits rather than on the Google Calendar client or
//! the webhook client directly, so tests can swap in in-memory
//! implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// Operations the booking flow needs from a calendar backend.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: StdError + Send + Sync + 'static;

    /// List the non-deleted events overlapping `[start_time, end_time)`,
    /// sorted by start time.
    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error>;

    /// Insert an event. When `event.event_id` is set and already taken the
    /// implementation must fail with its conflict error.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}

/// Outbound notification of accepted bookings.
pub trait NotificationService: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    fn send_booking_notice(
        &self,
        notice: &BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// Adapter erasing a notifier's error type so different implementations can
/// share one `dyn NotificationService<Error = BoxedError>` slot.
pub struct BoxedNotifier<S>(pub S);

impl<S: NotificationService> NotificationService for BoxedNotifier<S> {
    type Error = BoxedError;

    fn send_booking_notice(
        &self,
        notice: &BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let inner = self.0.send_booking_notice(notice);
        Box::pin(async move { inner.await.map_err(|e| BoxedError(Box::new(e))) })
    }
}

/// An event to be written to the calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    /// Client-chosen event id; `None` lets the calendar assign one.
    pub event_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// IANA zone the event is displayed in.
    pub time_zone: String,
    pub summary: String,
    pub description: Option<String>,
    /// Private extended properties, invisible to attendees.
    #[serde(default)]
    pub private_properties: BTreeMap<String, String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    pub event_id: Option<String>,
    pub status: String,
    /// Link to the event in the calendar web UI.
    pub html_link: Option<String>,
}

/// An event read back from the calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookedEvent {
    pub event_id: String,
    pub summary: String,
    pub description: Option<String>,
    /// `None` for all-day events.
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// "confirmed", "tentative" or "cancelled".
    pub status: String,
    #[serde(default)]
    pub private_properties: BTreeMap<String, String>,
}

/// Payload posted to the booking webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingNotice {
    pub first_name: String,
    pub last_name: String,
    pub date: String,
    pub time: String,
    pub email: String,
    pub phone_number: String,
    pub haircut_type: String,
    pub hairdresser: String,
    pub extras: Option<String>,
    pub event_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub id: String,
    pub status: String,
}
