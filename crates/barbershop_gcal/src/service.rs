// --- File: crates/barbershop_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides an implementation of the CalendarService trait for Google Calendar.

use barbershop_common::services::{
    BookedEvent, BoxFuture, CalendarEvent, CalendarEventResult, CalendarService,
};
use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime, EventExtendedProperties};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::HubType;

/// Upper bound the Calendar API accepts for one page of events.
const PAGE_SIZE: i32 = 250;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Calculation error: {0}")]
    CalculationError(String),
    #[error("Booking conflict")]
    Conflict,
}

/// Whether an API error is the "identifier already exists" answer to an
/// insert with a client-chosen id.
fn is_duplicate_id(err: &google_calendar3::Error) -> bool {
    match err {
        google_calendar3::Error::BadRequest(body) => body
            .pointer("/error/code")
            .and_then(|code| code.as_u64())
            == Some(409),
        google_calendar3::Error::Failure(response) => response.status().as_u16() == 409,
        _ => false,
    }
}

const CANCELLED: &str = "cancelled";

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    // serializes the read-then-restore of cancelled events
    restore_lock: Mutex<()>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self {
            calendar_hub,
            restore_lock: Mutex::new(()),
        }
    }

    /// Called after an insert was refused because `event.id` exists.
    ///
    /// Google keeps the ids of deleted events. If the holder of the id is
    /// cancelled, it is overwritten with `event` and confirmed again; a live
    /// holder means the slot is taken.
    async fn restore_cancelled(
        &self,
        calendar_id: &str,
        event: Event,
    ) -> Result<Event, GcalServiceError> {
        let event_id = event.id.clone().ok_or(GcalServiceError::Conflict)?;
        let _guard = self.restore_lock.lock().await;

        let (_, existing) = self
            .calendar_hub
            .events()
            .get(calendar_id, &event_id)
            .doit()
            .await?;
        if existing.status.as_deref() != Some(CANCELLED) {
            return Err(GcalServiceError::Conflict);
        }

        let restored = Event {
            status: Some("confirmed".to_string()),
            ..event
        };
        let (_, updated) = self
            .calendar_hub
            .events()
            .update(restored, calendar_id, &event_id)
            .doit()
            .await?;
        info!("Restored cancelled event {} in {}", event_id, calendar_id);
        Ok(updated)
    }
}

fn to_booked_event(event: Event) -> BookedEvent {
    let private_properties = event
        .extended_properties
        .and_then(|props| props.private)
        .map(|private| private.into_iter().collect::<BTreeMap<_, _>>())
        .unwrap_or_default();

    BookedEvent {
        event_id: event.id.unwrap_or_default(),
        summary: event.summary.unwrap_or_default(),
        description: event.description,
        // all-day events only carry `date`, never a slot start
        start_time: event.start.and_then(|start| start.date_time),
        end_time: event.end.and_then(|end| end.date_time),
        status: event.status.unwrap_or_else(|| "confirmed".to_string()),
        private_properties,
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Lists the events overlapping `[start_time, end_time)`, following
    /// `nextPageToken` until the window is exhausted.
    ///
    /// Recurring events are expanded into single instances and results are
    /// ordered by start time. Deleted events are not returned.
    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut booked_events = Vec::new();
            let mut page_token: Option<String> = None;

            loop {
                let mut request = calendar_hub
                    .events()
                    .list(&calendar_id)
                    .time_min(start_time)
                    .time_max(end_time)
                    .single_events(true)
                    .order_by("startTime")
                    .max_results(PAGE_SIZE);
                if let Some(token) = page_token.as_deref() {
                    request = request.page_token(token);
                }

                let (_, events_list) = request.doit().await?;

                booked_events.extend(
                    events_list
                        .items
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|event| event.status.as_deref() != Some(CANCELLED))
                        .map(to_booked_event),
                );

                match events_list.next_page_token {
                    Some(token) if !token.is_empty() => page_token = Some(token),
                    _ => break,
                }
            }

            debug!(
                "Listed {} events in {} between {} and {}",
                booked_events.len(),
                calendar_id,
                start_time,
                end_time
            );
            Ok(booked_events)
        })
    }

    /// Inserts the event. With a client-chosen id, a second insert for the
    /// same id is rejected by Google and reported as `Conflict`, unless the
    /// event holding the id was cancelled; that one is brought back.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            if event.end_time <= event.start_time {
                return Err(GcalServiceError::CalculationError(
                    "End time must be after start time".to_string(),
                ));
            }

            let extended_properties = (!event.private_properties.is_empty()).then(|| {
                EventExtendedProperties {
                    private: Some(event.private_properties.into_iter().collect::<HashMap<_, _>>()),
                    shared: None,
                }
            });

            let new_event = Event {
                id: event.event_id,
                summary: Some(event.summary),
                description: event.description,
                start: Some(EventDateTime {
                    date_time: Some(event.start_time),
                    time_zone: Some(event.time_zone.clone()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(event.end_time),
                    time_zone: Some(event.time_zone),
                    ..Default::default()
                }),
                extended_properties,
                ..Default::default()
            };

            let created_event = match self
                .calendar_hub
                .events()
                .insert(new_event.clone(), &calendar_id)
                .doit()
                .await
            {
                Ok((_response, created_event)) => created_event,
                Err(e) if is_duplicate_id(&e) => {
                    debug!("Event id already present in {}: {}", calendar_id, e);
                    self.restore_cancelled(&calendar_id, new_event)
                        .await
                        .inspect_err(|err| {
                            if matches!(err, GcalServiceError::Conflict) {
                                warn!("Event id already taken in {}", calendar_id);
                            }
                        })?
                }
                Err(e) => return Err(e.into()),
            };

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event.status.unwrap_or_else(|| "confirmed".to_string()),
                html_link: created_event.html_link,
            })
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duplicate_id_is_detected_from_error_body() {
        let err = google_calendar3::Error::BadRequest(json!({
            "error": {
                "code": 409,
                "message": "The requested identifier already exists.",
                "errors": [{ "domain": "global", "reason": "duplicate" }]
            }
        }));
        assert!(is_duplicate_id(&err));
    }

    #[test]
    fn test_other_bad_requests_are_not_conflicts() {
        let err = google_calendar3::Error::BadRequest(json!({
            "error": { "code": 400, "message": "Invalid resource id value." }
        }));
        assert!(!is_duplicate_id(&err));
        assert!(!is_duplicate_id(&google_calendar3::Error::MissingAPIKey));
    }

    #[test]
    fn test_to_booked_event_reads_private_properties() {
        let start = "2026-10-19T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let event = Event {
            id: Some("abc".to_string()),
            summary: Some("Corte de cabelo: Degradê".to_string()),
            start: Some(EventDateTime {
                date_time: Some(start),
                ..Default::default()
            }),
            extended_properties: Some(EventExtendedProperties {
                private: Some(HashMap::from([(
                    "hairdresser".to_string(),
                    "julio".to_string(),
                )])),
                shared: None,
            }),
            ..Default::default()
        };

        let booked = to_booked_event(event);
        assert_eq!(booked.event_id, "abc");
        assert_eq!(booked.start_time, Some(start));
        assert_eq!(booked.end_time, None);
        assert_eq!(booked.status, "confirmed");
        assert_eq!(
            booked.private_properties.get("hairdresser").map(String::as_str),
            Some("julio")
        );
    }
}
