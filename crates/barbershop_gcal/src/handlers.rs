// File: crates/barbershop_gcal/src/handlers.rs
use crate::logic::{
    book_appointment, booking_notice, get_available_slots, parse_date, resolve_hairdresser,
    AvailableSlotsResponse, BookingError, BookingRequest, BookingResponse, BookingSettings,
    HairdresserInfo, SlotsQuery,
};
use crate::service::GcalServiceError;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    response::Json,
};
use barbershop_common::error::BarbershopError;
use barbershop_common::logging::log_result;
use barbershop_common::services::{BoxedError, CalendarService, NotificationService};
use barbershop_config::AppConfig;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Source tag put on webhook payloads when `webhook.source` is not configured.
const DEFAULT_NOTICE_SOURCE: &str = "barbershop-backend";

pub type SharedCalendar = Arc<dyn CalendarService<Error = GcalServiceError>>;
pub type SharedNotifier = Arc<dyn NotificationService<Error = BoxedError>>;

// Define shared state needed by GCal handlers
#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    /// `None` when the calendar feature is switched off.
    pub calendar: Option<SharedCalendar>,
    pub notifier: Option<SharedNotifier>,
}

impl GcalState {
    fn booking_backend(&self) -> Result<(&SharedCalendar, BookingSettings), BarbershopError> {
        let calendar = self.calendar.as_ref().ok_or_else(|| {
            BarbershopError::ServiceUnavailable("Google Calendar is disabled".to_string())
        })?;
        let settings = BookingSettings::from_config(&self.config)?;
        Ok((calendar, settings))
    }

    fn notice_source(&self) -> &str {
        self.config
            .webhook
            .as_ref()
            .and_then(|webhook| webhook.source.as_deref())
            .unwrap_or(DEFAULT_NOTICE_SOURCE)
    }
}

/// Handler to create a booking.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/criar-agendamento",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Event created", body = BookingResponse),
        (status = 400, description = "Missing field, malformed body, invalid date or time, unknown hairdresser"),
        (status = 409, description = "Slot no longer available"),
        (status = 502, description = "Google Calendar request failed"),
        (status = 503, description = "Google Calendar is disabled")
    ),
    tag = "Bookings"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<GcalState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, BarbershopError> {
    let Json(request) =
        payload.map_err(|rejection| BookingError::MalformedBody(rejection.body_text()))?;
    let (calendar, settings) = state.booking_backend()?;

    info!(
        "Booking request for {} on {} at {}",
        request.hairdresser, request.date, request.time
    );

    let outcome = book_appointment(&**calendar, &settings, &request, Utc::now())
        .await
        .inspect_err(|e| warn!("Booking rejected: {}", e))?;

    if let Some(notifier) = state.notifier.clone() {
        let notice = booking_notice(&request, &outcome, state.notice_source(), Utc::now());
        tokio::spawn(async move {
            let _ = log_result(
                notifier.send_booking_notice(&notice).await,
                "Booking webhook delivered",
                "Booking webhook failed",
            );
        });
    }

    Ok(Json(outcome.response))
}

/// Handler to list the free slots of a hairdresser on a date.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/horarios-disponiveis",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Free slots in catalog order", body = AvailableSlotsResponse),
        (status = 400, description = "Missing parameter, malformed date, unknown hairdresser or closed date"),
        (status = 502, description = "Google Calendar request failed"),
        (status = 503, description = "Google Calendar is disabled")
    ),
    tag = "Bookings"
))]
pub async fn available_slots_handler(
    State(state): State<Arc<GcalState>>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<AvailableSlotsResponse>, BarbershopError> {
    let Query(query) =
        query.map_err(|rejection| BookingError::MalformedBody(rejection.body_text()))?;

    let mut missing = Vec::new();
    let hairdresser = query.hairdresser.as_deref().map(str::trim).unwrap_or_default();
    if hairdresser.is_empty() {
        missing.push("hairdresser");
    }
    let date = query.date.as_deref().map(str::trim).unwrap_or_default();
    if date.is_empty() {
        missing.push("date");
    }
    if !missing.is_empty() {
        return Err(BookingError::MissingFields(missing).into());
    }

    let date = parse_date(date)?;
    let (calendar, settings) = state.booking_backend()?;
    let hairdresser = resolve_hairdresser(&settings.hairdressers, hairdresser)?;

    let slots =
        get_available_slots(&**calendar, &settings, hairdresser, date, Utc::now()).await?;
    info!(
        "{} free slots for {} on {}",
        slots.len(),
        hairdresser.id,
        date
    );

    Ok(Json(AvailableSlotsResponse {
        hairdresser: hairdresser.id.clone(),
        date: date.format("%Y-%m-%d").to_string(),
        slots,
    }))
}

/// Handler to list the configured hairdressers.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/hairdressers",
    responses(
        (status = 200, description = "Configured hairdressers", body = [HairdresserInfo])
    ),
    tag = "Bookings"
))]
pub async fn hairdressers_handler(State(state): State<Arc<GcalState>>) -> Json<Vec<HairdresserInfo>> {
    Json(
        state
            .config
            .booking
            .hairdressers
            .iter()
            .map(HairdresserInfo::from)
            .collect(),
    )
}
