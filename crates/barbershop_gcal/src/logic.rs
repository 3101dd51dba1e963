// --- File: crates/barbershop_gcal/src/logic.rs ---
use crate::catalog::{free_slots, parse_slot, slot_duration, slot_label};
use crate::service::GcalServiceError;
use crate::validation::{check_date, check_slot, is_upcoming, DateRejection};
use barbershop_common::error::BarbershopError;
use barbershop_common::services::{BookedEvent, BookingNotice, CalendarEvent, CalendarService};
use barbershop_config::{AppConfig, HairdresserConfig};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Private extended property holding the hairdresser id on events we create.
pub const HAIRDRESSER_PROPERTY: &str = "hairdresser";

/// Description line naming the hairdresser, used for events without the property.
const HAIRDRESSER_LINE_PREFIX: &str = "Cabeleireiro:";

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Campos obrigatórios em falta: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Pedido inválido: {0}")]
    MalformedBody(String),
    #[error("Data inválida: {0}. Use o formato AAAA-MM-DD.")]
    InvalidDate(String),
    #[error(transparent)]
    Rejected(#[from] DateRejection),
    #[error("Hora inválida: {0}")]
    InvalidTime(String),
    #[error("Cabeleireiro desconhecido: {0}")]
    UnknownHairdresser(String),
    #[error("Esse horário já não está disponível. Escolha outro.")]
    SlotUnavailable,
    #[error("Calendar service error: {0}")]
    Calendar(GcalServiceError),
    #[error("Invalid booking configuration: {0}")]
    Config(String),
}

impl From<GcalServiceError> for BookingError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::Conflict => BookingError::SlotUnavailable,
            other => BookingError::Calendar(other),
        }
    }
}

impl From<BookingError> for BarbershopError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MalformedBody(_) => BarbershopError::ParseError(err.to_string()),
            BookingError::MissingFields(_)
            | BookingError::InvalidDate(_)
            | BookingError::Rejected(_)
            | BookingError::InvalidTime(_)
            | BookingError::UnknownHairdresser(_) => {
                BarbershopError::ValidationError(err.to_string())
            }
            BookingError::SlotUnavailable => BarbershopError::ConflictError(err.to_string()),
            BookingError::Calendar(e) => BarbershopError::ExternalServiceError {
                service_name: "Google Calendar".to_string(),
                message: e.to_string(),
            },
            BookingError::Config(msg) => BarbershopError::ConfigError(msg),
        }
    }
}

// --- Data Structures ---

/// Body of a booking request. Every field except `extras` is required; absent
/// fields deserialize to empty strings so they can be reported together.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Rui"))]
    pub first_name: String,
    #[cfg_attr(feature = "openapi", schema(example = "Silva"))]
    pub last_name: String,
    #[cfg_attr(feature = "openapi", schema(example = "rui@example.com"))]
    pub email: String,
    #[cfg_attr(feature = "openapi", schema(example = "+351912345678"))]
    pub phone_number: String,
    #[cfg_attr(feature = "openapi", schema(example = "Degradê"))]
    pub haircut_type: String,
    /// Hairdresser id or display name
    #[cfg_attr(feature = "openapi", schema(example = "julio"))]
    pub hairdresser: String,
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2026-10-19"))]
    pub date: String,
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub time: String,
    pub extras: Option<String>,
}

impl BookingRequest {
    /// Names of the required fields that are empty or blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phoneNumber", &self.phone_number),
            ("haircutType", &self.haircut_type),
            ("hairdresser", &self.hairdresser),
            ("date", &self.date),
            ("time", &self.time),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn extras(&self) -> Option<&str> {
        self.extras
            .as_deref()
            .map(str::trim)
            .filter(|extras| !extras.is_empty())
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotsQuery {
    /// Hairdresser id or display name
    #[cfg_attr(feature = "openapi", schema(example = "julio"))]
    pub hairdresser: Option<String>,

    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2026-10-19"))]
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailableSlotsResponse {
    /// Hairdresser id
    pub hairdresser: String,
    pub date: String,
    #[cfg_attr(feature = "openapi", schema(example = json!(["09:00", "11:00"])))]
    pub slots: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub message: String,
    pub event_id: Option<String>,
    /// Link to the event in Google Calendar
    pub link: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HairdresserInfo {
    pub id: String,
    pub name: String,
}

impl From<&HairdresserConfig> for HairdresserInfo {
    fn from(config: &HairdresserConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
        }
    }
}

/// What a successful booking produced.
#[derive(Debug)]
pub struct BookingOutcome {
    pub response: BookingResponse,
    pub hairdresser: HairdresserConfig,
}

// --- Settings ---

/// Booking rules and calendar coordinates resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub calendar_id: String,
    pub time_zone: Tz,
    pub horizon_days: i64,
    pub hairdressers: Vec<HairdresserConfig>,
}

impl BookingSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, BookingError> {
        let gcal = config
            .gcal
            .as_ref()
            .ok_or_else(|| BookingError::Config("missing gcal section".to_string()))?;
        let calendar_id = gcal
            .calendar_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| BookingError::Config("missing gcal.calendar_id".to_string()))?;
        let time_zone = gcal.time_zone_name().parse::<Tz>().map_err(|e| {
            BookingError::Config(format!("unknown time zone {}: {}", gcal.time_zone_name(), e))
        })?;

        Ok(Self {
            calendar_id,
            time_zone,
            horizon_days: config.booking.horizon_days,
            hairdressers: config.booking.hairdressers.clone(),
        })
    }

    /// The shop's wall clock at `now`.
    pub fn local_now(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.time_zone).naive_local()
    }

    /// Converts a local wall-clock time to UTC. Times skipped by a DST change
    /// do not exist and are rejected.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.time_zone
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// `[date 00:00, date+1 00:00)` in the shop's zone, as UTC instants.
    pub fn day_window(&self, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), BookingError> {
        let next_day = date
            .succ_opt()
            .ok_or_else(|| BookingError::InvalidDate(date.to_string()))?;
        let start = date.and_hms_opt(0, 0, 0).and_then(|d| self.to_utc(d));
        let end = next_day.and_hms_opt(0, 0, 0).and_then(|d| self.to_utc(d));
        match (start, end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(BookingError::InvalidDate(date.to_string())),
        }
    }
}

// --- Hairdressers ---

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Whether `value` names `hairdresser`, by id or display name, ignoring case.
pub fn hairdresser_matches(hairdresser: &HairdresserConfig, value: &str) -> bool {
    same_name(&hairdresser.id, value) || same_name(&hairdresser.name, value)
}

pub fn resolve_hairdresser<'a>(
    hairdressers: &'a [HairdresserConfig],
    value: &str,
) -> Result<&'a HairdresserConfig, BookingError> {
    hairdressers
        .iter()
        .find(|h| hairdresser_matches(h, value))
        .ok_or_else(|| BookingError::UnknownHairdresser(value.trim().to_string()))
}

/// Whether `event` is an appointment with `hairdresser`.
///
/// Events we created carry the hairdresser id as a private property. Older or
/// hand-made events are matched on the whole `Cabeleireiro:` description line.
pub fn event_belongs_to(event: &BookedEvent, hairdresser: &HairdresserConfig) -> bool {
    if let Some(id) = event.private_properties.get(HAIRDRESSER_PROPERTY) {
        return same_name(id, &hairdresser.id);
    }

    event
        .description
        .as_deref()
        .unwrap_or_default()
        .lines()
        .filter_map(|line| line.trim().strip_prefix(HAIRDRESSER_LINE_PREFIX))
        .any(|value| hairdresser_matches(hairdresser, value))
}

// --- Availability Logic ---

/// Occupied slot labels of `hairdresser` on `date`, from the day's events.
fn occupied_slots(
    events: &[BookedEvent],
    hairdresser: &HairdresserConfig,
    date: NaiveDate,
    time_zone: Tz,
) -> HashSet<String> {
    events
        .iter()
        .filter(|event| event.status != "cancelled")
        .filter(|event| event_belongs_to(event, hairdresser))
        .filter_map(|event| event.start_time)
        .map(|start| start.with_timezone(&time_zone).naive_local())
        .filter(|start| start.date() == date)
        .map(|start| slot_label(start.time()))
        .collect()
}

/// Free catalog slots of `hairdresser` on `date`.
///
/// The date must pass the date rules. For today, slots that already started
/// are left out.
pub async fn get_available_slots<C>(
    calendar: &C,
    settings: &BookingSettings,
    hairdresser: &HairdresserConfig,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Vec<String>, BookingError>
where
    C: CalendarService<Error = GcalServiceError> + ?Sized,
{
    let local_now = settings.local_now(now);
    check_date(date, local_now.date(), settings.horizon_days)?;

    let (start, end) = settings.day_window(date)?;
    let events = calendar
        .list_events(&settings.calendar_id, start, end)
        .await?;
    let occupied = occupied_slots(&events, hairdresser, date, settings.time_zone);
    debug!(
        "{} of {} events on {} occupy slots of {}",
        occupied.len(),
        events.len(),
        date,
        hairdresser.id
    );

    Ok(free_slots(&occupied)
        .into_iter()
        .filter_map(|label| parse_slot(label).map(|time| (label, time)))
        .filter(|(_, time)| is_upcoming(date, *time, local_now))
        .map(|(label, _)| label.to_string())
        .collect())
}

/// True iff no event of `hairdresser` overlaps the hour starting at `start`.
pub async fn is_available<C>(
    calendar: &C,
    settings: &BookingSettings,
    hairdresser: &HairdresserConfig,
    start: DateTime<Utc>,
) -> Result<bool, BookingError>
where
    C: CalendarService<Error = GcalServiceError> + ?Sized,
{
    let end = start + slot_duration();
    let events = calendar
        .list_events(&settings.calendar_id, start, end)
        .await?;
    Ok(!events
        .iter()
        .filter(|event| event.status != "cancelled")
        .any(|event| event_belongs_to(event, hairdresser)))
}

// --- Booking Logic ---

/// Event id reserving one slot of one hairdresser. Only `0-9a-f`, which the
/// Calendar API accepts as a client-chosen id.
pub fn reservation_id(hairdresser_id: &str, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "{}{}{}",
        hex::encode(hairdresser_id.as_bytes()),
        date.format("%Y%m%d"),
        time.format("%H%M")
    )
}

pub fn event_description(request: &BookingRequest, hairdresser: &HairdresserConfig) -> String {
    let mut description = format!(
        "Cliente: {} {}\nEmail: {}\nTelefone: {}\n{} {}",
        request.first_name.trim(),
        request.last_name.trim(),
        request.email.trim(),
        request.phone_number.trim(),
        HAIRDRESSER_LINE_PREFIX,
        hairdresser.name
    );
    if let Some(extras) = request.extras() {
        description.push_str(&format!("\nExtras: {extras}"));
    }
    description
}

/// Builds the calendar event for a validated booking.
pub fn build_calendar_event(
    request: &BookingRequest,
    hairdresser: &HairdresserConfig,
    date: NaiveDate,
    time: NaiveTime,
    settings: &BookingSettings,
) -> Result<CalendarEvent, BookingError> {
    let start_time = settings
        .to_utc(date.and_time(time))
        .ok_or_else(|| BookingError::InvalidTime(slot_label(time)))?;

    Ok(CalendarEvent {
        event_id: Some(reservation_id(&hairdresser.id, date, time)),
        start_time,
        end_time: start_time + slot_duration(),
        time_zone: settings.time_zone.name().to_string(),
        summary: format!("Corte de cabelo: {}", request.haircut_type.trim()),
        description: Some(event_description(request, hairdresser)),
        private_properties: BTreeMap::from([(
            HAIRDRESSER_PROPERTY.to_string(),
            hairdresser.id.clone(),
        )]),
    })
}

/// Validates `request` against the booking rules and the calendar, then
/// reserves the slot.
///
/// Rejections come back in this order: missing fields, malformed date,
/// time outside the catalog, unknown hairdresser, date rules, occupied slot.
/// Two concurrent requests for the same slot produce the same event id, so
/// the calendar accepts only one of them.
pub async fn book_appointment<C>(
    calendar: &C,
    settings: &BookingSettings,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<BookingOutcome, BookingError>
where
    C: CalendarService<Error = GcalServiceError> + ?Sized,
{
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(BookingError::MissingFields(missing));
    }

    let date = parse_date(&request.date)?;
    let hairdresser = resolve_hairdresser(&settings.hairdressers, &request.hairdresser)?;

    // a closed or out-of-range date is reported whatever time was asked for
    let local_now = settings.local_now(now);
    check_date(date, local_now.date(), settings.horizon_days)?;
    let time = parse_slot(&request.time)
        .ok_or_else(|| BookingError::InvalidTime(request.time.trim().to_string()))?;
    check_slot(date, time, local_now)?;

    let event = build_calendar_event(request, hairdresser, date, time, settings)?;
    if !is_available(calendar, settings, hairdresser, event.start_time).await? {
        info!(
            "Slot {} {} of {} is already taken",
            date,
            slot_label(time),
            hairdresser.id
        );
        return Err(BookingError::SlotUnavailable);
    }

    let result = calendar
        .create_event(&settings.calendar_id, event)
        .await
        .map_err(|e| {
            if matches!(e, GcalServiceError::Conflict) {
                warn!(
                    "Concurrent booking for {} on {} {} lost the race",
                    hairdresser.id,
                    date,
                    slot_label(time)
                );
            }
            BookingError::from(e)
        })?;

    info!(
        "Booked {} on {} {} (event {:?})",
        hairdresser.id,
        date,
        slot_label(time),
        result.event_id
    );

    Ok(BookingOutcome {
        response: BookingResponse {
            message: "Evento criado com sucesso!".to_string(),
            event_id: result.event_id,
            link: result.html_link,
        },
        hairdresser: hairdresser.clone(),
    })
}

/// Webhook payload for an accepted booking.
pub fn booking_notice(
    request: &BookingRequest,
    outcome: &BookingOutcome,
    source: &str,
    timestamp: DateTime<Utc>,
) -> BookingNotice {
    BookingNotice {
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        date: request.date.trim().to_string(),
        time: request.time.trim().to_string(),
        email: request.email.trim().to_string(),
        phone_number: request.phone_number.trim().to_string(),
        haircut_type: request.haircut_type.trim().to_string(),
        hairdresser: outcome.hairdresser.name.clone(),
        extras: request.extras().map(str::to_string),
        event_id: outcome.response.event_id.clone(),
        timestamp,
        source: source.to_string(),
    }
}

/// Parses a `YYYY-MM-DD` query or body value.
pub fn parse_date(value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDate(value.trim().to_string()))
}

