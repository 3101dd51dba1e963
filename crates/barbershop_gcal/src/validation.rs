// --- File: crates/barbershop_gcal/src/validation.rs ---
//! Booking date and time rules.
//!
//! All functions are pure; callers pass "now" already converted to the shop's
//! time zone. The date rules run before the slot rule and the first failing
//! rule wins.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

/// Why a requested date or slot cannot be booked. Messages are shown to
/// customers as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRejection {
    #[error("Não é possível agendar numa data passada.")]
    PastDate,
    #[error("A barbearia está fechada ao domingo. Escolha outro dia.")]
    Sunday,
    #[error("Só é possível agendar com até {horizon_days} dias de antecedência.")]
    BeyondHorizon { horizon_days: i64 },
    #[error("Esse horário já passou. Escolha uma hora mais tarde.")]
    PastSlot,
}

/// Date-only rules, shared by the slot listing and the booking endpoint.
///
/// A horizon that runs past the last representable date puts no upper bound
/// on the date; a negative horizon allows today only.
pub fn check_date(date: NaiveDate, today: NaiveDate, horizon_days: i64) -> Result<(), DateRejection> {
    if date < today {
        return Err(DateRejection::PastDate);
    }
    if date.weekday() == Weekday::Sun {
        return Err(DateRejection::Sunday);
    }
    let last_day = today.checked_add_days(Days::new(horizon_days.max(0) as u64));
    if last_day.is_some_and(|last_day| date > last_day) {
        return Err(DateRejection::BeyondHorizon { horizon_days });
    }
    Ok(())
}

/// No slot at or before the current time of day when booking for today.
pub fn check_slot(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> Result<(), DateRejection> {
    if date == now.date() && time <= now.time() {
        return Err(DateRejection::PastSlot);
    }
    Ok(())
}

/// Whether a slot starting at `time` on `date` is still ahead of `now`.
pub fn is_upcoming(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    date > now.date() || (date == now.date() && time > now.time())
}
