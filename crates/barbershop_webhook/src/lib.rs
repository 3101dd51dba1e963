//! Booking notifications over a plain JSON webhook.
//!
//! The receiving side (an automation tool, a spreadsheet, a chat bot) is
//! outside this repository; all it sees is a `POST` of a
//! [`BookingNotice`](barbershop_common::services::BookingNotice).

pub mod service;

pub use service::{WebhookError, WebhookNotifier};
