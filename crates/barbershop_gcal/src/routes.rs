// --- File: crates/barbershop_gcal/src/routes.rs ---

use crate::handlers::{
    available_slots_handler, create_booking_handler, hairdressers_handler, GcalState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all booking routes, including the paths the
/// original frontend calls.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/criar-agendamento", post(create_booking_handler))
        .route("/api/bookings", post(create_booking_handler))
        .route("/horarios-disponiveis", get(available_slots_handler))
        .route("/api/available-slots", get(available_slots_handler))
        .route("/api/hairdressers", get(hairdressers_handler))
        .with_state(state)
}
