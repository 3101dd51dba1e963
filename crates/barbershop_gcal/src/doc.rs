// File: crates/barbershop_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AvailableSlotsResponse, BookingRequest, BookingResponse, HairdresserInfo, SlotsQuery,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::create_booking_handler,
        crate::handlers::available_slots_handler,
        crate::handlers::hairdressers_handler
    ),
    components(
        schemas(
            BookingRequest,
            BookingResponse,
            SlotsQuery,
            AvailableSlotsResponse,
            HairdresserInfo
        )
    ),
    tags(
        (name = "Bookings", description = "Barbershop availability and booking API")
    )
)]
pub struct GcalApiDoc;
