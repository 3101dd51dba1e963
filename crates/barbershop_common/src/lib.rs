// --- File: crates/barbershop_common/src/lib.rs ---

pub mod error; // Error handling
pub mod features; // Runtime feature switches
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod routes; // Shared routes
pub mod services; // Service abstractions

pub use routes::{not_found_handler, routes};

pub use error::{
    config_error, conflict, external_service_error, not_found, validation_error,
    BarbershopError, Context, HttpStatusCode,
};

pub use http::{client::HTTP_CLIENT, IntoHttpResponse};

pub use features::{is_feature_enabled, is_gcal_enabled, is_webhook_enabled};
