// --- File: crates/barbershop_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all barbershop crates.
///
/// Crates keep their own domain errors and implement `From<DomainError>` for
/// `BarbershopError` at the HTTP boundary.
#[derive(Error, Debug)]
pub enum BarbershopError {
    /// Error occurred during an outbound HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The request body or a parameter could not be parsed
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request was understood but violates a booking rule
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An upstream API (calendar, webhook) failed
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The requested resource is already taken
    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    /// A feature is switched off in the runtime configuration
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Maps an error to the HTTP status code it is reported with.
pub trait HttpStatusCode {
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BarbershopError {
    fn status_code(&self) -> u16 {
        match self {
            BarbershopError::HttpError(_) => 500,
            BarbershopError::ParseError(_) => 400,
            BarbershopError::ConfigError(_) => 500,
            BarbershopError::ValidationError(_) => 400,
            BarbershopError::ExternalServiceError { .. } => 502,
            BarbershopError::ConflictError(_) => 409,
            BarbershopError::NotFoundError(_) => 404,
            BarbershopError::ServiceUnavailable(_) => 503,
            BarbershopError::InternalError(_) => 500,
        }
    }
}

/// Adds a context message to foreign errors, turning them into
/// [`BarbershopError::InternalError`].
pub trait Context<T, E> {
    fn context<C>(self, context: C) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static;

    fn with_context<C, F>(self, f: F) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| BarbershopError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| BarbershopError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<reqwest::Error> for BarbershopError {
    fn from(err: reqwest::Error) -> Self {
        BarbershopError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for BarbershopError {
    fn from(err: serde_json::Error) -> Self {
        BarbershopError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for BarbershopError {
    fn from(err: std::io::Error) -> Self {
        BarbershopError::InternalError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> BarbershopError {
    BarbershopError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
