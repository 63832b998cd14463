//! Error type shared by the table store, cache and controller.

use thiserror::Error;

use crate::store::Resource;

pub type Result<T> = std::result::Result<T, ClinicError>;

#[derive(Debug, Error)]
pub enum ClinicError {
    /// The request never produced a response (connect, timeout, TLS).
    #[cfg(feature = "http")]
    #[error("table store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The table store answered with a non-2xx status.
    #[error("table store returned {status} for {method} tables/{resource}")]
    Status {
        resource: Resource,
        method: &'static str,
        status: u16,
    },

    #[error("malformed {resource} payload: {source}")]
    Decode {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },

    #[error("{resource} record {id} not found")]
    NotFound { resource: Resource, id: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ClinicError {
    pub fn decode(resource: Resource, source: serde_json::Error) -> Self {
        ClinicError::Decode { resource, source }
    }

    pub fn not_found(resource: Resource, id: impl Into<String>) -> Self {
        ClinicError::NotFound {
            resource,
            id: id.into(),
        }
    }
}

#[cfg(feature = "http")]
impl actix_web::ResponseError for ClinicError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            ClinicError::NotFound { .. } => StatusCode::NOT_FOUND,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
