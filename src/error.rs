use thiserror::Error;

/// Unified error type for the gateway client.
///
/// Only configuration and validation problems are ever returned from the
/// public entry points; call-local failures (transport, non-2xx status, the
/// in-band error sentinel) are surfaced through [`crate::CallState`] and the
/// optional error callback instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    /// Non-2xx response from the gateway. The body is not read.
    #[error("Gateway request failed: {status}")]
    Remote { status: reqwest::StatusCode },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }
}
