//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

use crate::envelope::{Envelope, NETWORK_ERROR_MESSAGE};

/// Client error types
///
/// [`DepotClient::call`](super::DepotClient::call) folds every variant into a
/// failure [`Envelope`]; [`DepotClient::try_call`](super::DepotClient::try_call)
/// hands them back as is.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was obtained
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    Api { status: u16, message: String },

    /// Server returned 401
    #[error("Authentication failed: {message}")]
    Unauthorized { message: String },

    /// Success status, but the body is not a JSON envelope
    #[error("Malformed response (status {status}): {source}")]
    MalformedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Request payload did not serialise to a JSON object
    #[error("Invalid request payload: {0}")]
    Payload(serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from an HTTP error status and its body
    ///
    /// The message is taken from a JSON `message` field when the body has
    /// one, otherwise it is synthesised from the status code.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| api_error_message(status.as_u16()));
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { message }
        } else {
            Self::Api {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// HTTP status associated with the error, if a response was received
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::MalformedResponse { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Network(_) | Self::Payload(_) | Self::Configuration(_) => None,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Api { message, .. } | Self::Unauthorized { message } => message.clone(),
            Self::MalformedResponse { status, .. } => {
                format!("Invalid response from server (status {status})")
            }
            Self::Payload(_) | Self::Configuration(_) => self.to_string(),
        }
    }

    /// Normalise into the failure envelope callers expect
    pub fn into_envelope(self) -> Envelope {
        Envelope::failure(self.user_message())
    }
}

/// Fallback message for error statuses without a usable body
pub fn api_error_message(status: u16) -> String {
    format!("API Error: Status {status}")
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
