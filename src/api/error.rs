//! Client-side error taxonomy for backend calls.
//!
//! Every failure is surfaced exactly once at the call site; there is no
//! retry or backoff. The backend reports domain failures through a JSON
//! envelope with a `message` field, which is extracted here so commands can
//! show it verbatim.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by [`ApiClient`](crate::api::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or protocol failure before a usable response was obtained.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the request; `message` comes from its error
    /// envelope when one is present.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Missing, invalid, or expired credentials.
    #[error("authentication required; please log in")]
    Unauthorized,

    /// The response body could not be turned into usable data.
    #[error("the server returned an unreadable response")]
    MalformedResponse,

    /// An operation that needs a session was attempted without one.
    #[error("no active session; please log in")]
    NoSession,

    /// The supplied token cannot be placed in an Authorization header.
    #[error("stored token is not a valid header value")]
    InvalidToken,
}

/// Error envelope shapes the backend is known to produce.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Pull a human-readable message out of an error response body.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message.or(envelope.error))
        .filter(|message| !message.is_empty())
}

impl ClientError {
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> ClientError {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized;
        }
        let message = extract_message(body)
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_is_extracted() {
        assert_eq!(
            extract_message(r#"{"message":"already cancelled"}"#).as_deref(),
            Some("already cancelled")
        );
    }

    #[test]
    fn error_field_is_a_fallback() {
        assert_eq!(
            extract_message(r#"{"error":"booking not found"}"#).as_deref(),
            Some("booking not found")
        );
    }

    #[test]
    fn unusable_bodies_yield_nothing() {
        assert_eq!(extract_message("<html>502</html>"), None);
        assert_eq!(extract_message(r#"{"message":""}"#), None);
    }

    #[test]
    fn error_display_carries_the_backend_message() {
        let err = ClientError::from_response(
            reqwest::StatusCode::CONFLICT,
            r#"{"message":"already cancelled"}"#,
        );
        assert!(err.to_string().contains("already cancelled"));
    }

    #[test]
    fn status_401_maps_to_unauthorized() {
        let err = ClientError::from_response(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[test]
    fn missing_envelope_falls_back_to_a_generic_message() {
        let err = ClientError::from_response(reqwest::StatusCode::BAD_GATEWAY, "oops");
        assert_eq!(err.to_string(), "request failed with status 502");
    }
}
