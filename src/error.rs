//! Error types for the Bright Data SDK.

use thiserror::Error;

/// Result type for Bright Data operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Bright Data SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input was rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The API returned a non-success response or a body that could not be understood.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
        /// Raw response body
        body: String,
    },

    /// Network or HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provider answered successfully with a value the SDK refuses to use.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// A platform normalizer could not reshape fetched data.
    #[error("Normalization failed: {0}")]
    Normalization(String),
}

impl Error {
    /// Create an error from a non-success response.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::from_status(status, body)
    }

    pub(crate) fn from_status(status: u16, body: String) -> Self {
        // Bright Data answers with plain text on some endpoints and JSON on others
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|err| err.error.or(err.message))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.trim().to_string()
                }
            });

        match status {
            401 | 403 => Error::Authentication(message),
            _ => Error::Api {
                status,
                message,
                body,
            },
        }
    }

    /// Shorthand for an `Api` error raised on a response that arrived but made no sense.
    pub(crate) fn malformed(status: u16, message: impl Into<String>, body: String) -> Self {
        Error::Api {
            status,
            message: message.into(),
            body,
        }
    }

    /// True for the two error kinds a connectivity check reports as "not connected".
    pub fn is_auth_or_api(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::Api { .. })
    }
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_authentication() {
        let err = Error::from_status(401, r#"{"error":"Invalid token"}"#.into());
        match err {
            Error::Authentication(msg) => assert_eq!(msg, "Invalid token"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = Error::from_status(403, "forbidden".into());
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_server_error_keeps_status_and_body() {
        let err = Error::from_status(500, "upstream exploded".into());
        match &err {
            Error::Api {
                status,
                message,
                body,
            } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "upstream exploded");
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "API error (500): upstream exploded");
        assert!(err.is_auth_or_api());
    }

    #[test]
    fn test_empty_body_gets_placeholder_message() {
        let err = Error::from_status(502, String::new());
        assert_eq!(err.to_string(), "API error (502): Unknown error");
        assert!(!Error::Timeout.is_auth_or_api());
    }

    #[test]
    fn test_malformed_response_is_message_only() {
        let err = Error::MalformedResponse("snapshot id \"a/b\" is not usable".into());
        assert_eq!(
            err.to_string(),
            "Malformed provider response: snapshot id \"a/b\" is not usable"
        );
        assert!(!err.is_auth_or_api());
    }
}
