use thiserror::Error;

/// Failure of a single call through the HTTP client capability.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream answered but rejected the query (unknown city, bad
    /// credential). Carries the upstream's own message when it sent one.
    #[error("{}", .message.as_deref().unwrap_or("request rejected by the weather service"))]
    Api { message: Option<String> },

    /// The request never completed: connection, read, or payload decode.
    #[error("transport failure: {reason}")]
    Transport { reason: String },
}

/// A failure surfaced to the user by the session controller.
///
/// Message strings are stable; the UI shows the `Display` output directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please enter a city name.")]
    EmptyQuery,

    /// Upstream semantic rejection, verbatim when the upstream provided a
    /// message.
    #[error("{message}")]
    Api { message: String },

    #[error("Unable to fetch weather data. Please check your internet connection and try again.")]
    Offline,

    #[error("{reason}")]
    Geolocation { reason: String },
}

impl SessionError {
    /// Fallback text for an upstream rejection that carried no message.
    pub const NOT_FOUND: &'static str =
        "City not found. Please check the spelling and try again.";

    pub fn from_api_message(message: Option<String>) -> Self {
        SessionError::Api {
            message: message.unwrap_or_else(|| Self::NOT_FOUND.to_string()),
        }
    }
}
