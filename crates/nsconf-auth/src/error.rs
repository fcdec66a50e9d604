//! Authentication error classification.

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Message fragments that indicate the identity provider could not be reached.
const UNAVAILABLE_MARKERS: [&str; 3] = ["Failed to fetch", "Network request failed", "ECONNREFUSED"];

/// Errors surfaced by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authentication service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("authentication error: {0}")]
    Other(String),
}

/// The only recovery offered for an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Reload the whole application.
    Reload,
}

impl AuthError {
    /// Classify a raw provider error message.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if UNAVAILABLE_MARKERS.iter().any(|m| message.contains(m)) {
            AuthError::ServiceUnavailable(message)
        } else {
            AuthError::Other(message)
        }
    }

    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }

    pub fn title(&self) -> &'static str {
        match self {
            AuthError::ServiceUnavailable(_) => "Authentication Service Unavailable",
            AuthError::Other(_) => "Authentication Error",
        }
    }

    /// Text shown to the user. Raw messages are only shown for generic errors.
    pub fn user_message(&self) -> &str {
        match self {
            AuthError::ServiceUnavailable(_) => {
                "Unable to connect to the authentication service. Please check your connection and try again."
            }
            AuthError::Other(message) => message,
        }
    }

    /// Extra hint shown under the retry action.
    pub fn hint(&self) -> Option<&'static str> {
        self.is_service_unavailable()
            .then_some("If the problem persists, please contact support.")
    }

    pub fn recovery(&self) -> Recovery {
        Recovery::Reload
    }
}
