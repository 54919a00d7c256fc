//! # Client Error Types
//!
//! Every failure the storefront can hit at the network/storage boundary.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Transport    │  │      HTTP       │  │       Input             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Http{status}   │  │  Validation             │ │
//! │  │  Decode         │  │  NotFound       │  │  Core                   │ │
//! │  │                 │  │  Unauthorized   │  │  Forbidden (local)      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  Configuration  │   Storefront turns every variant into a           │
//! │  │                 │   Notice; nothing propagates to the UI as a       │
//! │  │  InvalidConfig  │   crash.                                          │
//! │  │  ConfigLoad/Save│                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use kawuz_core::error::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("Network failure: {0}")]
    Network(String),

    /// A response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    // =========================================================================
    // HTTP Errors
    // =========================================================================
    /// Non-2xx response. `message` is the server's own text when it sent one.
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    /// 404 on a single-resource call.
    #[error("{0}")]
    NotFound(String),

    /// 401/403 without a server message.
    #[error("Not authorized")]
    Unauthorized,

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Client-side validation failed; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Domain parsing error (amounts, ids).
    #[error("{0}")]
    Core(CoreError),

    /// The current session may not perform this operation.
    #[error("{0}")]
    Forbidden(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read a config or theme file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write a config or theme file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ClientError::Validation(v),
            other => ClientError::Core(other),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidConfig(format!("invalid URL: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Builds the error for a non-2xx status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 if message.trim().is_empty() => ClientError::Unauthorized,
            404 => ClientError::NotFound(if message.is_empty() {
                "Not found".to_string()
            } else {
                message
            }),
            _ => ClientError::Http { status, message },
        }
    }

    /// True for failures that happened before any HTTP response.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// True when the server says the caller is not logged in.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized | ClientError::Http { status: 401 | 403, .. }
        )
    }

    /// True when nothing was sent because local checks failed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::Core(_) | ClientError::Forbidden(_)
        )
    }

    /// Text for the inline notice.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Http { status, .. } => format!("Request failed (HTTP {})", status),
            ClientError::Network(_) => "Cannot reach the store server".to_string(),
            ClientError::Unauthorized => "Please log in".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(ClientError::from_status(401, "").is_unauthorized());
        assert!(ClientError::from_status(403, "nope").is_unauthorized());
        assert!(matches!(
            ClientError::from_status(404, "Product not found"),
            ClientError::NotFound(ref m) if m == "Product not found"
        ));
        assert!(matches!(
            ClientError::from_status(400, "Insufficient stock"),
            ClientError::Http { status: 400, .. }
        ));
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::from_status(400, "Login zajęty!");
        assert_eq!(err.user_message(), "Login zajęty!");

        let bare = ClientError::from_status(500, "  ");
        assert_eq!(bare.user_message(), "Request failed (HTTP 500)");
    }

    #[test]
    fn test_validation_conversion() {
        let core = CoreError::Validation(ValidationError::Required {
            field: "name".into(),
        });
        let err: ClientError = core.into();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "name is required");
    }
}
