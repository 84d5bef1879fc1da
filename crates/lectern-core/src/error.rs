// ── Core error types ──
//
// User-facing errors from lectern-core. Callers never match on transport
// details; `From<lectern_api::Error>` folds them into the variants below,
// keeping "server unreachable" apart from "server said no".

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    /// No response reached us.
    #[error("Unable to reach the server: {reason}")]
    Network { reason: String },

    /// The request was sent but no answer arrived within the timeout.
    #[error("Request timed out: {reason}")]
    Timeout { reason: String },

    /// The server answered with a failure status.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// 401/419: the session or CSRF token is no longer accepted.
    #[error("Session expired or not authorized: {message}")]
    Unauthorized { message: String },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Index {index} is out of range for {len} items")]
    InvalidIndex { index: usize, len: usize },

    #[error("Unexpected response shape: {message}")]
    Decode { message: String },

    // ── Operation ────────────────────────────────────────────────────
    #[error("{operation} is already in progress")]
    Busy { operation: String },

    #[error("Unsupported action '{action}' for {entity_type}")]
    UnsupportedAction {
        entity_type: String,
        action: String,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Text shown in an alert banner.
    ///
    /// Server failures surface the server's own message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => {
                "Unable to reach the server. Check your connection.".into()
            }
            Self::Request { message, .. } | Self::Unauthorized { message } => message.clone(),
            Self::Validation { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lectern_api::Error> for CoreError {
    fn from(err: lectern_api::Error) -> Self {
        match err {
            lectern_api::Error::Network(e) if e.is_timeout() => CoreError::Timeout {
                reason: e.to_string(),
            },
            lectern_api::Error::Network(e) => CoreError::Network {
                reason: e.to_string(),
            },
            lectern_api::Error::Http { status, message } if matches!(status, 401 | 419) => {
                CoreError::Unauthorized { message }
            }
            lectern_api::Error::Http { status, message } => CoreError::Request { status, message },
            lectern_api::Error::Deserialization { message, .. } => CoreError::Decode { message },
            lectern_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            lectern_api::Error::InvalidHeader { header } => CoreError::Config {
                message: format!("token for {header} contains invalid characters"),
            },
            lectern_api::Error::Tls(message) => CoreError::Config { message },
            lectern_api::Error::Upload(message) => CoreError::Validation { message },
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Internal(format!("JSON: {err}"))
    }
}
