use thiserror::Error;

/// Fallback message used when a failed response carries no readable
/// `{"message": ...}` body.
pub(crate) fn fallback_message(status: u16) -> String {
    format!("Request failed with status {status}")
}

/// Top-level error type for the `lectern-api` crate.
///
/// Separates failures where the server never answered ([`Error::Network`])
/// from failures where it answered with a non-2xx status ([`Error::Http`]).
/// `lectern-core` renders both through the same alert channel.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never produced a response (offline, DNS, refused, TLS).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// `message` comes from the JSON error body when one is present,
    /// otherwise a generic fallback.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// URL parsing or joining failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header value (CSRF or bearer token) is not representable.
    #[error("Invalid header value for {header}")]
    InvalidHeader { header: &'static str },

    /// TLS or client-construction failure.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body could not be decoded into the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A multipart payload could not be assembled.
    #[error("Invalid upload: {0}")]
    Upload(String),
}

impl Error {
    /// `true` when no HTTP response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `true` for 401/419 responses (expired session or CSRF token).
    pub fn is_auth_expired(&self) -> bool {
        matches!(self.status(), Some(401 | 419))
    }

    /// `true` for 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// `true` for 422 responses (server-side validation rejected the input).
    pub fn is_validation(&self) -> bool {
        self.status() == Some(422)
    }

    /// Message suitable for an alert banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            Self::Network(_) => "Unable to reach the server. Check your connection.".into(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_server_message() {
        let err = Error::Http {
            status: 422,
            message: "The title field is required.".into(),
        };
        assert_eq!(err.to_string(), "The title field is required.");
        assert!(err.is_validation());
        assert!(!err.is_network());
    }

    #[test]
    fn fallback_mentions_status() {
        assert_eq!(fallback_message(500), "Request failed with status 500");
    }

    #[test]
    fn csrf_mismatch_counts_as_expired_auth() {
        let err = Error::Http {
            status: 419,
            message: "CSRF token mismatch.".into(),
        };
        assert!(err.is_auth_expired());
    }
}
