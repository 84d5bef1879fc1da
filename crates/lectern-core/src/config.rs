// ── Runtime connection configuration ──
//
// Describes *how* to reach the admin API. Carries tokens and transport
// tuning but never touches disk; lectern-config builds one from a profile.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use lectern_api::{AuthHeaders, TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// Everything needed to build an admin API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://church.example/api/admin`.
    pub base_url: Url,
    /// Anti-forgery token echoed on every request.
    pub csrf_token: Option<SecretString>,
    /// Bearer token from a previous sign-in.
    pub session_token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            csrf_token: None,
            session_token: None,
            tls: TlsVerification::default(),
            timeout: None,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }

    pub(crate) fn auth_headers(&self) -> AuthHeaders {
        AuthHeaders::new(self.csrf_token.clone(), self.session_token.clone())
    }
}
