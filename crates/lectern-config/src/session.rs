// ── Persisted sign-in session ──
//
// The bearer token and signed-in user survive between CLI invocations in
// a small JSON file under the platform data directory.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ConfigError;

/// Who the current token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionUser {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionData {
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub auth_user: Option<SessionUser>,
}

impl SessionData {
    pub fn is_signed_in(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// File-backed session storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform data directory.
    pub fn default_location() -> Self {
        Self::new(crate::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session; a missing or corrupt file yields an empty one.
    pub fn load(&self) -> SessionData {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SessionData::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read session file");
                return SessionData::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
            SessionData::default()
        })
    }

    pub fn save(&self, data: &SessionData) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the session file. Clearing an absent session is not an error.
    pub fn clear(&self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn token(&self) -> Option<SecretString> {
        self.load()
            .auth_token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }
}
