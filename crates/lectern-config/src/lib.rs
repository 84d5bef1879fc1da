//! Shared configuration for the lectern front ends.
//!
//! TOML profiles, CSRF token resolution (env + keyring + plaintext),
//! session persistence, and translation to `lectern_core::ClientConfig`.

mod session;

pub use session::{SessionData, SessionStore, SessionUser};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lectern_core::{ClientConfig, TlsVerification};

/// Keyring service name for stored tokens.
pub const KEYRING_SERVICE: &str = "lectern";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("no API base URL configured; run `lectern config init` or pass --base-url")]
    MissingBaseUrl,

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("session file is unreadable: {0}")]
    Session(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use, honouring an explicit override.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds; 0 waits indefinitely.
    #[serde(default)]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: 0,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named API profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Admin API root (e.g., "https://church.example/api/admin").
    pub base_url: String,

    /// CSRF token (plaintext; prefer keyring or env var).
    pub csrf_token: Option<String>,

    /// Environment variable name containing the CSRF token.
    pub csrf_token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "lectern", "lectern")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("lectern");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the session file path (platform data directory).
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, layering defaults, the file, then `LECTERN_*` env.
///
/// Nested keys use a double underscore: `LECTERN_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LECTERN_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/csrf-token"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve the CSRF token: profile env var, then keyring, then plaintext.
///
/// A missing token is not an error; some deployments exempt the API.
pub fn resolve_csrf_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    if let Some(val) = profile
        .csrf_token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Some(SecretString::from(val));
    }

    if let Some(secret) = keyring_entry(profile_name)
        .ok()
        .and_then(|entry| entry.get_password().ok())
    {
        return Some(SecretString::from(secret));
    }

    profile.csrf_token.clone().map(SecretString::from)
}

/// Store a CSRF token in the system keyring.
pub fn store_csrf_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(token)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation to runtime config ───────────────────────────────────

/// Build a `ClientConfig` from a profile, with no CLI overrides applied.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    if profile.base_url.trim().is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = match profile.timeout.unwrap_or(defaults.timeout) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    Ok(ClientConfig {
        base_url,
        csrf_token: resolve_csrf_token(profile, profile_name),
        session_token: None,
        tls,
        timeout,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "main"

                [profiles.main]
                base_url = "https://church.example/api/admin"
                csrf_token = "plain"
                "#,
            )?;
            jail.set_env("LECTERN_DEFAULTS__TIMEOUT", "15");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.active_profile_name(None), "main");
            assert_eq!(cfg.active_profile_name(Some("other")), "other");
            assert_eq!(cfg.defaults.timeout, 15);
            assert_eq!(cfg.defaults.output, "table");
            let profile = cfg.profile("main").unwrap();
            assert_eq!(profile.csrf_token.as_deref(), Some("plain"));
            assert!(cfg.profile("missing").is_err());
            Ok(())
        });
    }

    #[test]
    fn csrf_env_var_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("CHURCH_CSRF", "from-env");
            let profile = Profile {
                base_url: "https://church.example/api/admin".into(),
                csrf_token: Some("plain".into()),
                csrf_token_env: Some("CHURCH_CSRF".into()),
                ..Profile::default()
            };
            let token = resolve_csrf_token(&profile, "jail-test").unwrap();
            assert_eq!(token.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn profile_translation() {
        let profile = Profile {
            base_url: "https://church.example/api/admin".into(),
            timeout: Some(20),
            insecure: Some(true),
            ..Profile::default()
        };
        let cfg = profile_to_client_config(&profile, "t", &Defaults::default()).unwrap();
        assert_eq!(cfg.timeout, Some(Duration::from_secs(20)));
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);

        let strict = Profile {
            base_url: "https://church.example/api/admin".into(),
            ..Profile::default()
        };
        let cfg = profile_to_client_config(&strict, "t", &Defaults::default()).unwrap();
        assert_eq!(cfg.timeout, None);
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn empty_base_url_rejected() {
        let err = profile_to_client_config(&Profile::default(), "t", &Defaults::default());
        assert!(matches!(err, Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                base_url: "http://localhost:8000/api/admin".into(),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(
            back.profile("default").unwrap().base_url,
            "http://localhost:8000/api/admin"
        );
    }
}
