//! CLI configuration: thin wrapper around `lectern_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --csrf-token, --insecure, --timeout).

use secrecy::SecretString;
use tracing::debug;

use lectern_core::{Backoffice, ClientConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use lectern_config::{
    Config, Profile, SessionStore, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Translate the active profile + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values. Without a
/// matching profile, `--base-url` alone is enough.
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        // An explicitly requested profile must exist
        None if global.profile.is_some() && global.base_url.is_none() => {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }

    let mut client =
        lectern_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults)?;
    if let Some(ref token) = global.csrf_token {
        client.csrf_token = Some(SecretString::from(token.clone()));
    }

    debug!(profile = %profile_name, base_url = %client.base_url, "resolved client config");
    Ok(client)
}

/// Build the back-office handle, restoring any stored session token.
pub fn connect(global: &GlobalOpts) -> Result<Backoffice, CliError> {
    let cfg = load_config_or_default();
    let mut client = resolve_client_config(global, &cfg)?;
    client.session_token = SessionStore::default_location().token();
    Ok(Backoffice::new(client)?)
}
