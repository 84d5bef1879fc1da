//! Config subcommand handlers.

use dialoguer::{Input, Select};
use serde_json::Value;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the CSRF token.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for name in sorted_names(cfg) {
        let p = &cfg.profiles[&name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "base_url = \"{}\"", p.base_url);
        if p.csrf_token.is_some() {
            let _ = writeln!(out, "csrf_token = \"****\"");
        }
        if let Some(ref env) = p.csrf_token_env {
            let _ = writeln!(out, "csrf_token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Structured form of the config with plaintext tokens masked.
fn redacted_value(cfg: &Config) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(cfg)?;
    if let Some(Value::Object(profiles)) = value.get_mut("profiles") {
        for profile in profiles.values_mut() {
            if let Some(token @ Value::String(_)) = profile.get_mut("csrf_token") {
                *token = Value::String("****".into());
            }
        }
    }
    Ok(value)
}

fn sorted_names(cfg: &Config) -> Vec<String> {
    let mut names: Vec<String> = cfg.profiles.keys().cloned().collect();
    names.sort();
    names
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let available = sorted_names(cfg);
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, value: &str, hint: &str) -> Result<T, CliError> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::bad_argument(key, hint))
}

/// Offer to store the CSRF token in the system keyring.
///
/// Returns `Some(token)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_token_storage(token: &str, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the CSRF token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        lectern_config::store_csrf_token(profile_name, token)?;
        eprintln!("   ✓ CSRF token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token.to_owned()))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("lectern configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("Admin API URL")
                .default("https://church.example/api/admin".into())
                .validate_with(|input: &String| -> Result<(), String> {
                    url::Url::parse(input.trim())
                        .map(drop)
                        .map_err(|e| format!("not a URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            let token = rpassword::prompt_password("CSRF token (leave empty if not required): ")
                .map_err(prompt_err)?;
            let csrf_token = if token.trim().is_empty() {
                None
            } else {
                prompt_token_storage(token.trim(), &profile_name)?
            };

            let profile = Profile {
                base_url: base_url.trim().to_owned(),
                csrf_token,
                ..Profile::default()
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: lectern announcements list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let value = redacted_value(&cfg)?;
            let out = output::render_single(
                &global.output,
                &value,
                |_| format_config_redacted(&cfg),
                |_| config::config_path().display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "base_url" | "base-url" => {
                    url::Url::parse(value.trim())
                        .map_err(|e| CliError::bad_argument("base_url", format!("not a URL: {e}")))?;
                    profile.base_url = value.trim().to_owned();
                }
                "csrf_token_env" | "csrf-token-env" => profile.csrf_token_env = Some(value),
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "insecure" => {
                    profile.insecure = Some(parse_setting(
                        "insecure",
                        &value,
                        "must be 'true' or 'false'",
                    )?);
                }
                "timeout" => {
                    profile.timeout = Some(parse_setting(
                        "timeout",
                        &value,
                        "must be a number of seconds (0 waits indefinitely)",
                    )?);
                }
                other => {
                    return Err(CliError::bad_argument(
                        other,
                        format!(
                            "unknown config key '{other}'. Valid keys: base_url, \
                             csrf_token_env, ca_cert, insecure, timeout"
                        ),
                    ));
                }
            }

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: lectern config init");
            } else {
                for name in sorted_names(&cfg) {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetCsrf ─────────────────────────────────────────────────
        ConfigCommand::SetCsrf { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(&cfg, profile_name));
            }

            let token = rpassword::prompt_password("CSRF token: ").map_err(prompt_err)?;
            if token.trim().is_empty() {
                return Err(CliError::bad_argument("csrf_token", "value cannot be empty"));
            }
            lectern_config::store_csrf_token(&profile_name, token.trim())?;
            eprintln!("✓ CSRF token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "main".into(),
            Profile {
                base_url: "https://church.example/api/admin".into(),
                csrf_token: Some("plain-secret".into()),
                timeout: Some(20),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn show_masks_plaintext_token() {
        let cfg = sample();
        let text = format_config_redacted(&cfg);
        assert!(text.contains("[profiles.main]"));
        assert!(text.contains("timeout = 20"));
        assert!(!text.contains("plain-secret"));

        let value = redacted_value(&cfg).unwrap();
        assert_eq!(value["profiles"]["main"]["csrf_token"], "****");
    }

    #[test]
    fn unknown_profile_lists_known_ones() {
        let err = profile_not_found(&sample(), "staging".into());
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "staging");
                assert_eq!(available, "main");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
