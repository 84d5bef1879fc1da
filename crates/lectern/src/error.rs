//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use lectern_config::ConfigError;
use lectern_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the admin API at {url}")]
    #[diagnostic(
        code(lectern::connection_failed),
        help(
            "Check that the site is running and the base URL is right.\n\
             Reason: {reason}\n\
             For local development servers try: --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out: {reason}")]
    #[diagnostic(
        code(lectern::timeout),
        help("Increase the limit with --timeout or check server responsiveness.")
    )]
    Timeout { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not authorized: {message}")]
    #[diagnostic(
        code(lectern::auth_failed),
        help(
            "The session or CSRF token was rejected.\n\
             Store a fresh token with: lectern session set-token\n\
             Or update the CSRF token with: lectern config set-csrf"
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(lectern::not_found),
        help("Run: lectern {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(lectern::conflict))]
    Conflict { message: String },

    #[error("{operation} is already in progress")]
    #[diagnostic(code(lectern::busy), help("Wait for it to finish and try again."))]
    Busy { operation: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({status}): {message}")]
    #[diagnostic(code(lectern::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from the server: {message}")]
    #[diagnostic(
        code(lectern::decode),
        help("Re-run with -vv to log the request; the server may be a different version.")
    )]
    Decode { message: String },

    #[error("'{action}' is not a supported action for {resource_type}")]
    #[diagnostic(code(lectern::unsupported), help("Supported actions: {supported}"))]
    UnsupportedAction {
        resource_type: String,
        action: String,
        supported: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lectern::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lectern::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lectern config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No API base URL configured")]
    #[diagnostic(
        code(lectern::no_config),
        help(
            "Create a profile with: lectern config init\n\
             Or pass --base-url / set LECTERN_BASE_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(lectern::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(lectern::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(lectern::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(lectern::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::Busy { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::UnsupportedAction { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Usage error for a malformed `key=value` style argument.
    pub fn bad_argument(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { reason } => CliError::ConnectionFailed {
                url: "(admin API)".into(),
                reason,
            },

            CoreError::Timeout { reason } => CliError::Timeout { reason },

            CoreError::Unauthorized { message } => CliError::AuthFailed { message },

            CoreError::Request { status: 409, message } => CliError::Conflict { message },

            CoreError::Request { status, message } => CliError::ApiError { status, message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::InvalidIndex { index, len } => CliError::Validation {
                field: "index".into(),
                reason: format!("{index} is out of range; valid positions are 0..{len}"),
            },

            CoreError::Decode { message } => CliError::Decode { message },

            CoreError::Busy { operation } => CliError::Busy { operation },

            CoreError::UnsupportedAction {
                entity_type,
                action,
            } => CliError::UnsupportedAction {
                resource_type: entity_type,
                action,
                supported: String::from("(none)"),
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::MissingBaseUrl => CliError::NoConfig {
                path: lectern_config::config_path().display().to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

fn list_command_for(entity_type: &str) -> String {
    match entity_type.to_lowercase().as_str() {
        "category" | "parent category" => "categories tree".into(),
        other => format!("{}s list", other.replace(' ', "-")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let auth = CliError::from(CoreError::Unauthorized {
            message: "Unauthenticated.".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing = CliError::from(CoreError::NotFound {
            entity_type: "Category".into(),
            identifier: "7".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let offline = CliError::from(CoreError::Network {
            reason: "connection refused".into(),
        });
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let busy = CliError::from(CoreError::Busy {
            operation: "Publish".into(),
        });
        assert_eq!(busy.exit_code(), exit_code::CONFLICT);

        let rejected = CliError::from(CoreError::Request {
            status: 500,
            message: "Server exploded".into(),
        });
        assert_eq!(rejected.exit_code(), exit_code::GENERAL);
        assert_eq!(rejected.to_string(), "API error (500): Server exploded");
    }

    #[test]
    fn list_hints_name_the_collection() {
        assert_eq!(list_command_for("Event"), "events list");
        assert_eq!(list_command_for("Category"), "categories tree");
        assert_eq!(list_command_for("Prayer request"), "prayer-requests list");
    }
}
