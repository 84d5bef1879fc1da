//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};

use lectern_core::{Confirm, EntityId, FilePart, ResourceForm};

use crate::cli::{FormArgs, GlobalOpts};
use crate::error::CliError;

// ── Confirmation ────────────────────────────────────────────────────

/// Terminal confirmation gate handed to the core stores.
pub struct TerminalConfirm {
    yes: bool,
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Build a confirmation gate, refusing to prompt without a terminal.
pub fn confirmer(global: &GlobalOpts, action: &str) -> Result<TerminalConfirm, CliError> {
    if !global.yes && !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    Ok(TerminalConfirm { yes: global.yes })
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Argument parsing ────────────────────────────────────────────────

/// Split `key=value`; the value may itself contain `=`.
pub fn split_pair<'a>(raw: &'a str, what: &str) -> Result<(&'a str, &'a str), CliError> {
    raw.split_once('=')
        .filter(|(k, _)| !k.trim().is_empty())
        .map(|(k, v)| (k.trim(), v))
        .ok_or_else(|| CliError::bad_argument(what, format!("expected KEY=VALUE, got '{raw}'")))
}

pub fn parse_id(raw: &str) -> EntityId {
    EntityId::from(raw.trim())
}

/// Read and parse a JSON object file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::bad_argument(
            "from-file",
            "expected a JSON object of form fields",
        )),
        Err(e) => Err(CliError::bad_argument("from-file", format!("invalid JSON: {e}"))),
    }
}

/// Apply `--from-file`, then `--set`, then `--file` to a form.
pub fn apply_form_args<F: ResourceForm>(form: &mut F, args: &FormArgs) -> Result<(), CliError> {
    if let Some(ref path) = args.from_file {
        let fields = read_json_file(path)?;
        let mut value = serde_json::to_value(&*form)?;
        if let Value::Object(ref mut current) = value {
            current.extend(fields);
        }
        let attachments = form.attachments();
        *form = serde_json::from_value(value).map_err(|e| {
            CliError::bad_argument("from-file", format!("fields do not match the form: {e}"))
        })?;
        for part in attachments {
            form.attach(part)?;
        }
    }
    apply_pairs(form, &args.set)?;
    for raw in &args.files {
        let (field, path) = split_pair(raw, "file")?;
        let part = FilePart::from_path(field, Path::new(path))
            .map_err(|e| CliError::bad_argument("file", e.to_string()))?;
        form.attach(part)?;
    }
    Ok(())
}

/// Apply `key=value` pairs through `ResourceForm::set_field`.
pub fn apply_pairs<F: ResourceForm>(form: &mut F, pairs: &[String]) -> Result<(), CliError> {
    for raw in pairs {
        let (key, value) = split_pair(raw, "set")?;
        form.set_field(key, value)?;
    }
    Ok(())
}

/// Turn `key=value` pairs into a JSON object, keeping values as strings.
pub fn pairs_to_json(pairs: &[String]) -> Result<Option<Value>, CliError> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut map = Map::new();
    for raw in pairs {
        let (key, value) = split_pair(raw, "set")?;
        map.insert(key.to_owned(), Value::String(value.to_owned()));
    }
    Ok(Some(Value::Object(map)))
}

// ── Progress ────────────────────────────────────────────────────────

/// Spinner on stderr for slow requests; hidden in quiet mode or without a tty.
pub fn spinner(message: &str, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lectern_core::{AnnouncementForm, BookForm};

    use super::*;

    fn form_args(set: &[&str], files: &[&str], from_file: Option<&Path>) -> FormArgs {
        FormArgs {
            set: set.iter().map(|s| (*s).to_owned()).collect(),
            from_file: from_file.map(Path::to_path_buf),
            files: files.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn pairs_split_on_first_equals() {
        assert_eq!(split_pair("url=a=b", "set").unwrap(), ("url", "a=b"));
        assert!(split_pair("novalue", "set").is_err());
        assert!(split_pair("=x", "set").is_err());
    }

    #[test]
    fn file_then_pairs_patch_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("form.json");
        std::fs::write(&json, r#"{"title": "From file", "priority": 3}"#).unwrap();

        let mut form = AnnouncementForm::default();
        let args = form_args(&["title=Override", "is_active=false"], &[], Some(&json));
        apply_form_args(&mut form, &args).unwrap();
        assert_eq!(form.title, "Override");
        assert_eq!(form.priority, 3);
        assert!(!form.is_active);
    }

    #[test]
    fn attachments_survive_later_patches() {
        let dir = tempfile::tempdir().unwrap();
        let cover = dir.path().join("cover.png");
        std::fs::write(&cover, [0_u8, 1, 2]).unwrap();

        let mut form = BookForm::default();
        let file_arg = format!("cover_image={}", cover.display());
        let args = form_args(&["title=Confessions"], &[file_arg.as_str()], None);
        apply_form_args(&mut form, &args).unwrap();
        apply_pairs(&mut form, &["author=Augustine".to_owned()]).unwrap();

        let parts = form.attachments();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].file_name, "cover.png");
        assert_eq!(parts[0].content_type, "image/png");
    }

    #[test]
    fn action_body_from_pairs() {
        assert!(pairs_to_json(&[]).unwrap().is_none());
        let body = pairs_to_json(&["note=Praying".to_owned()]).unwrap().unwrap();
        assert_eq!(body["note"], "Praying");
    }
}
