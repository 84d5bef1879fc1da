// ── Resource and form contracts ──
//
// Every admin collection is a `Resource` with an associated `Form`. The
// store is generic over these two traits; the per-entity modules under
// `model/` supply the endpoint, labels, defaults and validation.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use lectern_api::{FilePart, MultipartPayload, RequestBody};

use crate::error::CoreError;
use crate::model::EntityId;

/// Whether a form is creating a record or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

impl FormMode {
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Edit => "updated",
        }
    }
}

/// A persisted record in one admin collection.
pub trait Resource:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Form: ResourceForm;

    /// Collection path under the API root, e.g. `announcements`.
    const COLLECTION: &'static str;
    /// Human label used in alerts, e.g. `Announcement`.
    const LABEL: &'static str;
    /// Status actions accepted at `PATCH {collection}/{id}/{action}`.
    const ACTIONS: &'static [&'static str] = &[];

    fn id(&self) -> &EntityId;

    /// Short display name for tables and prompts.
    fn title(&self) -> String;

    /// Populate an edit form, substituting defaults for absent fields.
    fn to_form(&self) -> Self::Form;

    fn delete_prompt(&self) -> String {
        format!(
            "Delete {} \"{}\"? This cannot be undone.",
            Self::LABEL.to_lowercase(),
            self.title()
        )
    }
}

/// Editable field set for a [`Resource`].
///
/// `Default` yields the documented create-mode defaults. File attachments
/// are kept out of the serialized form and travel as multipart parts.
pub trait ResourceForm:
    Clone + fmt::Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// File-bearing forms always submit as multipart, with or without files.
    const FILE_BEARING: bool = false;

    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        Ok(())
    }

    fn attachments(&self) -> Vec<FilePart> {
        Vec::new()
    }

    /// Store a file in the slot named by `part.field`.
    fn attach(&mut self, part: FilePart) -> Result<(), CoreError> {
        Err(CoreError::validation(format!(
            "this form has no file field '{}'",
            part.field
        )))
    }

    /// Wire body for create/update.
    fn body(&self) -> Result<RequestBody, CoreError> {
        let value = serde_json::to_value(self)?;
        if Self::FILE_BEARING {
            let payload = self
                .attachments()
                .into_iter()
                .fold(MultipartPayload::from_json(&value), MultipartPayload::file);
            Ok(RequestBody::Multipart(payload))
        } else {
            Ok(RequestBody::Json(value))
        }
    }

    /// Set one field from its textual form (`key=value` on the command line).
    ///
    /// The raw text is coerced to the field's current JSON type.
    fn set_field(&mut self, key: &str, raw: &str) -> Result<(), CoreError> {
        let mut value = serde_json::to_value(&*self)?;
        let Value::Object(map) = &mut value else {
            return Err(CoreError::Internal("form did not serialize to an object".into()));
        };
        patch_map(map, key, raw)?;
        let mut patched: Self = serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("invalid value for '{key}': {e}")))?;
        for part in self.attachments() {
            patched.attach(part)?;
        }
        *self = patched;
        Ok(())
    }
}

fn patch_map(map: &mut Map<String, Value>, key: &str, raw: &str) -> Result<(), CoreError> {
    let slot = map
        .get_mut(key)
        .ok_or_else(|| CoreError::validation(format!("unknown field '{key}'")))?;
    *slot = coerce(slot, raw)
        .ok_or_else(|| CoreError::validation(format!("invalid value for '{key}': {raw:?}")))?;
    Ok(())
}

fn coerce(existing: &Value, raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    match existing {
        Value::Bool(_) => parse_bool(trimmed).map(Value::Bool),
        Value::Number(n) if n.is_f64() => trimmed.parse::<f64>().ok().map(Value::from),
        Value::Number(_) => trimmed
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| trimmed.parse::<f64>().map(Value::from))
            .ok(),
        Value::String(_) => Some(Value::String(raw.to_owned())),
        Value::Array(_) if trimmed.starts_with('[') => serde_json::from_str(trimmed).ok(),
        Value::Array(_) => Some(Value::Array(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_owned()))
                .collect(),
        )),
        Value::Object(_) => serde_json::from_str(trimmed).ok(),
        Value::Null if trimmed.is_empty() || trimmed == "null" => Some(Value::Null),
        Value::Null => {
            Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(raw.to_owned())))
        }
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ── Shared validators ────────────────────────────────────────────────

pub(crate) fn require(label: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{label} is required")));
    }
    Ok(())
}

/// Parse an optional `YYYY-MM-DD` field; empty means unset.
pub(crate) fn optional_date(label: &str, value: &str) -> Result<Option<NaiveDate>, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    // Accept full timestamps by looking at the date prefix only.
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CoreError::validation(format!("{label} must be a date (YYYY-MM-DD)")))
}

pub(crate) fn date_range(start: &str, end: &str) -> Result<(), CoreError> {
    let start = optional_date("Start date", start)?;
    let end = optional_date("End date", end)?;
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(CoreError::validation(
            "End date must not be before start date",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        title: String,
        is_active: bool,
        priority: i64,
        category_id: Option<EntityId>,
        tags: Vec<String>,
    }

    impl ResourceForm for Sample {}

    #[test]
    fn set_field_coerces_to_existing_type() {
        let mut form = Sample::default();
        form.set_field("title", "Easter Service").unwrap();
        form.set_field("is_active", "yes").unwrap();
        form.set_field("priority", "3").unwrap();
        form.set_field("category_id", "12").unwrap();
        form.set_field("tags", "youth, worship").unwrap();

        assert_eq!(form.title, "Easter Service");
        assert!(form.is_active);
        assert_eq!(form.priority, 3);
        assert_eq!(form.category_id, Some(EntityId::Numeric(12)));
        assert_eq!(form.tags, vec!["youth", "worship"]);
    }

    #[test]
    fn set_field_rejects_unknown_and_malformed() {
        let mut form = Sample::default();
        assert!(form.set_field("nope", "1").is_err());
        assert!(form.set_field("priority", "high").is_err());
        assert!(form.set_field("is_active", "maybe").is_err());
        assert_eq!(form, Sample::default());
    }

    #[test]
    fn empty_clears_nullable_field() {
        let mut form = Sample {
            category_id: Some(EntityId::Numeric(4)),
            ..Sample::default()
        };
        form.set_field("category_id", "").unwrap();
        assert_eq!(form.category_id, None);
    }

    #[test]
    fn json_body_for_plain_forms() {
        let body = Sample::default().body().unwrap();
        assert!(!body.is_multipart());
    }

    #[test]
    fn date_range_checks_order() {
        assert!(date_range("2026-04-05", "2026-04-04").is_err());
        assert!(date_range("2026-04-05", "2026-04-05").is_ok());
        assert!(date_range("", "2026-04-05").is_ok());
        assert!(date_range("05/04/2026", "").is_err());
    }
}
