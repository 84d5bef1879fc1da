// ── Homepage widget descriptors ──

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use crate::resource::parse_bool;

/// A single widget setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
    /// Lists, objects and anything else this client does not edit in place.
    Other(Value),
}

impl SettingValue {
    /// Interpret raw text, keeping the kind of `current` when it has one.
    pub fn parse_like(raw: &str, current: Option<&SettingValue>) -> SettingValue {
        let trimmed = raw.trim();
        match current {
            Some(Self::Text(_)) => Self::Text(raw.to_owned()),
            Some(Self::Other(_)) => serde_json::from_str(trimmed)
                .map_or_else(|_| Self::Text(raw.to_owned()), Self::Other),
            Some(Self::Bool(_)) => {
                parse_bool(trimmed).map_or_else(|| Self::Text(raw.to_owned()), Self::Bool)
            }
            _ => {
                let numeric = trimmed.chars().all(|c| c.is_ascii_digit());
                if let Some(b) = parse_bool(trimmed).filter(|_| !numeric) {
                    Self::Bool(b)
                } else if let Ok(i) = trimmed.parse::<i64>() {
                    Self::Integer(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    Self::Float(f)
                } else if trimmed.is_empty() || trimmed == "null" {
                    Self::Null
                } else if let Some(v) = structured(trimmed) {
                    Self::Other(v)
                } else {
                    Self::Text(raw.to_owned())
                }
            }
        }
    }
}

fn structured(raw: &str) -> Option<Value> {
    if !(raw.starts_with('[') || raw.starts_with('{')) {
        return None;
    }
    serde_json::from_str(raw).ok()
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Null => f.write_str("-"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

pub type WidgetSettings = IndexMap<String, SettingValue>;

/// One homepage section. Position in the sequence is the render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub settings: WidgetSettings,
    /// Server-defined keys this client does not interpret; sent back as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            enabled,
            settings: WidgetSettings::new(),
            extra: Map::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.label.is_empty() { &self.id } else { &self.label }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_keys_round_trip() {
        let raw = json!({
            "id": "sermons",
            "label": "Latest Sermons",
            "icon": "mic",
            "enabled": 1,
            "settings": {"count": 3, "show_speaker": true},
            "component": "SermonGrid"
        });
        let widget: WidgetDescriptor = serde_json::from_value(raw).unwrap();
        assert!(widget.enabled);
        assert_eq!(widget.settings["count"], SettingValue::Integer(3));

        let back = serde_json::to_value(&widget).unwrap();
        assert_eq!(back["component"], "SermonGrid");
        assert_eq!(back["enabled"], true);
        assert_eq!(back["settings"]["show_speaker"], true);
    }

    #[test]
    fn parse_like_respects_current_kind() {
        let text = SettingValue::Text("Welcome".into());
        assert_eq!(
            SettingValue::parse_like("42", Some(&text)),
            SettingValue::Text("42".into())
        );
        assert_eq!(SettingValue::parse_like("42", None), SettingValue::Integer(42));
        assert_eq!(SettingValue::parse_like("true", None), SettingValue::Bool(true));
        assert_eq!(SettingValue::parse_like("0.5", None), SettingValue::Float(0.5));
    }

    #[test]
    fn structured_settings_pass_through() {
        let raw = json!({
            "id": "events",
            "settings": {"count": 3, "category_ids": [1, 2], "layout": {"cols": 2}}
        });
        let widget: WidgetDescriptor = serde_json::from_value(raw).unwrap();
        assert_eq!(widget.settings["count"], SettingValue::Integer(3));
        assert_eq!(
            widget.settings["category_ids"],
            SettingValue::Other(json!([1, 2]))
        );
        assert_eq!(widget.settings["category_ids"].to_string(), "[1,2]");

        let back = serde_json::to_value(&widget).unwrap();
        assert_eq!(back["settings"]["category_ids"], json!([1, 2]));
        assert_eq!(back["settings"]["layout"], json!({"cols": 2}));

        let ids = widget.settings.get("category_ids");
        assert_eq!(
            SettingValue::parse_like("[4]", ids),
            SettingValue::Other(json!([4]))
        );
    }

    #[test]
    fn empty_settings_are_sent_back() {
        let widget: WidgetDescriptor =
            serde_json::from_value(json!({"id": "x", "enabled": true, "settings": {}})).unwrap();
        let back = serde_json::to_value(&widget).unwrap();
        assert_eq!(back["settings"], json!({}));
    }
}
