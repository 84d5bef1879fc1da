use serde::{Deserialize, Serialize};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, date_range, require};

fn default_kind() -> String {
    "general".into()
}

fn kind_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_kind))
}

/// Notice shown on the public site for a date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub content: String,
    /// `general`, `event`, `urgent`, ...
    #[serde(rename = "type", default = "default_kind", deserialize_with = "kind_or_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub priority: i64,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: i64,
    pub is_active: bool,
    pub start_date: String,
    pub end_date: String,
}

impl Default for AnnouncementForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            kind: default_kind(),
            priority: 0,
            is_active: true,
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

impl ResourceForm for AnnouncementForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Title", &self.title)?;
        date_range(&self.start_date, &self.end_date)
    }
}

impl Resource for Announcement {
    type Form = AnnouncementForm;

    const COLLECTION: &'static str = "announcements";
    const LABEL: &'static str = "Announcement";
    const ACTIONS: &'static [&'static str] = &["toggle-active"];

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn to_form(&self) -> AnnouncementForm {
        AnnouncementForm {
            title: self.title.clone(),
            content: self.content.clone(),
            kind: self.kind.clone(),
            priority: self.priority,
            is_active: self.is_active,
            start_date: self.start_date.clone().unwrap_or_default(),
            end_date: self.end_date.clone().unwrap_or_default(),
        }
    }
}
