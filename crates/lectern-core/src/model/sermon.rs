use serde::{Deserialize, Serialize};

use lectern_api::FilePart;

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, optional_date, require};

/// Recorded sermon with optional audio upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sermon {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub speaker: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub scripture_reference: String,
    #[serde(default)]
    pub sermon_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub video_url: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SermonForm {
    pub title: String,
    pub speaker: String,
    pub scripture_reference: String,
    pub sermon_date: String,
    pub description: String,
    pub video_url: String,
    pub category_id: Option<EntityId>,
    pub is_featured: bool,
    pub is_active: bool,
    #[serde(skip)]
    pub audio_file: Option<FilePart>,
    #[serde(skip)]
    pub thumbnail: Option<FilePart>,
}

impl Default for SermonForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            speaker: String::new(),
            scripture_reference: String::new(),
            sermon_date: String::new(),
            description: String::new(),
            video_url: String::new(),
            category_id: None,
            is_featured: false,
            is_active: true,
            audio_file: None,
            thumbnail: None,
        }
    }
}

impl ResourceForm for SermonForm {
    const FILE_BEARING: bool = true;

    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Title", &self.title)?;
        require("Speaker", &self.speaker)?;
        optional_date("Sermon date", &self.sermon_date)?;
        Ok(())
    }

    fn attachments(&self) -> Vec<FilePart> {
        self.audio_file
            .iter()
            .chain(self.thumbnail.iter())
            .cloned()
            .collect()
    }

    fn attach(&mut self, part: FilePart) -> Result<(), CoreError> {
        match part.field.as_str() {
            "audio_file" => self.audio_file = Some(part),
            "thumbnail" => self.thumbnail = Some(part),
            other => {
                return Err(CoreError::validation(format!(
                    "sermons accept audio_file or thumbnail, not '{other}'"
                )));
            }
        }
        Ok(())
    }
}

impl Resource for Sermon {
    type Form = SermonForm;

    const COLLECTION: &'static str = "sermons";
    const LABEL: &'static str = "Sermon";
    const ACTIONS: &'static [&'static str] = &["toggle-featured"];

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn to_form(&self) -> SermonForm {
        SermonForm {
            title: self.title.clone(),
            speaker: self.speaker.clone(),
            scripture_reference: self.scripture_reference.clone(),
            sermon_date: self.sermon_date.clone().unwrap_or_default(),
            description: self.description.clone(),
            video_url: self.video_url.clone(),
            category_id: self.category_id.clone(),
            is_featured: self.is_featured,
            is_active: self.is_active,
            audio_file: None,
            thumbnail: None,
        }
    }
}
