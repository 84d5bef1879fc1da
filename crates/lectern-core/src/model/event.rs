use serde::{Deserialize, Serialize};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, date_range, optional_date, require};

/// Calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub location: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub registration_required: bool,
    #[serde(default)]
    pub max_attendees: Option<u32>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub registration_required: bool,
    /// `None` means unlimited.
    pub max_attendees: Option<u32>,
    pub is_featured: bool,
    pub is_active: bool,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            registration_required: false,
            max_attendees: None,
            is_featured: false,
            is_active: true,
        }
    }
}

impl ResourceForm for EventForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Title", &self.title)?;
        require("Start date", &self.start_date)?;
        optional_date("Start date", &self.start_date)?;
        date_range(&self.start_date, &self.end_date)?;
        if self.registration_required && self.max_attendees == Some(0) {
            return Err(CoreError::validation(
                "Max attendees must be positive when registration is required",
            ));
        }
        Ok(())
    }
}

impl Resource for Event {
    type Form = EventForm;

    const COLLECTION: &'static str = "events";
    const LABEL: &'static str = "Event";
    const ACTIONS: &'static [&'static str] = &["toggle-featured"];

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn to_form(&self) -> EventForm {
        EventForm {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start_date: self.start_date.clone().unwrap_or_default(),
            end_date: self.end_date.clone().unwrap_or_default(),
            start_time: self.start_time.clone().unwrap_or_default(),
            end_time: self.end_time.clone().unwrap_or_default(),
            registration_required: self.registration_required,
            max_attendees: self.max_attendees,
            is_featured: self.is_featured,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_date_required_and_ordered() {
        let mut form = EventForm {
            title: "Youth Camp".into(),
            ..EventForm::default()
        };
        assert!(form.validate(FormMode::Create).is_err());
        form.start_date = "2026-07-10".into();
        form.end_date = "2026-07-08".into();
        assert!(form.validate(FormMode::Create).is_err());
        form.end_date = "2026-07-12".into();
        assert!(form.validate(FormMode::Create).is_ok());
    }
}
