use serde::{Deserialize, Serialize};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, require};

fn default_status() -> String {
    "pending".into()
}

/// Prayer request submitted through the public site and moderated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRequest {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub request: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_anonymous: bool,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_public: bool,
    /// `pending`, `approved` or `rejected`.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRequestForm {
    pub name: String,
    pub email: String,
    pub request: String,
    pub is_anonymous: bool,
    pub is_public: bool,
    pub status: String,
}

impl Default for PrayerRequestForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            request: String::new(),
            is_anonymous: false,
            is_public: false,
            status: default_status(),
        }
    }
}

impl ResourceForm for PrayerRequestForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Request", &self.request)?;
        if !self.is_anonymous {
            require("Name", &self.name)?;
        }
        Ok(())
    }
}

impl Resource for PrayerRequest {
    type Form = PrayerRequestForm;

    const COLLECTION: &'static str = "prayer-requests";
    const LABEL: &'static str = "Prayer request";
    const ACTIONS: &'static [&'static str] = &["approve", "reject"];

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        if self.is_anonymous || self.name.is_empty() {
            "Anonymous".into()
        } else {
            self.name.clone()
        }
    }

    fn to_form(&self) -> PrayerRequestForm {
        PrayerRequestForm {
            name: self.name.clone(),
            email: self.email.clone(),
            request: self.request.clone(),
            is_anonymous: self.is_anonymous,
            is_public: self.is_public,
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn anonymous_requests_hide_name() {
        let req: PrayerRequest = serde_json::from_value(json!({
            "id": 3, "name": "Maria", "request": "Healing", "is_anonymous": "1"
        }))
        .unwrap();
        assert_eq!(req.title(), "Anonymous");
        assert_eq!(req.status, "pending");
    }

    #[test]
    fn anonymous_form_needs_no_name() {
        let form = PrayerRequestForm {
            request: "Guidance".into(),
            is_anonymous: true,
            ..PrayerRequestForm::default()
        };
        assert!(form.validate(FormMode::Create).is_ok());
    }
}
