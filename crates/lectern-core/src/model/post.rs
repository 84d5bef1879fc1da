use serde::{Deserialize, Serialize};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, optional_date, require};

const STATUSES: &[&str] = &["draft", "published", "archived"];

fn default_status() -> String {
    "draft".into()
}

/// Blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub content: String,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_featured: bool,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: Option<EntityId>,
    pub status: String,
    pub is_featured: bool,
    pub published_at: String,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category_id: None,
            status: default_status(),
            is_featured: false,
            published_at: String::new(),
        }
    }
}

impl ResourceForm for PostForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Title", &self.title)?;
        if !STATUSES.contains(&self.status.as_str()) {
            return Err(CoreError::validation(format!(
                "Status must be one of: {}",
                STATUSES.join(", ")
            )));
        }
        optional_date("Publish date", &self.published_at)?;
        Ok(())
    }
}

impl Resource for Post {
    type Form = PostForm;

    const COLLECTION: &'static str = "posts";
    const LABEL: &'static str = "Post";
    const ACTIONS: &'static [&'static str] = &["toggle-featured"];

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn to_form(&self) -> PostForm {
        PostForm {
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            category_id: self.category_id.clone(),
            status: self.status.clone(),
            is_featured: self.is_featured,
            published_at: self.published_at.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_status() {
        let form = PostForm {
            title: "Grace".into(),
            status: "live".into(),
            ..PostForm::default()
        };
        assert!(form.validate(FormMode::Create).is_err());
    }

    #[test]
    fn default_is_draft() {
        assert_eq!(PostForm::default().status, "draft");
    }
}
