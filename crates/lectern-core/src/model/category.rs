use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, require};

/// Content family a category groups. Children always share their parent's type.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CategoryType {
    #[default]
    Post,
    Page,
    Sermon,
    Book,
    BibleStudy,
}

/// Category node as the API returns it.
///
/// In tree responses `children` is populated; in flat responses it is empty
/// and the shape is carried by `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub slug: String,
    #[serde(rename = "type", default)]
    pub category_type: CategoryType,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub sort_order: i64,
    #[serde(default = "active", deserialize_with = "lenient::bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub children: Vec<Category>,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub parent_id: Option<EntityId>,
    pub description: String,
    pub sort_order: i64,
    pub is_active: bool,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category_type: CategoryType::default(),
            parent_id: None,
            description: String::new(),
            sort_order: 0,
            is_active: true,
        }
    }
}

impl ResourceForm for CategoryForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Name", &self.name)
    }
}

impl Resource for Category {
    type Form = CategoryForm;

    const COLLECTION: &'static str = lectern_api::categories::CATEGORIES_PATH;
    const LABEL: &'static str = "Category";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn to_form(&self) -> CategoryForm {
        CategoryForm {
            name: self.name.clone(),
            category_type: self.category_type,
            parent_id: self.parent_id.clone(),
            description: self.description.clone(),
            sort_order: self.sort_order,
            is_active: self.is_active,
        }
    }

    fn delete_prompt(&self) -> String {
        delete_prompt(&self.name, self.children.len())
    }
}

/// Confirmation text; states how many direct children go with the node.
pub fn delete_prompt(name: &str, child_count: usize) -> String {
    match child_count {
        0 => format!("Delete category \"{name}\"?"),
        1 => format!("Delete category \"{name}\"? It has 1 subcategory that will also be removed."),
        n => format!("Delete category \"{name}\"? It has {n} subcategories that will also be removed."),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn type_wire_names() {
        let c: Category =
            serde_json::from_value(json!({"id": 1, "name": "Romans", "type": "bible-study"}))
                .unwrap();
        assert_eq!(c.category_type, CategoryType::BibleStudy);
        assert_eq!(CategoryType::BibleStudy.to_string(), "bible-study");
        assert_eq!("sermon".parse::<CategoryType>().unwrap(), CategoryType::Sermon);
        assert!(c.is_active);
    }

    #[test]
    fn null_name_reads_as_empty() {
        let c: Category =
            serde_json::from_value(json!({"id": 3, "name": null, "type": "page"})).unwrap();
        assert_eq!(c.name, "");
    }

    #[test]
    fn prompt_mentions_child_count() {
        assert!(delete_prompt("Root", 2).contains('2'));
        assert!(!delete_prompt("Leaf", 0).contains("subcategor"));
    }
}
