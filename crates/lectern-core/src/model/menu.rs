use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::ordering::move_item;
use crate::resource::{FormMode, Resource, ResourceForm, require};

/// What a menu entry points at.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MenuItemType {
    #[default]
    Link,
    Page,
    Category,
    Post,
}

/// One navigation entry. Top-level entries may carry one level of children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: MenuItemType,
    /// Target for `link` entries.
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub url: String,
    /// Target for page/category/post entries.
    #[serde(default)]
    pub reference_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub open_in_new_tab: bool,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn check(&self, depth: usize) -> Result<(), CoreError> {
        require("Menu item label", &self.label)?;
        match self.kind {
            MenuItemType::Link => require(&format!("URL for \"{}\"", self.label), &self.url)?,
            _ if self.reference_id.is_none() => {
                return Err(CoreError::validation(format!(
                    "\"{}\" must reference a {}",
                    self.label, self.kind
                )));
            }
            _ => {}
        }
        if depth > 0 && !self.children.is_empty() {
            return Err(CoreError::validation(format!(
                "\"{}\" is nested too deeply; menus support one level of children",
                self.label
            )));
        }
        self.children.iter().try_for_each(|c| c.check(depth + 1))
    }
}

fn default_location() -> String {
    "header".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub name: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuForm {
    pub name: String,
    pub location: String,
    pub is_active: bool,
    pub items: Vec<MenuItem>,
}

impl Default for MenuForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: default_location(),
            is_active: true,
            items: Vec::new(),
        }
    }
}

impl MenuForm {
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.items, from, to)
    }

    /// Reorder within the children of top-level item `parent`.
    pub fn move_child(&mut self, parent: usize, from: usize, to: usize) -> bool {
        self.items
            .get_mut(parent)
            .is_some_and(|p| move_item(&mut p.children, from, to))
    }
}

impl ResourceForm for MenuForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Name", &self.name)?;
        self.items.iter().try_for_each(|item| item.check(0))
    }
}

impl Resource for Menu {
    type Form = MenuForm;

    const COLLECTION: &'static str = "menus";
    const LABEL: &'static str = "Menu";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn to_form(&self) -> MenuForm {
        MenuForm {
            name: self.name.clone(),
            location: self.location.clone(),
            is_active: self.is_active,
            items: self.items.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn link(label: &str) -> MenuItem {
        MenuItem {
            label: label.into(),
            url: format!("/{}", label.to_lowercase()),
            ..MenuItem::default()
        }
    }

    #[test]
    fn reorders_top_level_and_children() {
        let mut about = link("About");
        about.children = vec![link("Staff"), link("Beliefs")];
        let mut form = MenuForm {
            name: "Main".into(),
            items: vec![link("Home"), about, link("Give")],
            ..MenuForm::default()
        };

        assert!(form.move_item(2, 0));
        assert_eq!(form.items[0].label, "Give");
        assert!(form.move_child(2, 1, 0));
        assert_eq!(form.items[2].children[0].label, "Beliefs");
        assert!(!form.move_child(0, 0, 1));
    }

    #[test]
    fn rejects_grandchildren_and_dangling_refs() {
        let mut child = link("Staff");
        child.children = vec![link("Elders")];
        let mut parent = link("About");
        parent.children = vec![child];
        let form = MenuForm {
            name: "Main".into(),
            items: vec![parent],
            ..MenuForm::default()
        };
        assert!(form.validate(FormMode::Create).is_err());

        let page = MenuItem {
            label: "Visit".into(),
            kind: MenuItemType::Page,
            ..MenuItem::default()
        };
        let form = MenuForm {
            name: "Main".into(),
            items: vec![page],
            ..MenuForm::default()
        };
        assert!(form.validate(FormMode::Create).is_err());
    }

    #[test]
    fn item_type_parses_from_text() {
        assert_eq!("category".parse::<MenuItemType>().unwrap(), MenuItemType::Category);
    }
}
