use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, require};

/// Permissions arrive either as names or as `{id, name}` objects.
fn permission_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Name(String),
        Object { name: String },
    }

    let entries = Option::<Vec<Entry>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|e| match e {
            Entry::Name(name) | Entry::Object { name } => name,
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::lenient::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "permission_names")]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleForm {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

impl ResourceForm for RoleForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Name", &self.name)
    }
}

impl Resource for Role {
    type Form = RoleForm;

    const COLLECTION: &'static str = "roles";
    const LABEL: &'static str = "Role";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn to_form(&self) -> RoleForm {
        RoleForm {
            name: self.name.clone(),
            description: self.description.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn permissions_accept_both_shapes() {
        let role: Role = serde_json::from_value(json!({
            "id": 2,
            "name": "editor",
            "permissions": ["posts.edit", {"id": 9, "name": "events.edit"}]
        }))
        .unwrap();
        assert_eq!(role.permissions, vec!["posts.edit", "events.edit"]);
    }
}
