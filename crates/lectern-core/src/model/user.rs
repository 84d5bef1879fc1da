use serde::{Deserialize, Serialize};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, require};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Back-office account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    /// Empty on edit keeps the current password.
    pub password: String,
    pub password_confirmation: String,
    pub role: String,
    pub is_active: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            role: "editor".into(),
            is_active: true,
        }
    }
}

impl ResourceForm for UserForm {
    fn validate(&self, mode: FormMode) -> Result<(), CoreError> {
        require("Name", &self.name)?;
        require("Email", &self.email)?;
        if !self.email.contains('@') {
            return Err(CoreError::validation("Email must be a valid address"));
        }
        if mode == FormMode::Create {
            require("Password", &self.password)?;
        }
        check_password(&self.password, &self.password_confirmation)
    }
}

/// Length and confirmation checks shared by the user and profile screens.
pub fn check_password(password: &str, confirmation: &str) -> Result<(), CoreError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirmation {
        return Err(CoreError::validation("Password confirmation does not match"));
    }
    Ok(())
}

impl Resource for User {
    type Form = UserForm;

    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn to_form(&self) -> UserForm {
        UserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            password: String::new(),
            password_confirmation: String::new(),
            role: self.role.clone(),
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> UserForm {
        UserForm {
            name: "Deacon Joe".into(),
            email: "joe@church.example".into(),
            ..UserForm::default()
        }
    }

    #[test]
    fn create_requires_password() {
        assert!(filled().validate(FormMode::Create).is_err());
        assert!(filled().validate(FormMode::Edit).is_ok());
    }

    #[test]
    fn password_length_and_match() {
        assert!(check_password("short", "short").is_err());
        assert!(check_password("long-enough", "long-enougX").is_err());
        assert!(check_password("long-enough", "long-enough").is_ok());
    }
}
