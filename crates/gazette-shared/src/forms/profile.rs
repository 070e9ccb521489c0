use serde::{Deserialize, Serialize};

use gazette_core::domain::User;

use super::fields::{FormErrors, FormVariant, field_rules};

/// Raw profile edit submission. The username is not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFormData {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl ProfileFormData {
    pub fn from_user(user: &User) -> Self {
        Self {
            csrf_token: String::new(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ValidProfile, FormErrors> {
        let mut errors = FormErrors::new();
        for rule in field_rules(FormVariant::Profile) {
            let value = match rule.name {
                "first_name" => &self.first_name,
                "last_name" => &self.last_name,
                "email" => &self.email,
                "avatar" => &self.avatar,
                _ => continue,
            };
            rule.check(value, &mut errors);
        }

        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let avatar = self.avatar.trim();
        Ok(ValidProfile {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: email.to_owned(),
            avatar: (!avatar.is_empty()).then(|| avatar.to_owned()),
        })
    }
}
