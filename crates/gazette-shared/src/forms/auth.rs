use serde::{Deserialize, Serialize};

use super::fields::{FormErrors, FormVariant, field_rules};

const MIN_PASSWORD_LEN: usize = 8;

/// Login form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ValidLogin {
    pub username: String,
    pub password: String,
}

impl LoginFormData {
    pub fn validate(&self) -> Result<ValidLogin, FormErrors> {
        let mut errors = FormErrors::new();
        for rule in field_rules(FormVariant::Login) {
            let value = match rule.name {
                "username" => &self.username,
                "password" => &self.password,
                _ => continue,
            };
            rule.check(value, &mut errors);
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidLogin {
            username: self.username.trim().to_owned(),
            password: self.password.clone(),
        })
    }
}

/// Registration form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterFormData {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterFormData {
    pub fn validate(&self) -> Result<ValidRegistration, FormErrors> {
        let mut errors = FormErrors::new();
        for rule in field_rules(FormVariant::Register) {
            let value = match rule.name {
                "username" => &self.username,
                "email" => &self.email,
                "password" => &self.password,
                _ => continue,
            };
            rule.check(value, &mut errors);
        }

        let username = self.username.trim();
        if !username.is_empty()
            && !username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | '@' | '+'))
        {
            errors.add(
                "username",
                "Only letters, digits and ./_/-/@/+ are allowed.",
            );
        }

        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }

        if !self.password.is_empty() && self.password.len() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidRegistration {
            username: username.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
        })
    }
}
