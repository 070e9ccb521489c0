use serde::{Deserialize, Serialize};

use super::fields::{FormErrors, FormVariant, field_rules};

/// Raw comment form submission. The post and author are route and identity
/// data, never form fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    pub text: String,
}

impl CommentFormData {
    pub fn validate(&self) -> Result<ValidComment, FormErrors> {
        let mut errors = FormErrors::new();
        for rule in field_rules(FormVariant::Comment) {
            if rule.name == "text" {
                rule.check(&self.text, &mut errors);
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidComment {
            text: self.text.trim().to_owned(),
        })
    }
}
