use std::collections::BTreeMap;

use serde::Serialize;

use gazette_core::domain::MAX_TITLE_LEN;

/// The form variants the site renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVariant {
    PostCreate,
    PostEdit,
    Comment,
    Profile,
    Login,
    Register,
}

/// One field's constraints.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub max_len: Option<usize>,
}

impl FieldRule {
    const fn required(name: &'static str, max_len: usize) -> Self {
        Self {
            name,
            required: true,
            max_len: Some(max_len),
        }
    }

    const fn required_text(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            max_len: None,
        }
    }

    const fn optional(name: &'static str, max_len: usize) -> Self {
        Self {
            name,
            required: false,
            max_len: Some(max_len),
        }
    }

    /// Check a raw value against this rule, collecting messages.
    pub fn check(&self, value: &str, errors: &mut FormErrors) {
        let value = value.trim();
        if value.is_empty() {
            if self.required {
                errors.add(self.name, "This field is required.");
            }
            return;
        }
        if let Some(max) = self.max_len {
            if value.chars().count() > max {
                errors.add(
                    self.name,
                    format!("Ensure this value has at most {max} characters."),
                );
            }
        }
    }
}

const URL_LEN: usize = 512;
const NAME_LEN: usize = 150;

const POST_FIELDS: &[FieldRule] = &[
    FieldRule::required("title", MAX_TITLE_LEN),
    FieldRule::required_text("text"),
    FieldRule::required_text("pub_date"),
    FieldRule::optional("location", 64),
    FieldRule::optional("category", 64),
    FieldRule::optional("image", URL_LEN),
];

const COMMENT_FIELDS: &[FieldRule] = &[FieldRule::required_text("text")];

const PROFILE_FIELDS: &[FieldRule] = &[
    FieldRule::optional("first_name", NAME_LEN),
    FieldRule::optional("last_name", NAME_LEN),
    FieldRule::required("email", MAX_TITLE_LEN),
    FieldRule::optional("avatar", URL_LEN),
];

const LOGIN_FIELDS: &[FieldRule] = &[
    FieldRule::required("username", NAME_LEN),
    FieldRule::required_text("password"),
];

const REGISTER_FIELDS: &[FieldRule] = &[
    FieldRule::required("username", NAME_LEN),
    FieldRule::required("email", MAX_TITLE_LEN),
    FieldRule::required_text("password"),
];

/// The rule table for a form variant.
pub fn field_rules(variant: FormVariant) -> &'static [FieldRule] {
    match variant {
        // The author field is absent on purpose: it is force-set from the
        // authenticated identity, never bound from the form.
        FormVariant::PostCreate | FormVariant::PostEdit => POST_FIELDS,
        FormVariant::Comment => COMMENT_FIELDS,
        FormVariant::Profile => PROFILE_FIELDS,
        FormVariant::Login => LOGIN_FIELDS,
        FormVariant::Register => REGISTER_FIELDS,
    }
}

/// Field-level validation errors, ordered by field name for stable
/// rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }
}
