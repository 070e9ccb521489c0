use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gazette_core::domain::Post;

use super::fields::{FormErrors, FormVariant, field_rules};

/// Raw post form submission. Every field arrives as a string; selects post
/// their option value or an empty string. There is no author field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// `datetime-local` input value, e.g. `2026-08-07T12:30`.
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

/// A validated post submission, ready to persist once the handler attaches
/// the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostFormData {
    /// Initial values for the edit and delete-confirmation forms.
    pub fn from_post(post: &Post) -> Self {
        Self {
            csrf_token: String::new(),
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date.format("%Y-%m-%dT%H:%M").to_string(),
            location: post.location_id.map(|id| id.to_string()).unwrap_or_default(),
            category: post.category_id.map(|id| id.to_string()).unwrap_or_default(),
            image: post.image.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self, variant: FormVariant) -> Result<ValidPost, FormErrors> {
        debug_assert!(matches!(
            variant,
            FormVariant::PostCreate | FormVariant::PostEdit
        ));

        let mut errors = FormErrors::new();
        for rule in field_rules(variant) {
            let value = match rule.name {
                "title" => &self.title,
                "text" => &self.text,
                "pub_date" => &self.pub_date,
                "location" => &self.location,
                "category" => &self.category,
                "image" => &self.image,
                _ => continue,
            };
            rule.check(value, &mut errors);
        }

        let pub_date = parse_datetime_local(self.pub_date.trim());
        if !self.pub_date.trim().is_empty() && pub_date.is_none() {
            errors.add("pub_date", "Enter a valid date and time.");
        }

        let location_id = parse_choice(&self.location, "location", &mut errors);
        let category_id = parse_choice(&self.category, "category", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidPost {
            title: self.title.trim().to_owned(),
            text: self.text.trim().to_owned(),
            // validation above guarantees presence
            pub_date: pub_date.unwrap_or_else(Utc::now),
            location_id,
            category_id,
            image: optional(&self.image),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn parse_choice(value: &str, field: &str, errors: &mut FormErrors) -> Option<Uuid> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match Uuid::parse_str(value) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Select a valid choice.");
            None
        }
    }
}

/// Parse an HTML `datetime-local` value, with or without seconds. Falls back
/// to RFC 3339 so API-shaped clients still work. Values are taken as UTC.
fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
