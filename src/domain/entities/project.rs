use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use crate::domain::validation::not_blank;
use crate::entities::{
    media::MediaItem,
    option_fields::{null_as_default, OptionField, PatchString, PatchVec},
};

// ───── Database Models ─────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub tags: Json<Vec<String>>,
    pub github_url: Option<String>,
    pub external_url: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub media: Json<Vec<MediaItem>>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub github_url: Option<String>,
    pub external_url: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub media: Vec<MediaItem>,
    pub order: i32,
    pub is_active: bool,
}

// ───── Requests ─────

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub github_url: Option<String>,

    #[serde(default)]
    pub external_url: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub featured: Option<bool>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<MediaItem>,

    #[serde(default)]
    pub order: Option<i32>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewProject {
    pub fn prepare_for_insert(self) -> ProjectInsert {
        ProjectInsert {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            tags: self.tags,
            github_url: self.github_url,
            external_url: self.external_url,
            image: self.image,
            featured: self.featured.unwrap_or(false),
            media: self.media,
            order: self.order.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub tags: PatchVec<String>,

    #[serde(default)]
    pub github_url: PatchString,

    #[serde(default)]
    pub external_url: PatchString,

    #[serde(default)]
    pub image: PatchString,

    #[serde(default)]
    pub featured: OptionField<bool>,

    #[serde(default)]
    pub media: PatchVec<MediaItem>,

    #[serde(default)]
    pub order: OptionField<i32>,

    #[serde(default)]
    pub is_active: OptionField<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn featured_defaults_to_false() {
        let payload: NewProject = serde_json::from_str(
            r#"{"name":"Site","description":"Portfolio","githubUrl":"https://github.com/x/site"}"#
        ).unwrap();
        assert!(payload.validate().is_ok());

        let insert = payload.prepare_for_insert();
        assert!(!insert.featured);
        assert_eq!(insert.github_url.as_deref(), Some("https://github.com/x/site"));
    }

    #[test]
    fn missing_description_fails_validation() {
        let payload: NewProject = serde_json::from_str(r#"{"name":"Site"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn update_distinguishes_cleared_urls() {
        let payload: UpdateProject = serde_json::from_str(
            r#"{"name": "Site", "description": "Portfolio", "externalUrl": null, "featured": true}"#
        ).unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.external_url.is_set_to_null());
        assert!(payload.github_url.is_unchanged());
        assert_eq!(payload.featured, OptionField::SetToValue(true));
    }

    #[test]
    fn update_without_name_or_description_fails_validation() {
        let payload: UpdateProject = serde_json::from_str(r#"{"featured": true}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("description"));
    }
}
