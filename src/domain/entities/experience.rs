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
pub struct Experience {
    pub id: i32,
    pub company: String,
    pub title: String,
    pub dates: String,
    pub logo: Option<String>,
    pub bullets: Json<Vec<String>>,
    pub media: Json<Vec<MediaItem>>,
    pub tags: Json<Vec<String>>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ExperienceInsert {
    pub company: String,
    pub title: String,
    pub dates: String,
    pub logo: Option<String>,
    pub bullets: Vec<String>,
    pub media: Vec<MediaItem>,
    pub tags: Vec<String>,
    pub order: i32,
    pub is_active: bool,
}

// ───── Requests ─────

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Company is required"))]
    pub company: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Dates are required"))]
    pub dates: String,

    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<MediaItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub order: Option<i32>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewExperience {
    pub fn prepare_for_insert(self) -> ExperienceInsert {
        ExperienceInsert {
            company: self.company.trim().to_string(),
            title: self.title.trim().to_string(),
            dates: self.dates.trim().to_string(),
            logo: self.logo,
            bullets: self.bullets,
            media: self.media,
            tags: self.tags,
            order: self.order.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Company is required"))]
    pub company: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Dates are required"))]
    pub dates: String,

    #[serde(default)]
    pub logo: PatchString,

    #[serde(default)]
    pub bullets: PatchVec<String>,

    #[serde(default)]
    pub media: PatchVec<MediaItem>,

    #[serde(default)]
    pub tags: PatchVec<String>,

    #[serde(default)]
    pub order: OptionField<i32>,

    #[serde(default)]
    pub is_active: OptionField<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_fields_are_reported() {
        let payload: NewExperience = serde_json::from_str(r#"{"company": " ", "title": "Eng"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("company"));
        assert!(fields.contains_key("dates"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn list_fields_default_to_empty() {
        let payload: NewExperience = serde_json::from_str(
            r#"{"company":"Acme","title":"Eng","dates":"2020-2021","tags":null}"#
        ).unwrap();
        assert!(payload.validate().is_ok());

        let insert = payload.prepare_for_insert();
        assert!(insert.tags.is_empty());
        assert!(insert.bullets.is_empty());
        assert!(insert.media.is_empty());
        assert_eq!(insert.order, 0);
        assert!(insert.is_active);
    }

    #[test]
    fn update_requires_the_same_fields_as_create() {
        let payload: UpdateExperience = serde_json::from_str(r#"{"title": "Eng"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("company"));
        assert!(fields.contains_key("dates"));
        assert!(!fields.contains_key("title"));

        let payload: UpdateExperience = serde_json::from_str(
            r#"{"company": null, "title": "Eng", "dates": "2020"}"#
        ).unwrap();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("company"));
    }

    #[test]
    fn update_keeps_null_semantics_for_optional_columns() {
        let payload: UpdateExperience = serde_json::from_str(
            r#"{"company": "Acme", "title": "Eng", "dates": "2020", "logo": null}"#
        ).unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.logo.is_set_to_null());
        assert!(payload.tags.is_unchanged());
    }

    #[test]
    fn row_serializes_with_camel_case_and_order() {
        let now = Utc::now();
        let row = Experience {
            id: 1,
            company: "Acme".into(),
            title: "Eng".into(),
            dates: "2020-2021".into(),
            logo: None,
            bullets: Json(vec![]),
            media: Json(vec![]),
            tags: Json(vec!["rust".into()]),
            order: 2,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["order"], 2);
        assert_eq!(json["isActive"], true);
        assert_eq!(json["tags"][0], "rust");
        assert!(json.get("createdAt").is_some());
    }
}
