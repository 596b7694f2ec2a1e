use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use crate::domain::validation::not_blank;
use crate::entities::{
    media::MediaItem,
    option_fields::{null_as_default, OptionField, PatchString, PatchVec},
};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub external_url: Option<String>,
    pub tags: Json<Vec<String>>,
    pub media: Json<Vec<MediaItem>>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CertificationInsert {
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub external_url: Option<String>,
    pub tags: Vec<String>,
    pub media: Vec<MediaItem>,
    pub order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCertification {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub external_url: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<MediaItem>,

    #[serde(default)]
    pub order: Option<i32>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewCertification {
    pub fn prepare_for_insert(self) -> CertificationInsert {
        CertificationInsert {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            logo: self.logo,
            external_url: self.external_url,
            tags: self.tags,
            media: self.media,
            order: self.order.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertification {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub logo: PatchString,

    #[serde(default)]
    pub external_url: PatchString,

    #[serde(default)]
    pub tags: PatchVec<String>,

    #[serde(default)]
    pub media: PatchVec<MediaItem>,

    #[serde(default)]
    pub order: OptionField<i32>,

    #[serde(default)]
    pub is_active: OptionField<bool>,
}
