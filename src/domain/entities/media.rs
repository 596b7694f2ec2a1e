use serde::{Deserialize, Serialize};

/// Attachment descriptor stored inside the `media` JSONB column of every content kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub url: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}
