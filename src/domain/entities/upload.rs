use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an upload is headed; decides the MIME allow-list and size limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    Image,
    Resume,
}

impl UploadSlot {
    pub fn accepts(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        match self {
            UploadSlot::Image => mime.starts_with("image/"),
            UploadSlot::Resume => mime == "application/pdf",
        }
    }
}

/// A file fully read into memory, before validation.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base64UploadRequest {
    #[serde(default)]
    pub file_name: String,

    #[serde(default)]
    pub file_data: String,

    #[serde(default)]
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub url: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Metadata a storage backend reports for a stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObjectInfo {
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInfo {
    pub exists: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl ResumeInfo {
    pub fn missing() -> Self {
        ResumeInfo { exists: false, last_modified: None, size: None, download_url: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_apply_their_allow_lists() {
        assert!(UploadSlot::Image.accepts("image/png"));
        assert!(UploadSlot::Image.accepts("IMAGE/JPEG"));
        assert!(!UploadSlot::Image.accepts("application/pdf"));
        assert!(UploadSlot::Resume.accepts("application/pdf"));
        assert!(!UploadSlot::Resume.accepts("image/png"));
    }

    #[test]
    fn missing_resume_only_reports_existence() {
        let json = serde_json::to_value(ResumeInfo::missing()).unwrap();
        assert_eq!(json, serde_json::json!({"exists": false}));
    }
}
