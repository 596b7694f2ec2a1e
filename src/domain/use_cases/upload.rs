use std::sync::Arc;

use base64ct::{Base64, Encoding};
use bytes::Bytes;

use crate::{
    constants::RESUME_KEY,
    entities::upload::{Base64UploadRequest, IncomingFile, ResumeInfo, UploadResponse, UploadSlot},
    errors::UploadError,
    storage::FileStorage,
    utils::file_names::{generate_file_name, is_safe_file_name},
};

pub const RESUME_DOWNLOAD_PATH: &str = "/api/resume";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type recognised from the leading bytes, if any.
pub fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

pub struct UploadHandler {
    pub storage: Arc<dyn FileStorage>,
    pub image_max_bytes: usize,
    pub resume_max_bytes: usize,
}

impl UploadHandler {
    pub fn new(storage: Arc<dyn FileStorage>, image_max_bytes: usize, resume_max_bytes: usize) -> Self {
        UploadHandler { storage, image_max_bytes, resume_max_bytes }
    }

    pub fn limit(&self, slot: UploadSlot) -> usize {
        match slot {
            UploadSlot::Image => self.image_max_bytes,
            UploadSlot::Resume => self.resume_max_bytes,
        }
    }

    pub fn validate(&self, file: &IncomingFile, slot: UploadSlot) -> Result<(), UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::NoFile);
        }

        let limit = self.limit(slot);
        if file.bytes.len() > limit {
            return Err(UploadError::PayloadTooLarge(limit));
        }

        if !slot.accepts(&file.content_type) {
            return Err(UploadError::UnsupportedMediaType(file.content_type.clone()));
        }

        // The declared type is client-controlled; the signature must agree when known.
        if let Some(sniffed) = sniff_content_type(&file.bytes) {
            if !slot.accepts(sniffed) {
                return Err(UploadError::UnsupportedMediaType(sniffed.to_string()));
            }
        }

        Ok(())
    }

    pub async fn store(&self, file: IncomingFile, slot: UploadSlot) -> Result<UploadResponse, UploadError> {
        self.validate(&file, slot)?;

        let (key, message) = match slot {
            UploadSlot::Image => (generate_file_name(&file.original_name), "File uploaded successfully"),
            UploadSlot::Resume => (RESUME_KEY.to_string(), "Resume uploaded successfully"),
        };
        let size = file.bytes.len();

        let url = self.storage.put(&key, file.bytes, &file.content_type).await?;
        tracing::info!(key = %key, size, content_type = %file.content_type, "File stored");

        Ok(UploadResponse {
            message: message.to_string(),
            url,
            filename: key,
            original_name: file.original_name,
            size,
            content_type: file.content_type,
        })
    }

    pub async fn resume(&self) -> Result<Bytes, UploadError> {
        self.storage
            .get(RESUME_KEY)
            .await?
            .ok_or_else(|| UploadError::NotFound("Resume not found".into()))
    }

    pub async fn resume_info(&self) -> Result<ResumeInfo, UploadError> {
        let info = match self.storage.stat(RESUME_KEY).await? {
            Some(stat) => ResumeInfo {
                exists: true,
                last_modified: stat.last_modified,
                size: Some(stat.size),
                download_url: Some(RESUME_DOWNLOAD_PATH.to_string()),
            },
            None => ResumeInfo::missing(),
        };
        Ok(info)
    }

    /// A previously uploaded file and its content type.
    pub async fn stored_file(&self, name: &str) -> Result<(Bytes, &'static str), UploadError> {
        let not_found = || UploadError::NotFound("File not found".into());
        if !is_safe_file_name(name) {
            return Err(not_found());
        }

        let bytes = self.storage.get(name).await?.ok_or_else(not_found)?;
        let content_type = sniff_content_type(&bytes).unwrap_or(FALLBACK_CONTENT_TYPE);
        Ok((bytes, content_type))
    }
}

/// Decodes the JSON upload body. `fileData` may be a bare base64 string or a data URL.
pub fn decode_base64_upload(request: Base64UploadRequest) -> Result<IncomingFile, UploadError> {
    let raw = request.file_data.trim();
    if raw.is_empty() {
        return Err(UploadError::NoFile);
    }

    let (data_url_type, encoded) = match raw.strip_prefix("data:").and_then(|rest| rest.split_once(";base64,")) {
        Some((mime, encoded)) => (Some(mime.to_string()), encoded),
        None => (None, raw),
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = Base64::decode_vec(&compact).map_err(|_| UploadError::InvalidBase64)?;

    let content_type = request
        .file_type
        .filter(|t| !t.trim().is_empty())
        .or(data_url_type)
        .or_else(|| sniff_content_type(&bytes).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    let original_name = if request.file_name.trim().is_empty() {
        "upload".to_string()
    } else {
        request.file_name
    };

    Ok(IncomingFile { original_name, content_type, bytes: Bytes::from(bytes) })
}
