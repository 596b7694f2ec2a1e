use actix_multipart::Multipart;
use actix_web::{
    get, post,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse, Responder,
};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use tracing::instrument;

use crate::{
    constants::RESUME_KEY,
    entities::upload::{Base64UploadRequest, IncomingFile, UploadSlot},
    errors::UploadError,
    use_cases::{
        extractors::AdminUser,
        upload::{decode_base64_upload, sniff_content_type},
    },
    AppState,
};

const GENERIC_BINARY: &str = "application/octet-stream";

/// Reads the first part that carries a filename, whatever its field name.
/// Stops reading as soon as `limit` is exceeded.
async fn read_first_file(payload: &mut Multipart, limit: usize) -> Result<IncomingFile, UploadError> {
    while let Some(mut field) = payload.try_next().await? {
        let Some(original_name) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            continue;
        };
        let declared = field.content_type().map(|mime| mime.essence_str().to_string());

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if buffer.len() + chunk.len() > limit {
                return Err(UploadError::PayloadTooLarge(limit));
            }
            buffer.extend_from_slice(&chunk);
        }
        let bytes = buffer.freeze();

        let content_type = declared
            .filter(|t| t != GENERIC_BINARY)
            .or_else(|| sniff_content_type(&bytes).map(str::to_string))
            .unwrap_or_else(|| GENERIC_BINARY.to_string());

        return Ok(IncomingFile { original_name, content_type, bytes });
    }

    Err(UploadError::NoFile)
}

#[post("/upload")]
#[instrument(skip_all)]
pub async fn upload_file(
    _admin: AdminUser,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<impl Responder, UploadError> {
    let uploads = &state.upload_handler;
    let file = read_first_file(&mut payload, uploads.limit(UploadSlot::Image)).await?;
    let response = uploads.store(file, UploadSlot::Image).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/upload-base64")]
#[instrument(skip_all)]
pub async fn upload_base64(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<Base64UploadRequest>,
) -> Result<impl Responder, UploadError> {
    let file = decode_base64_upload(body.into_inner())?;
    let response = state.upload_handler.store(file, UploadSlot::Image).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/admin/resume")]
#[instrument(skip_all)]
pub async fn upload_resume(
    _admin: AdminUser,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<impl Responder, UploadError> {
    let uploads = &state.upload_handler;
    let file = read_first_file(&mut payload, uploads.limit(UploadSlot::Resume)).await?;
    let response = uploads.store(file, UploadSlot::Resume).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/resume")]
pub async fn download_resume(state: web::Data<AppState>) -> Result<impl Responder, UploadError> {
    let bytes = state.upload_handler.resume().await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Inline,
        parameters: vec![DispositionParam::Filename(RESUME_KEY.to_string())],
    };

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(disposition)
        .body(bytes))
}

#[get("/resume/info")]
pub async fn resume_info(state: web::Data<AppState>) -> Result<impl Responder, UploadError> {
    let info = state.upload_handler.resume_info().await?;
    Ok(HttpResponse::Ok().json(info))
}

#[get("/uploads/{filename}")]
pub async fn serve_upload(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> Result<impl Responder, UploadError> {
    let (bytes, content_type) = state.upload_handler.stored_file(&filename).await?;
    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
