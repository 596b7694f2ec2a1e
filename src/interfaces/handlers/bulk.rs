use actix_web::{
    get, post,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse, Responder,
};
use tracing::instrument;

use crate::{
    entities::bulk::{ClearRequest, ImportRequest},
    errors::AppError,
    use_cases::extractors::AdminUser,
    AppState,
};

#[get("/export")]
#[instrument(skip(state, _admin))]
pub async fn export_data(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let document = state.bulk_handler.export().await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(document.file_name())],
    };

    Ok(HttpResponse::Ok()
        .insert_header(disposition)
        .json(document))
}

#[post("/import")]
#[instrument(skip(state, body, _admin))]
pub async fn import_data(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<ImportRequest>,
) -> Result<impl Responder, AppError> {
    let report = state.bulk_handler.import(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Missing or unparsable bodies fall through to the confirmation check.
#[post("/clear")]
#[instrument(skip(state, body, admin))]
pub async fn clear_data(
    admin: AdminUser,
    state: web::Data<AppState>,
    body: Option<web::Json<ClearRequest>>,
) -> Result<impl Responder, AppError> {
    let report = state.bulk_handler.clear(body.map(web::Json::into_inner)).await?;
    tracing::warn!(user_id = admin.0.id, "Content cleared by admin");
    Ok(HttpResponse::Ok().json(report))
}
