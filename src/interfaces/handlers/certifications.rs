use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::certification::{NewCertification, UpdateCertification},
    errors::AppError,
    use_cases::extractors::AdminUser,
    AppState,
};

#[get("")]
pub async fn list_certifications(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let certifications = state.certification_handler.list_certifications(false).await?;
    Ok(HttpResponse::Ok().json(certifications))
}

#[get("/admin/all")]
pub async fn list_all_certifications(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let certifications = state.certification_handler.list_certifications(true).await?;
    Ok(HttpResponse::Ok().json(certifications))
}

#[get("/{id}")]
pub async fn get_certification(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let certification = state.certification_handler.get_certification(&id).await?;
    Ok(HttpResponse::Ok().json(certification))
}

#[post("")]
#[instrument(skip(state, body, _admin))]
pub async fn create_certification(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<NewCertification>,
) -> Result<impl Responder, AppError> {
    let certification = state.certification_handler.create_certification(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(certification))
}

#[put("/{id}")]
#[instrument(skip(state, body, _admin))]
pub async fn update_certification(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateCertification>,
) -> Result<impl Responder, AppError> {
    let certification = state
        .certification_handler
        .update_certification(&id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(certification))
}

#[delete("/{id}")]
#[instrument(skip(state, _admin))]
pub async fn delete_certification(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.certification_handler.delete_certification(&id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Certification deleted successfully"
    })))
}

#[patch("/{id}/toggle")]
#[instrument(skip(state, _admin))]
pub async fn toggle_certification(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let certification = state.certification_handler.toggle_active(&id).await?;
    Ok(HttpResponse::Ok().json(certification))
}
