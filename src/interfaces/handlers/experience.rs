use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::experience::{NewExperience, UpdateExperience},
    errors::AppError,
    use_cases::extractors::AdminUser,
    AppState,
};

#[get("")]
pub async fn list_experiences(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let experiences = state.experience_handler.list_experiences(false).await?;
    Ok(HttpResponse::Ok().json(experiences))
}

#[get("/admin/all")]
pub async fn list_all_experiences(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let experiences = state.experience_handler.list_experiences(true).await?;
    Ok(HttpResponse::Ok().json(experiences))
}

#[get("/{id}")]
pub async fn get_experience(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let experience = state.experience_handler.get_experience(&id).await?;
    Ok(HttpResponse::Ok().json(experience))
}

#[post("")]
#[instrument(skip(state, body, _admin))]
pub async fn create_experience(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<NewExperience>,
) -> Result<impl Responder, AppError> {
    let experience = state.experience_handler.create_experience(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(experience))
}

#[put("/{id}")]
#[instrument(skip(state, body, _admin))]
pub async fn update_experience(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateExperience>,
) -> Result<impl Responder, AppError> {
    let experience = state.experience_handler.update_experience(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(experience))
}

#[delete("/{id}")]
#[instrument(skip(state, _admin))]
pub async fn delete_experience(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.experience_handler.delete_experience(&id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Experience deleted successfully"
    })))
}

#[patch("/{id}/toggle")]
#[instrument(skip(state, _admin))]
pub async fn toggle_experience(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let experience = state.experience_handler.toggle_active(&id).await?;
    Ok(HttpResponse::Ok().json(experience))
}
