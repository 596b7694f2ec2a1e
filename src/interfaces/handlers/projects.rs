use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::project::{NewProject, UpdateProject},
    errors::AppError,
    use_cases::extractors::AdminUser,
    AppState,
};

#[get("")]
pub async fn list_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects(false).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/featured")]
pub async fn list_featured_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_featured_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/admin/all")]
pub async fn list_all_projects(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects(true).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[post("")]
#[instrument(skip(state, body, _admin))]
pub async fn create_project(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<NewProject>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[put("/{id}")]
#[instrument(skip(state, body, _admin))]
pub async fn update_project(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateProject>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.update_project(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[delete("/{id}")]
#[instrument(skip(state, _admin))]
pub async fn delete_project(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Project deleted successfully"
    })))
}

#[patch("/{id}/toggle")]
#[instrument(skip(state, _admin))]
pub async fn toggle_project(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.toggle_active(&id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[patch("/{id}/featured")]
#[instrument(skip(state, _admin))]
pub async fn toggle_project_featured(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.toggle_featured(&id).await?;
    Ok(HttpResponse::Ok().json(project))
}
