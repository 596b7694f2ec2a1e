use actix_web::{delete, get, post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::user::{ForgotPasswordRequest, InitAdminRequest, LoginUser, NewUser, ResetPasswordRequest},
    errors::AppError,
    use_cases::extractors::{AdminUser, AuthUser},
    AppState,
};

#[post("/login")]
#[instrument(skip(state, user))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>,
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// First-run setup. The body is optional; missing fields fall back to defaults.
#[post("/init")]
#[instrument(skip(state, body))]
pub async fn init_admin(
    state: web::Data<AppState>,
    body: Option<web::Json<InitAdminRequest>>,
) -> Result<impl Responder, AppError> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    let response = state.auth_handler.init_admin(request).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Admin user created successfully",
        "token": response.token,
        "user": response.user,
    })))
}

#[post("/forgot-password")]
#[instrument(skip(state, body))]
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<impl Responder, AppError> {
    state.auth_handler.forgot_password(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "If that email exists, a reset link has been sent"
    })))
}

#[post("/reset-password")]
#[instrument(skip(state, body))]
pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, AppError> {
    state.auth_handler.reset_password(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password has been reset successfully"
    })))
}

#[get("/me")]
pub async fn me(user: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "user": user.0 }))
}

#[post("/register")]
#[instrument(skip(state, body, _admin))]
pub async fn register(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<NewUser>,
) -> Result<impl Responder, AppError> {
    let user = state.auth_handler.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered successfully",
        "user": user,
    })))
}

#[delete("/users/by-username/{username}")]
#[instrument(skip(state, admin))]
pub async fn delete_user_by_username(
    admin: AdminUser,
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let username = username.into_inner();
    state.auth_handler.delete_user_by_username(&username).await?;

    tracing::info!(deleted_by = admin.0.id, "User {} removed", username);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("User {} deleted successfully", username)
    })))
}
