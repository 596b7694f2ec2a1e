use actix_web::{http::StatusCode, HttpResponse};

pub fn json_error(status: StatusCode, error: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "error": error }))
}

/// Fallback for requests no route matched.
pub async fn route_not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "Route not found")
}
