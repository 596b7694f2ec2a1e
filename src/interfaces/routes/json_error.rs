use actix_web::{
    error::{JsonPayloadError, PathError},
    http::StatusCode,
    web, HttpResponse, ResponseError,
};
use serde_json::json;

/// Body extractor config: size limit plus `{error}` bodies for malformed JSON.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| JsonError::from(err).into())
}

/// Path segments that fail to parse are reported as a missing route.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| JsonError::from(err).into())
}

#[derive(Debug)]
pub struct JsonError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({ "error": self.message }))
    }
}

impl From<JsonPayloadError> for JsonError {
    fn from(err: JsonPayloadError) -> Self {
        let status = match err {
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => StatusCode::BAD_REQUEST,
        };
        JsonError {
            message: format!("JSON payload error: {}", err),
            status,
        }
    }
}

impl From<PathError> for JsonError {
    fn from(err: PathError) -> Self {
        tracing::debug!("Unparsable path segment: {}", err);
        JsonError {
            message: "Route not found".to_string(),
            status: StatusCode::NOT_FOUND,
        }
    }
}
