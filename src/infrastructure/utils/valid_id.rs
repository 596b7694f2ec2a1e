use crate::errors::AppError;

/// Record ids are positive integers; anything else can't match a row.
pub fn valid_id(raw: &str, not_found: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))
}
