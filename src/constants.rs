use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Literal the clear-all endpoint requires in its `confirm` field.
pub const CLEAR_CONFIRMATION: &str = "DELETE_ALL_DATA";

pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Storage key of the single resume slot.
pub const RESUME_KEY: &str = "resume.pdf";

pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
