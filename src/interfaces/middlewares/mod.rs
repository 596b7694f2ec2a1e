pub mod auth;
pub mod rate_limit;
pub mod security_headers;
