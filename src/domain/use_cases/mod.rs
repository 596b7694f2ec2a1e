pub mod auth;
pub mod bulk;
pub mod certification;
pub mod experience;
pub mod extractors;
pub mod project;
pub mod upload;
