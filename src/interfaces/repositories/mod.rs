pub mod bulk;
pub mod certification;
pub mod content;
pub mod experience;
pub mod project;
pub mod sqlx_repo;
pub mod token;
pub mod user;
