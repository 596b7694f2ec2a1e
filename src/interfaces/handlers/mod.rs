pub mod auth;
pub mod bulk;
pub mod certifications;
pub mod experience;
pub mod home;
pub mod json_error;
pub mod projects;
pub mod system;
pub mod upload;
