pub mod bulk;
pub mod certification;
pub mod experience;
pub mod media;
pub mod option_fields;
pub mod project;
pub mod token;
pub mod upload;
pub mod user;
